//! User repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, User};

const EMAIL_TAKEN: &str = "A user with this email already exists";

/// Persistence operations on users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Store a new user; fails with `Conflict` if the email is taken
    async fn create(&self, new_user: NewUser) -> DatabaseResult<User>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.username);

        let row = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_query(e, EMAIL_TAKEN))?;

        Ok(user_from_row(&row))
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        info!("Finding user by email: {}", email);

        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(user_from_row))
    }
}

/// In-memory user repository
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> DatabaseResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}
