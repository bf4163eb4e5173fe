//! Actor and producer repositories

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Gender, Person, PersonKind};

/// Persistence operations on one collection of people
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Store a new person record
    async fn create(&self, person: Person) -> DatabaseResult<Person>;

    /// Get a person by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Person>>;

    /// Get the records created by a user, oldest first
    async fn find_by_owner(&self, owner: Uuid) -> DatabaseResult<Vec<Person>>;
}

/// PostgreSQL-backed repository over the actors or producers table
#[derive(Clone)]
pub struct PgPersonRepository {
    pool: PgPool,
    kind: PersonKind,
}

impl PgPersonRepository {
    pub fn new(pool: PgPool, kind: PersonKind) -> Self {
        Self { pool, kind }
    }
}

const PERSON_COLUMNS: &str = "id, name, gender, dob, bio, user_id, created_at, updated_at";

fn person_from_row(row: &PgRow) -> Person {
    let gender = row
        .get::<Option<String>, _>("gender")
        .and_then(|g| match g.parse::<Gender>() {
            Ok(gender) => Some(gender),
            Err(e) => {
                warn!("{}", e);
                None
            }
        });

    Person {
        id: row.get("id"),
        name: row.get("name"),
        gender,
        dob: row.get("dob"),
        bio: row.get("bio"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl PersonStore for PgPersonRepository {
    async fn create(&self, person: Person) -> DatabaseResult<Person> {
        info!("Creating {} {} for user {}", self.kind, person.id, person.user_id);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO {} ({PERSON_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PERSON_COLUMNS}
            "#,
            self.kind.table()
        ))
        .bind(person.id)
        .bind(&person.name)
        .bind(person.gender.map(|g| g.as_str()))
        .bind(person.dob)
        .bind(&person.bio)
        .bind(person.user_id)
        .bind(person.created_at)
        .bind(person.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(person_from_row(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Person>> {
        let row = sqlx::query(&format!(
            "SELECT {PERSON_COLUMNS} FROM {} WHERE id = $1",
            self.kind.table()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(person_from_row))
    }

    async fn find_by_owner(&self, owner: Uuid) -> DatabaseResult<Vec<Person>> {
        let rows = sqlx::query(&format!(
            "SELECT {PERSON_COLUMNS} FROM {} WHERE user_id = $1 ORDER BY created_at, id",
            self.kind.table()
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(person_from_row).collect())
    }
}

/// In-memory person repository
#[derive(Clone, Default)]
pub struct MemoryPersonRepository {
    people: Arc<RwLock<Vec<Person>>>,
}

impl MemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonStore for MemoryPersonRepository {
    async fn create(&self, person: Person) -> DatabaseResult<Person> {
        self.people.write().await.push(person.clone());
        Ok(person)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Person>> {
        let people = self.people.read().await;
        Ok(people.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_owner(&self, owner: Uuid) -> DatabaseResult<Vec<Person>> {
        let people = self.people.read().await;
        Ok(people
            .iter()
            .filter(|p| p.user_id == owner)
            .cloned()
            .collect())
    }
}
