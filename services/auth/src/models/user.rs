//! User model and related functionality

use chrono::{DateTime, Utc};
use common::token::Identity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Identity carried in the user's tokens
    pub fn identity(&self) -> Identity {
        Identity {
            email: self.email.clone(),
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// New user creation payload, with the password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Registration request body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// User login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// User summary returned on login
#[derive(Debug, Clone, Serialize)]
pub struct LoginUser {
    pub email: String,
    pub userid: Uuid,
    pub username: String,
}

impl From<&User> for LoginUser {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            userid: user.id,
            username: user.username.clone(),
        }
    }
}
