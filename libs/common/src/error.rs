//! Custom error types for the common library
//!
//! This module defines the store error type shared by every repository
//! implementation, whether backed by PostgreSQL or held in memory.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for store operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred while applying the bundled schema
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A uniqueness constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl DatabaseError {
    /// Map a query failure, turning unique-index violations into `Conflict`
    pub fn from_query(err: SqlxError, conflict_message: &str) -> Self {
        match &err {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                DatabaseError::Conflict(conflict_message.to_string())
            }
            _ => DatabaseError::Query(err),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
