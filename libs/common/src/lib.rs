//! Common library for the Marquee movie catalog
//!
//! This crate provides functionality shared by the auth and api services:
//! database connectivity and schema, the store error type, and the token
//! service used to issue and verify identity tokens.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     println!("Database health check: {}", health_check(&pool).await?);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod token;
