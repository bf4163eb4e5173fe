//! Repositories for user storage

pub mod user;

pub use user::{MemoryUserRepository, PgUserRepository, UserStore};
