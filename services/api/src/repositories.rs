//! Repositories for catalog storage

pub mod movie;
pub mod person;

pub use movie::{MemoryMovieRepository, MovieStore, PgMovieRepository};
pub use person::{MemoryPersonRepository, PersonStore, PgPersonRepository};
