//! API models for request and response payloads

mod date;
pub mod movie;
pub mod person;

pub use movie::{Movie, MovieListResponse, MovieQuery, NewMovie, UpdateMovie};
pub use person::{Gender, NewPerson, Person, PersonKind};
