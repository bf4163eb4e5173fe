//! Authentication service models

pub mod user;

pub use user::{LoginCredentials, LoginUser, NewUser, RegisterRequest, User};
