//! Application state shared across handlers

use common::token::TokenService;
use std::sync::Arc;

use crate::repositories::UserStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_store: Arc<dyn UserStore>,
    pub token_service: TokenService,
    pub secure_cookie: bool,
}
