//! Application state shared across handlers

use common::token::TokenService;
use std::sync::Arc;

use crate::repositories::{MovieStore, PersonStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub movie_store: Arc<dyn MovieStore>,
    pub actor_store: Arc<dyn PersonStore>,
    pub producer_store: Arc<dyn PersonStore>,
    pub token_service: TokenService,
    pub max_page_limit: u32,
}
