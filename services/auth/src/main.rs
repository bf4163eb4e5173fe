use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod models;
mod password;
mod repositories;
mod routes;
mod state;
mod validation;

use common::{
    database::{self, DatabaseConfig, StoreBackend},
    token::{TokenConfig, TokenService},
};
use tokio::net::TcpListener;

use crate::{
    config::AuthConfig,
    repositories::{MemoryUserRepository, PgUserRepository, UserStore},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting authentication service");

    let config = AuthConfig::from_env()?;

    // The signing secret has no fallback
    let token_config = TokenConfig::from_env()?;
    let token_service = TokenService::new(&token_config);

    let user_store: Arc<dyn UserStore> = match StoreBackend::from_env()? {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = database::init_pool(&db_config).await?;

            if database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            database::run_migrations(&pool).await?;
            Arc::new(PgUserRepository::new(pool))
        }
        StoreBackend::Memory => {
            info!("Using in-memory user store");
            Arc::new(MemoryUserRepository::new())
        }
    };

    let app_state = AppState {
        user_store,
        token_service,
        secure_cookie: config.secure_cookie,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("Authentication service listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
