use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod models;
mod query;
mod repositories;
mod routes;
mod state;

use common::{
    database::{self, DatabaseConfig, StoreBackend},
    token::{TokenConfig, TokenService},
};
use tokio::net::TcpListener;

use crate::{
    config::ApiConfig,
    models::PersonKind,
    repositories::{
        MemoryMovieRepository, MemoryPersonRepository, PgMovieRepository, PgPersonRepository,
    },
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

    info!("Starting API service");

    let config = ApiConfig::from_env()?;

    let token_config = TokenConfig::from_env()?;
    let token_service = TokenService::new(&token_config);

    let app_state = match StoreBackend::from_env()? {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = database::init_pool(&db_config).await?;

            if database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            database::run_migrations(&pool).await?;

            AppState {
                movie_store: Arc::new(PgMovieRepository::new(pool.clone())),
                actor_store: Arc::new(PgPersonRepository::new(pool.clone(), PersonKind::Actor)),
                producer_store: Arc::new(PgPersonRepository::new(pool, PersonKind::Producer)),
                token_service,
                max_page_limit: config.max_page_limit,
            }
        }
        StoreBackend::Memory => {
            info!("Using in-memory catalog stores");
            AppState {
                movie_store: Arc::new(MemoryMovieRepository::new()),
                actor_store: Arc::new(MemoryPersonRepository::new()),
                producer_store: Arc::new(MemoryPersonRepository::new()),
                token_service,
                max_page_limit: config.max_page_limit,
            }
        }
    };

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("API service listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
