use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod ledger;
mod middleware;
mod models;
mod pricing;
mod repositories;
mod routes;
mod state;

use common::{
    config::ServerConfig,
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
    token::{TokenConfig, TokenService},
};

use crate::{ledger::SystemClock, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    let tokens = TokenService::new(&TokenConfig::from_env()?)?;
    let app_state = AppState::with_pool(pool, Arc::new(SystemClock), tokens);

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env("API", 3001)?;
    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
