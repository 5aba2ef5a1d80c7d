use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod models;
mod repositories;
mod routes;
mod validation;

use common::{
    config::ServerConfig,
    database::{self, DatabaseConfig},
    token::{TokenConfig, TokenService},
};

use crate::repositories::UserRepository;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserRepository,
    pub token_service: TokenService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let token_service = TokenService::new(&TokenConfig::from_env()?)?;

    let app_state = AppState {
        user_repository: UserRepository::new(pool),
        token_service,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env("AUTH", 3000)?;
    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Authentication service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
