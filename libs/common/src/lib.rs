//! Common library for the rent-a-movie services
//!
//! This crate provides functionality shared by the auth and API services:
//! database connectivity and migrations, access tokens, listener
//! configuration and error types.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod token;
