//! Error types shared by the services
//!
//! Database failures carry the underlying sqlx error as their source; token
//! failures distinguish configuration problems from rejected tokens.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors raised while issuing or checking access tokens
#[derive(Error, Debug)]
pub enum TokenError {
    /// Missing or unusable signing configuration
    #[error("Token configuration error: {0}")]
    Configuration(String),

    /// Token could not be signed
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Token is malformed, expired or signed with another secret
    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}
