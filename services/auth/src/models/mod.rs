//! Authentication service models

pub mod user;

// Re-export for convenience
pub use user::{LoginCredentials, NewUser, TokenResponse, User, UserResponse};
