//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    AppState,
    models::{LoginCredentials, NewUser, TokenResponse, UserResponse},
    repositories::user::verify_password,
    validation::{normalize_email, validate_email, validate_password},
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/jwt/login", post(login))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<impl IntoResponse, AuthError> {
    let email = normalize_email(&payload.email);
    validate_email(&email).map_err(AuthError::BadRequest)?;
    validate_password(&payload.password).map_err(AuthError::BadRequest)?;

    let user = state
        .user_repository
        .create(&email, &payload.password)
        .await
        .map_err(|e| {
            error!("Failed to create user: {:#}", e);
            AuthError::InternalServerError
        })?
        .ok_or_else(|| {
            AuthError::BadRequest("A user with this email already exists.".to_string())
        })?;

    info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginCredentials>,
) -> Result<impl IntoResponse, AuthError> {
    let email = normalize_email(&payload.username);
    info!("Login attempt for user: {}", email);

    let user = state
        .user_repository
        .find_by_email(&email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {:#}", e);
            AuthError::InternalServerError
        })?
        .filter(|user| user.is_active)
        .ok_or(AuthError::InvalidCredentials)?;

    let password_ok = verify_password(&user.password_hash, &payload.password).map_err(|e| {
        error!("Stored password hash for {} is unusable: {:#}", user.id, e);
        AuthError::InternalServerError
    })?;

    if !password_ok {
        warn!("Wrong password for user {}", user.id);
        return Err(AuthError::InvalidCredentials);
    }

    let access_token = state.token_service.issue(user.id).map_err(|e| {
        error!("Failed to generate access token: {}", e);
        AuthError::InternalServerError
    })?;

    let response = TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.token_service.lifetime_seconds(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Custom error type for authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Rejected input, message shown to the client
    #[error("{0}")]
    BadRequest(String),

    /// Unknown email, wrong password or inactive user
    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::BadRequest(_) | AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let error_message = self.to_string();

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
