//! Authentication middleware for JWT token validation

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tracing::{error, warn};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Reject requests without a valid bearer token, or whose token belongs to a
/// deleted or deactivated account, and expose the caller to handlers as an
/// [`AuthUser`] extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        warn!("Rejected access token: {}", e);
        ApiError::Unauthorized
    })?;

    let profile = state.accounts.profile(claims.sub).await.map_err(|e| {
        error!("Failed to load account {}: {:#}", claims.sub, e);
        ApiError::InternalServerError
    })?;

    match profile {
        Some(profile) if profile.is_active => {}
        _ => {
            warn!("Rejected token for unknown or inactive user {}", claims.sub);
            return Err(ApiError::Unauthorized);
        }
    }

    req.extensions_mut().insert(AuthUser { id: claims.sub });

    Ok(next.run(req).await)
}
