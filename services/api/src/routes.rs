//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    models::{Movie, MovieFilter, MovieSummary, RentRequest, UserProfile},
    pricing,
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/movies/rent", post(rent_movie))
        .route("/movies/return", post(return_movie))
        .route("/users/me", get(current_user))
        .route("/users/me/movies", get(current_user_movies))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/movies", get(list_movies))
        .route("/movies/:id", get(get_movie))
        .route("/movies/cost/:days", get(rental_cost))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// List the catalog, optionally filtered by genre and year
pub async fn list_movies(
    State(state): State<AppState>,
    Query(filter): Query<MovieFilter>,
) -> ApiResult<Json<Vec<Movie>>> {
    let movies = state.movies.list(&filter).await.map_err(|e| {
        tracing::error!("Failed to list movies: {:#}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(movies))
}

/// Get a movie by ID
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Movie>> {
    let movie = state
        .movies
        .get(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get movie {}: {:#}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Movie does not exist.".to_string()))?;

    Ok(Json(movie))
}

/// Estimated cost of a rental lasting `days` days
pub async fn rental_cost(Path(days): Path<u32>) -> Json<Decimal> {
    Json(pricing::cost(i64::from(days)))
}

/// Rent a movie for the caller
pub async fn rent_movie(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<RentRequest>,
) -> ApiResult<Json<Movie>> {
    let movie = state.ledger.rent(user.id, payload.id).await?;
    Ok(Json(movie))
}

/// Return a movie rented by the caller
pub async fn return_movie(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<RentRequest>,
) -> ApiResult<Json<Movie>> {
    let movie = state.ledger.return_movie(user.id, payload.id).await?;
    Ok(Json(movie))
}

/// Profile and balance of the caller
pub async fn current_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .accounts
        .profile(user.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load user {}: {:#}", user.id, e);
            ApiError::InternalServerError
        })?
        // A valid token for a user that no longer exists
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(profile))
}

/// Movies the caller currently rents
pub async fn current_user_movies(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<MovieSummary>>> {
    let movies = state.ledger.list_active(user.id).await?;
    Ok(Json(movies))
}
