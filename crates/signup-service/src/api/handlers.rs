//! HTTP request handlers.

use super::types::{HealthResponse, SignupRequest};
use super::AppState;
use crate::error::AuthError;
use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        account_count: state.store.count().await,
        storage_healthy: state.store.health_check().await,
    })
}

/// Create an account and return its identity token.
///
/// The token is the whole response body, as `text/plain`.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, String), AuthError> {
    request.validate()?;
    info!("Signup request received");

    let token = state
        .signup
        .sign_up(&request.name, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, token))
}
