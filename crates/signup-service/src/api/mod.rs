//! HTTP API for the signup service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use crate::auth::SignupService;
use account_store::AccountStore;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Signup workflow
    pub signup: Arc<SignupService>,
    /// Account storage, for health reporting
    pub store: Arc<dyn AccountStore>,
}

impl AppState {
    /// Create new application state.
    pub fn new(signup: SignupService, store: Arc<dyn AccountStore>) -> Self {
        Self {
            signup: Arc::new(signup),
            store,
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/signup", post(handlers::signup))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
