//! API routes

mod auth;
mod health;
pub mod metrics;
mod news;
pub mod types;
mod users;
mod validation;

use axum::Router;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::{AppState, MetricsHandle};

/// Fallback for unknown routes
async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        // Health check
        .merge(health::routes())
        // Public: login and registration; protected: everything else
        .merge(auth::routes())
        .merge(users::routes())
        .merge(news::routes(state.gate.clone()))
        .with_state(state);

    // Add metrics endpoint if handle is provided
    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router.fallback(not_found)
}
