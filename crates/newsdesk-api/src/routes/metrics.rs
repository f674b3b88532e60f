//! Prometheus metrics endpoint

use axum::{Router, extract::State, http::header, response::IntoResponse, routing::get};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::sync::Arc;

use crate::state::MetricsHandle;

/// Install the global Prometheus recorder
///
/// Fails if a recorder is already installed in this process.
pub fn install_recorder() -> Result<MetricsHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Create metrics routes with the Prometheus handle
pub fn routes(handle: Arc<MetricsHandle>) -> Router {
    Router::new()
        .route("/metrics", get(get_metrics))
        .with_state(handle)
}

/// GET /metrics - Prometheus text exposition format
async fn get_metrics(State(handle): State<Arc<MetricsHandle>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}
