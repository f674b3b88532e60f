//! Application state

use axum::extract::FromRef;
use newsdesk_auth::{Gate, JwtManager};
use newsdesk_db::Database;
use std::sync::Arc;
use std::time::Duration;

/// Prometheus exporter handle used by the `/metrics` route
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub gate: Arc<Gate>,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtManager>, lookup_timeout: Duration) -> Self {
        let gate = Arc::new(Gate::new(jwt.clone(), db.clone(), lookup_timeout));
        Self { db, jwt, gate }
    }
}
