//! HTTP Prediction API
//!
//! axum 0.7 router exposing the prediction service as JSON, with the
//! health and Prometheus routes merged onto the same listener.

pub mod routes;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::adapters::metrics::MetricsRegistry;

pub use routes::{ApiError, AppState};

/// Build the full application router.
pub fn build_router(
    state: AppState,
    metrics: Option<Arc<MetricsRegistry>>,
) -> Router {
    let health = Arc::clone(&state.health);

    let api = Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/predict", post(routes::predict))
        .route("/teams", get(routes::teams))
        .route("/divisions", get(routes::divisions))
        .route("/team-suggestions/:name", get(routes::team_suggestions))
        .with_state(Arc::new(state));

    let mut app = api.merge(health.routes());
    if let Some(metrics) = metrics {
        app = app.merge(metrics.routes());
    }
    app.layer(CorsLayer::permissive())
}
