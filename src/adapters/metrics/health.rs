//! Health Checks - Liveness and Readiness Probes
//!
//! Exposes /live and /ready endpoints via axum 0.7 for Docker
//! health checks and monitoring. Readiness depends on the probability
//! source and flips to 503 as soon as shutdown begins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

/// Shared health state polled by readiness probes.
#[derive(Debug)]
pub struct HealthState {
    /// Whether the probability source can serve predictions.
    source_ready: AtomicBool,
    /// Set once graceful shutdown has started.
    shutting_down: AtomicBool,
}

impl HealthState {
    /// Create a new health state (ready by default).
    pub fn new() -> Self {
        Self {
            source_ready: AtomicBool::new(true),
            shutting_down: AtomicBool::new(false),
        }
    }

    pub fn set_source_ready(&self, ready: bool) {
        self.source_ready.store(ready, Ordering::Relaxed);
    }

    /// Mark the service as draining; readiness fails from now on.
    pub fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::Relaxed);
    }

    /// Check if the system is ready to serve traffic.
    pub fn is_ready(&self) -> bool {
        !self.shutting_down.load(Ordering::Relaxed) && self.source_ready.load(Ordering::Relaxed)
    }

    /// Router serving `/live` and `/ready`.
    pub fn routes(self: Arc<Self>) -> Router {
        Router::new()
            .route("/live", get(liveness))
            .route("/ready", get(readiness))
            .with_state(self)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: returns 200 only while the source is ready and
/// no shutdown is in progress.
async fn readiness(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    if state.is_ready() {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_clears_readiness() {
        let state = HealthState::new();
        assert!(state.is_ready());
        state.begin_shutdown();
        assert!(!state.is_ready());
    }

    #[test]
    fn test_source_not_ready() {
        let state = HealthState::new();
        state.set_source_ready(false);
        assert!(!state.is_ready());
    }
}
