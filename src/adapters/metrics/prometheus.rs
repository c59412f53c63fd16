//! Prometheus Metrics Registry - Prediction Observability
//!
//! Registers prediction counters, latency and realized-margin
//! histograms, and source fallback counts. Exposed on `/metrics` of
//! the main HTTP server for Grafana dashboards.

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use tracing::warn;

/// Centralized Prometheus metrics for the odds service.
///
/// All metrics follow the naming convention `match_odds_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Successful predictions by division and probability source.
    pub predictions: IntCounterVec,
    /// Rejected or failed predictions by error kind.
    pub prediction_errors: IntCounterVec,
    /// End-to-end prediction latency (microseconds).
    pub prediction_latency_us: Histogram,
    /// Realized margin of served books (percent).
    pub actual_margin_percent: Histogram,
    /// Times a primary probability source failed over.
    pub source_fallbacks: IntCounterVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions = IntCounterVec::new(
            Opts::new("match_odds_predictions_total", "Predictions served"),
            &["division", "source"],
        )?;

        let prediction_errors = IntCounterVec::new(
            Opts::new(
                "match_odds_prediction_errors_total",
                "Predictions rejected or failed, by error kind",
            ),
            &["kind"],
        )?;

        let prediction_latency_us = Histogram::with_opts(
            HistogramOpts::new(
                "match_odds_prediction_latency_us",
                "Prediction latency in microseconds",
            )
            .buckets(vec![
                10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 50000.0, 500000.0,
            ]),
        )?;

        let actual_margin_percent = Histogram::with_opts(
            HistogramOpts::new(
                "match_odds_actual_margin_percent",
                "Realized bookmaker margin of served odds, in percent",
            )
            .buckets(vec![0.0, 2.5, 5.0, 7.5, 10.0, 15.0, 20.0, 30.0, 50.0]),
        )?;

        let source_fallbacks = IntCounterVec::new(
            Opts::new(
                "match_odds_source_fallbacks_total",
                "Primary probability source failures answered by the fallback",
            ),
            &["source"],
        )?;

        // Register all metrics
        registry.register(Box::new(predictions.clone()))?;
        registry.register(Box::new(prediction_errors.clone()))?;
        registry.register(Box::new(prediction_latency_us.clone()))?;
        registry.register(Box::new(actual_margin_percent.clone()))?;
        registry.register(Box::new(source_fallbacks.clone()))?;

        Ok(Self {
            registry,
            predictions,
            prediction_errors,
            prediction_latency_us,
            actual_margin_percent,
            source_fallbacks,
        })
    }

    /// Text exposition of every registered metric.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Router serving `/metrics`.
    pub fn routes(self: Arc<Self>) -> Router {
        Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&self);
                async move {
                    match metrics.render() {
                        Ok(body) => (
                            StatusCode::OK,
                            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
                            body,
                        )
                            .into_response(),
                        Err(e) => {
                            warn!(error = %e, "Failed to encode metrics");
                            StatusCode::INTERNAL_SERVER_ERROR.into_response()
                        }
                    }
                }
            }),
        )
    }
}
