//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (config-backed registries, model files, the
//! upstream HTTP predictor) and serves the use cases over HTTP.
//!
//! Adapter categories:
//! - `http`: axum prediction API
//! - `metrics`: Prometheus metrics export and health checks
//! - `registry`: team and division registries built from config
//! - `sources`: probability sources (heuristic, model, remote, fallback)

pub mod http;
pub mod metrics;
pub mod registry;
pub mod sources;
