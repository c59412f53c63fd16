//! Probability Source Adapters
//!
//! Concrete `ProbabilitySource` implementations:
//! - `heuristic`: fixed table plus noise, always available
//! - `model`: softmax classifier loaded from a JSON model file
//! - `remote`: upstream prediction service over HTTP
//! - `fallback`: primary-then-secondary combinator

pub mod fallback;
pub mod heuristic;
pub mod model;
pub mod remote;

pub use fallback::FallbackSource;
pub use heuristic::HeuristicSource;
pub use model::ModelSource;
pub use remote::{RemoteSource, RemoteSourceConfig};
