//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the service's workflows.
//!
//! Use cases:
//! - `PredictionService`: fixture validation, probabilities, pricing,
//!   plus the registry listings the serving layer exposes

pub mod prediction_service;

pub use prediction_service::{
  PredictError, Prediction, PredictionRequest, PredictionService, ServiceHealth, TeamSuggestions,
};
