//! Domain layer - Core business logic and models.
//!
//! This module contains the pure odds engine: probability vectors,
//! margin arithmetic and fixture validation. No I/O and no shared
//! state (hexagonal architecture inner ring). Registries are reached
//! only through the traits in `crate::ports::registry`.

pub mod error;
pub mod odds;
pub mod prediction;

// Re-export core types for convenience
pub use error::{OddsError, TeamSide};
pub use odds::{
    apply_house_margin, compute_fair_odds, compute_margin_report, HouseMargin, MarginReport,
    OddsVector, Outcome, ProbabilityVector, QuotedOdds,
};
pub use prediction::{
    price_fixture, validate_and_predict, validate_fixture, PredictionResult, ResolvedFixture,
};
