//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `TeamRegistry` / `DivisionRegistry`: static fixture lookup data
//! - `ProbabilitySource`: outcome probabilities for a resolved fixture

pub mod probability_source;
pub mod registry;
