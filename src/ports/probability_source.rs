//! Probability Source Port - Outcome Probability Interface
//!
//! Anything that produces a home/draw/away probability vector for a
//! resolved fixture: a trained classifier, a fixed heuristic table, or
//! a remote predictor. The odds engine is agnostic to which one is in
//! use; the serving layer picks it at startup.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::odds::ProbabilityVector;
use crate::domain::prediction::ResolvedFixture;

/// Time context a prediction is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchContext {
  /// Season year.
  pub year: i32,
  /// Calendar month (1-12).
  pub month: u32,
}

impl MatchContext {
  /// Build a context, falling back to today's date for missing parts.
  pub fn with_defaults(year: Option<i32>, month: Option<u32>) -> Self {
    let today = Self::current();
    Self {
      year: year.unwrap_or(today.year),
      month: month.unwrap_or(today.month),
    }
  }

  /// Context for the current UTC date.
  pub fn current() -> Self {
    let now = Utc::now();
    Self {
      year: now.year(),
      month: now.month(),
    }
  }
}

impl Default for MatchContext {
  fn default() -> Self {
    Self::current()
  }
}

/// Trait for probability providers.
///
/// Implementations must return a vector that already sums to 1; the
/// engine validates but never renormalizes.
#[async_trait]
pub trait ProbabilitySource: Send + Sync + 'static {
  /// Short identifier used in logs and metric labels.
  fn name(&self) -> &'static str;

  /// Probabilities of home win, draw and away win for `fixture`.
  async fn probabilities(
    &self,
    fixture: &ResolvedFixture,
    context: &MatchContext,
  ) -> anyhow::Result<ProbabilityVector>;

  /// Whether the source can currently serve predictions.
  async fn is_ready(&self) -> bool;
}
