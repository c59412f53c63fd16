//! Prediction Service - Registry Lookup, Probabilities, Pricing
//!
//! The request/response use case behind every serving layer:
//! 1. Resolves the fixture against the registries (fixed order)
//! 2. Asks the configured probability source for the fixture
//! 3. Prices the probabilities with the odds engine
//!
//! Stateless per request: registries and the source are shared
//! read-only, nothing is cached between calls.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::adapters::metrics::MetricsRegistry;
use crate::config::PricingConfig;
use crate::domain::error::OddsError;
use crate::domain::prediction::{price_fixture, validate_fixture, PredictionResult};
use crate::ports::probability_source::{MatchContext, ProbabilitySource};
use crate::ports::registry::{DivisionRegistry, TeamRegistry};

/// A prediction request as received from any serving layer.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
  pub home_team: String,
  pub away_team: String,
  pub division: String,
  /// Overround to apply; the configured default when absent.
  #[serde(default)]
  pub house_margin: Option<f64>,
  /// Season year; the current year when absent.
  #[serde(default)]
  pub year: Option<i32>,
  /// Calendar month; the current month when absent.
  #[serde(default)]
  pub month: Option<u32>,
}

/// Errors surfaced by [`PredictionService::predict`].
#[derive(Error, Debug)]
pub enum PredictError {
  /// The engine rejected the request.
  #[error(transparent)]
  Rejected(#[from] OddsError),

  /// The probability source could not answer, or answered with an
  /// invalid vector.
  #[error("probability source '{source_name}' unavailable: {reason}")]
  SourceUnavailable {
    source_name: &'static str,
    reason: String,
  },
}

impl PredictError {
  /// Stable tag for metrics labels and JSON bodies.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Rejected(e) => e.kind(),
      Self::SourceUnavailable { .. } => "source_unavailable",
    }
  }
}

/// A served prediction.
#[derive(Debug, Clone)]
pub struct Prediction {
  /// Unique identifier for log correlation.
  pub id: Uuid,
  /// Name of the source that produced the probabilities.
  pub source: &'static str,
  /// Time context the prediction was made for.
  pub context: MatchContext,
  /// Engine output.
  pub result: PredictionResult,
}

/// Suggestions for a partial or misspelled team name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSuggestions {
  /// Best matches, capped at the configured listing size.
  pub suggestions: Vec<String>,
  /// Number of matches before capping.
  pub total: usize,
}

/// Snapshot reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceHealth {
  pub source_ready: bool,
  pub team_count: usize,
  pub division_count: usize,
}

/// Prediction use case.
pub struct PredictionService {
  /// Team lookup.
  teams: Arc<dyn TeamRegistry>,
  /// Division lookup.
  divisions: Arc<dyn DivisionRegistry>,
  /// Probability provider.
  source: Arc<dyn ProbabilitySource>,
  /// Margin and tolerance defaults.
  pricing: PricingConfig,
  /// Prometheus metrics, when enabled.
  metrics: Option<Arc<MetricsRegistry>>,
}

impl PredictionService {
  /// Create a new prediction service.
  pub fn new(
    teams: Arc<dyn TeamRegistry>,
    divisions: Arc<dyn DivisionRegistry>,
    source: Arc<dyn ProbabilitySource>,
    pricing: PricingConfig,
  ) -> Self {
    Self {
      teams,
      divisions,
      source,
      pricing,
      metrics: None,
    }
  }

  /// Record predictions in `metrics`.
  pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
    self.metrics = Some(metrics);
    self
  }

  /// Validate, fetch probabilities, and price one fixture.
  #[instrument(
    skip(self, request),
    fields(
      home = %request.home_team,
      away = %request.away_team,
      division = %request.division
    )
  )]
  pub async fn predict(
    &self,
    request: &PredictionRequest,
  ) -> Result<Prediction, PredictError> {
    let started = Instant::now();
    let outcome = self.run(request).await;
    self.record(&outcome, started);
    outcome
  }

  async fn run(&self, request: &PredictionRequest) -> Result<Prediction, PredictError> {
    let margin = request
      .house_margin
      .unwrap_or(self.pricing.default_house_margin);

    let fixture = validate_fixture(
      self.teams.as_ref(),
      self.divisions.as_ref(),
      &request.home_team,
      &request.away_team,
      &request.division,
    )?;

    let context = MatchContext::with_defaults(request.year, request.month);

    let probabilities = self
      .source
      .probabilities(&fixture, &context)
      .await
      .map_err(|e| PredictError::SourceUnavailable {
        source_name: self.source.name(),
        reason: format!("{e:#}"),
      })?;
    probabilities
      .validate(self.pricing.probability_tolerance)
      .map_err(|e| PredictError::SourceUnavailable {
        source_name: self.source.name(),
        reason: e.to_string(),
      })?;

    let result = price_fixture(
      fixture,
      probabilities,
      margin,
      self.pricing.probability_tolerance,
    )?;

    Ok(Prediction {
      id: Uuid::new_v4(),
      source: self.source.name(),
      context,
      result,
    })
  }

  fn record(&self, outcome: &Result<Prediction, PredictError>, started: Instant) {
    let elapsed_us = started.elapsed().as_secs_f64() * 1e6;

    match outcome {
      Ok(prediction) => {
        let result = &prediction.result;
        info!(
          prediction_id = %prediction.id,
          source = prediction.source,
          home_win = result.probabilities.home,
          draw = result.probabilities.draw,
          away_win = result.probabilities.away,
          actual_margin = result.margin.actual_margin_percent,
          margin_drift = result.margin.edge_vs_configured(result.house_margin),
          elapsed_us,
          "Prediction served"
        );
        if let Some(metrics) = &self.metrics {
          metrics
            .predictions
            .with_label_values(&[&result.fixture.division, prediction.source])
            .inc();
          metrics.prediction_latency_us.observe(elapsed_us);
          metrics
            .actual_margin_percent
            .observe(result.margin.actual_margin_percent);
        }
      }
      Err(e) => {
        match e {
          PredictError::Rejected(_) => info!(kind = e.kind(), error = %e, "Prediction rejected"),
          PredictError::SourceUnavailable { .. } => {
            warn!(kind = e.kind(), error = %e, "Prediction failed");
          }
        }
        if let Some(metrics) = &self.metrics {
          metrics
            .prediction_errors
            .with_label_values(&[e.kind()])
            .inc();
        }
      }
    }
  }

  /// Sorted team names, optionally for one division.
  pub fn teams(&self, division: Option<&str>) -> Vec<String> {
    self.teams.teams(division)
  }

  /// Every division as `(code, display name)`, sorted by code.
  pub fn divisions(&self) -> Vec<(String, String)> {
    self
      .divisions
      .codes()
      .into_iter()
      .map(|code| {
        let name = self
          .divisions
          .display_name(&code)
          .unwrap_or_else(|| code.clone());
        (code, name)
      })
      .collect()
  }

  /// Team names resembling `name`.
  pub fn suggestions(&self, name: &str) -> TeamSuggestions {
    let mut suggestions = self.teams.suggest(name, usize::MAX);
    let total = suggestions.len();
    suggestions.truncate(self.pricing.max_listed_suggestions);
    TeamSuggestions { suggestions, total }
  }

  /// Current readiness and registry sizes.
  pub async fn health(&self) -> ServiceHealth {
    ServiceHealth {
      source_ready: self.source.is_ready().await,
      team_count: self.teams.team_count(),
      division_count: self.divisions.codes().len(),
    }
  }
}
