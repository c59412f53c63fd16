//! Remote Source - Upstream Prediction Service Client
//!
//! Wraps reqwest to ask an upstream predictor (the neural-network
//! service) for outcome probabilities. One attempt per request with a
//! hard timeout; retrying or substituting another source is left to
//! the caller (see `FallbackSource`).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::odds::{ProbabilityVector, DEFAULT_PROBABILITY_TOLERANCE};
use crate::domain::prediction::ResolvedFixture;
use crate::ports::probability_source::{MatchContext, ProbabilitySource};

/// Configuration for the upstream client.
#[derive(Debug, Clone)]
pub struct RemoteSourceConfig {
  /// Base URL of the upstream service, without trailing slash.
  pub base_url: String,
  /// Per-request timeout.
  pub timeout: Duration,
}

/// Request body for the upstream `/predict` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamRequest<'a> {
  pub home_team: &'a str,
  pub away_team: &'a str,
  pub division: &'a str,
  pub year: i32,
  pub month: u32,
}

/// The part of the upstream response this client reads.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamPrediction {
  pub probabilities: ProbabilityVector,
}

impl UpstreamPrediction {
  /// The probabilities, if they form a valid distribution.
  pub fn checked(self) -> Result<ProbabilityVector> {
    self
      .probabilities
      .validate(DEFAULT_PROBABILITY_TOLERANCE)
      .context("Upstream returned invalid probabilities")?;
    Ok(self.probabilities)
  }
}

/// Upstream `/health` body.
#[derive(Debug, Clone, Deserialize)]
struct UpstreamHealth {
  #[serde(default)]
  model_loaded: bool,
}

/// Upstream error body (`{"detail": "..."}`).
#[derive(Debug, Clone, Deserialize)]
struct UpstreamError {
  detail: String,
}

/// HTTP client for the upstream predictor.
pub struct RemoteSource {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: RemoteSourceConfig,
}

impl RemoteSource {
  /// Create a new upstream client.
  pub fn new(config: RemoteSourceConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(5)
      .user_agent(concat!("match-odds/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("Failed to build HTTP client")?;

    let config = RemoteSourceConfig {
      base_url: config.base_url.trim_end_matches('/').to_string(),
      ..config
    };

    Ok(Self { http, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url, path)
  }
}

#[async_trait]
impl ProbabilitySource for RemoteSource {
  fn name(&self) -> &'static str {
    "remote"
  }

  #[instrument(skip(self, fixture), fields(home = %fixture.home_team, away = %fixture.away_team))]
  async fn probabilities(
    &self,
    fixture: &ResolvedFixture,
    context: &MatchContext,
  ) -> Result<ProbabilityVector> {
    let body = UpstreamRequest {
      home_team: &fixture.home_team,
      away_team: &fixture.away_team,
      division: &fixture.division,
      year: context.year,
      month: context.month,
    };

    let response = self
      .http
      .post(self.url("/predict"))
      .json(&body)
      .send()
      .await
      .context("Upstream predictor unreachable")?;

    match response.status() {
      StatusCode::OK => {
        let prediction: UpstreamPrediction = response
          .json()
          .await
          .context("Malformed upstream prediction")?;
        debug!(probabilities = ?prediction.probabilities, "Upstream prediction received");
        prediction.checked()
      }
      status => {
        let text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<UpstreamError>(&text)
          .map(|e| e.detail)
          .unwrap_or(text);
        warn!(status = %status, detail = %detail, "Upstream prediction failed");
        Err(anyhow::anyhow!("Upstream error {status}: {detail}"))
      }
    }
  }

  /// Ready when `/health` answers and reports a loaded model.
  async fn is_ready(&self) -> bool {
    let Ok(response) = self.http.get(self.url("/health")).send().await else {
      return false;
    };
    if !response.status().is_success() {
      return false;
    }
    response
      .json::<UpstreamHealth>()
      .await
      .is_ok_and(|health| health.model_loaded)
  }
}
