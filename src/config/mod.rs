//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! Team and division registries, pricing defaults and the choice of
//! probability source are all externalized here - nothing about the
//! league table is hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the server binds.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Service identity and HTTP binding.
  pub service: ServiceConfig,
  /// Margin and validation defaults.
  #[serde(default)]
  pub pricing: PricingConfig,
  /// Which probability source backs predictions.
  #[serde(default)]
  pub source: SourceConfig,
  /// Metrics and monitoring.
  #[serde(default)]
  pub metrics: MetricsConfig,
  /// Division registry entries. Empty = built-in league table.
  #[serde(default)]
  pub divisions: Vec<DivisionConfig>,
  /// Team registry entries.
  #[serde(default)]
  pub teams: Vec<TeamConfig>,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// Human-readable service name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// HTTP bind address for the prediction API.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
  /// Version string reported by `/health`.
  #[serde(default = "default_api_version")]
  pub api_version: String,
}

/// Pricing defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
  /// Margin used when a request omits `house_margin`.
  #[serde(default = "default_house_margin")]
  pub default_house_margin: f64,
  /// Allowed deviation of the probability sum from 1.
  #[serde(default = "default_probability_tolerance")]
  pub probability_tolerance: f64,
  /// Cap on names returned by the team-suggestions endpoint.
  #[serde(default = "default_listed_suggestions")]
  pub max_listed_suggestions: usize,
}

/// Probability source kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
  /// Fixed probability table with random noise.
  Heuristic,
  /// Softmax classifier loaded from a JSON model file.
  Model,
  /// Upstream prediction service over HTTP.
  Remote,
}

/// Probability source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
  /// Which source to use.
  #[serde(default = "default_source_kind")]
  pub kind: SourceKind,
  /// Fall back to the heuristic table when the primary source fails.
  #[serde(default = "default_true")]
  pub fallback_to_heuristic: bool,
  /// Path to the JSON model file (kind = "model").
  #[serde(default = "default_model_path")]
  pub model_path: String,
  /// Base URL of the upstream predictor (kind = "remote").
  pub remote_url: Option<String>,
  /// Upstream request timeout (milliseconds).
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
  /// Half-width of the uniform noise added by the heuristic table.
  #[serde(default = "default_jitter")]
  pub jitter: f64,
  /// Fixed RNG seed for reproducible heuristic output.
  pub seed: Option<u64>,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics export on `/metrics`.
  #[serde(default = "default_true")]
  pub enabled: bool,
}

/// One division registry entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DivisionConfig {
  /// Short code, e.g. `SP1`.
  pub code: String,
  /// Display name. Defaults to the built-in league table entry.
  pub name: Option<String>,
  /// Numeric encoding fed to the classifier. Defaults to sorted position.
  pub encoding: Option<u32>,
}

/// One team registry entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
  /// Team name, matched exactly.
  pub name: String,
  /// Numeric encoding fed to the classifier. Defaults to sorted position.
  pub encoding: Option<u32>,
  /// Division codes the team plays in. Empty = listed under every division.
  #[serde(default)]
  pub divisions: Vec<String>,
}

impl Default for PricingConfig {
  fn default() -> Self {
    Self {
      default_house_margin: default_house_margin(),
      probability_tolerance: default_probability_tolerance(),
      max_listed_suggestions: default_listed_suggestions(),
    }
  }
}

impl Default for SourceConfig {
  fn default() -> Self {
    Self {
      kind: default_source_kind(),
      fallback_to_heuristic: true,
      model_path: default_model_path(),
      remote_url: None,
      timeout_ms: default_timeout_ms(),
      jitter: default_jitter(),
      seed: None,
    }
  }
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_bind_address() -> String {
  "0.0.0.0:8000".to_string()
}

fn default_api_version() -> String {
  "1.0.0".to_string()
}

fn default_true() -> bool {
  true
}

fn default_house_margin() -> f64 {
  crate::domain::odds::DEFAULT_HOUSE_MARGIN
}

fn default_probability_tolerance() -> f64 {
  crate::domain::odds::DEFAULT_PROBABILITY_TOLERANCE
}

fn default_listed_suggestions() -> usize {
  10
}

fn default_source_kind() -> SourceKind {
  SourceKind::Heuristic
}

fn default_model_path() -> String {
  "model.json".to_string()
}

fn default_timeout_ms() -> u64 {
  15_000
}

fn default_jitter() -> f64 {
  0.05
}
