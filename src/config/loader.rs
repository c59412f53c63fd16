//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{AppConfig, SourceKind};

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    teams = config.teams.len(),
    divisions = config.divisions.len(),
    source = ?config.source.kind,
    margin = config.pricing.default_house_margin,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A non-empty, duplicate-free team registry
/// - Team divisions that exist in the division registry
/// - A default margin in [0, 1) and a sane sum tolerance
/// - Source-specific settings (remote URL, jitter range)
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.service.name.is_empty(),
    "service.name must not be empty"
  );

  // Pricing validation
  let margin = config.pricing.default_house_margin;
  anyhow::ensure!(
    margin.is_finite() && (0.0..1.0).contains(&margin),
    "default_house_margin must be in [0, 1), got {margin}"
  );
  anyhow::ensure!(
    config.pricing.probability_tolerance > 0.0
      && config.pricing.probability_tolerance < 0.1,
    "probability_tolerance must be in (0, 0.1), got {}",
    config.pricing.probability_tolerance
  );
  anyhow::ensure!(
    config.pricing.max_listed_suggestions > 0,
    "max_listed_suggestions must be positive"
  );

  // Team validation
  anyhow::ensure!(
    !config.teams.is_empty(),
    "At least one team must be configured"
  );

  let mut seen = HashSet::new();
  for (i, team) in config.teams.iter().enumerate() {
    anyhow::ensure!(!team.name.trim().is_empty(), "Team {i} has an empty name");
    anyhow::ensure!(
      seen.insert(team.name.as_str()),
      "Team '{}' is configured twice",
      team.name
    );
  }

  // Division references
  if !config.divisions.is_empty() {
    let codes: HashSet<&str> =
      config.divisions.iter().map(|d| d.code.as_str()).collect();
    anyhow::ensure!(
      codes.len() == config.divisions.len(),
      "Division codes must be unique"
    );
    for team in &config.teams {
      for code in &team.divisions {
        anyhow::ensure!(
          codes.contains(code.as_str()),
          "Team '{}' references unknown division '{}'",
          team.name,
          code
        );
      }
    }
  }

  // Source validation
  anyhow::ensure!(
    config.source.jitter >= 0.0 && config.source.jitter < 0.25,
    "source.jitter must be in [0, 0.25), got {}",
    config.source.jitter
  );
  anyhow::ensure!(config.source.timeout_ms > 0, "source.timeout_ms must be positive");
  if config.source.kind == SourceKind::Remote {
    anyhow::ensure!(
      config
        .source
        .remote_url
        .as_deref()
        .is_some_and(|url| !url.is_empty()),
      "source.remote_url is required when source.kind = \"remote\""
    );
  }
  if config.source.kind == SourceKind::Model {
    anyhow::ensure!(
      !config.source.model_path.is_empty(),
      "source.model_path must not be empty when source.kind = \"model\""
    );
  }

  Ok(())
}
