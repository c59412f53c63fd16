//! Model Source - Saved Softmax Classifier with Feature Scaler
//!
//! Loads a trained three-class classifier and its standard scaler from
//! a JSON model file, then scores fixtures in-process. The feature
//! layout is fixed by training:
//!
//! `[year, month, 10 season-average match stats, home, away, division]`
//!
//! Match stats are not known before kick-off, so league-wide averages
//! stand in for them.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domain::odds::ProbabilityVector;
use crate::domain::prediction::ResolvedFixture;
use crate::ports::probability_source::{MatchContext, ProbabilitySource};

/// Number of input features the classifier expects.
pub const NUM_FEATURES: usize = 15;

/// Season averages: shots, shots on target, fouls, corners, yellow
/// cards; home then away for each.
const MATCH_STAT_AVERAGES: [f64; 10] = [12.0, 10.0, 5.0, 4.0, 12.0, 14.0, 6.0, 5.0, 2.0, 2.0];

/// Standard scaler parameters: `(x - mean) / scale`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// On-disk model format.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelFile {
    /// Feature standardization fitted at training time.
    pub scaler: ScalerParams,
    /// One weight row per outcome (home, draw, away).
    pub weights: Vec<Vec<f64>>,
    /// One bias per outcome.
    pub bias: Vec<f64>,
}

/// In-process classifier backed by a [`ModelFile`].
#[derive(Debug, Clone)]
pub struct ModelSource {
    mean: [f64; NUM_FEATURES],
    scale: [f64; NUM_FEATURES],
    weights: [[f64; NUM_FEATURES]; 3],
    bias: [f64; 3],
}

fn fixed<const N: usize>(values: &[f64], what: &str) -> Result<[f64; N]> {
    values
        .try_into()
        .map_err(|_| anyhow::anyhow!("{what} has {} values, expected {N}", values.len()))
}

impl ModelSource {
    /// Load and validate a model file.
    ///
    /// # Errors
    /// Fails if the file cannot be read or parsed, or if any dimension
    /// disagrees with the expected feature layout.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file: {}", path.display()))?;
        let file: ModelFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse model file: {}", path.display()))?;
        let model = Self::from_model(&file)?;
        info!(path = %path.display(), features = NUM_FEATURES, "Classifier loaded");
        Ok(model)
    }

    /// Build a source from an in-memory model.
    pub fn from_model(file: &ModelFile) -> Result<Self> {
        let mean: [f64; NUM_FEATURES] = fixed(&file.scaler.mean, "scaler.mean")?;
        let mut scale: [f64; NUM_FEATURES] = fixed(&file.scaler.scale, "scaler.scale")?;
        // Zero-variance features are left unscaled.
        for s in &mut scale {
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        anyhow::ensure!(
            file.weights.len() == 3,
            "weights has {} rows, expected 3",
            file.weights.len()
        );
        let weights = [
            fixed(&file.weights[0], "weights[0]")?,
            fixed(&file.weights[1], "weights[1]")?,
            fixed(&file.weights[2], "weights[2]")?,
        ];
        let bias = fixed(&file.bias, "bias")?;

        anyhow::ensure!(
            mean.iter()
                .chain(&scale)
                .chain(weights.iter().flatten())
                .chain(&bias)
                .all(|v| v.is_finite()),
            "model contains non-finite parameters"
        );

        Ok(Self {
            mean,
            scale,
            weights,
            bias,
        })
    }

    /// Raw feature row for a fixture.
    pub fn features(fixture: &ResolvedFixture, context: &MatchContext) -> [f64; NUM_FEATURES] {
        let mut row = [0.0; NUM_FEATURES];
        row[0] = f64::from(context.year);
        row[1] = f64::from(context.month);
        row[2..12].copy_from_slice(&MATCH_STAT_AVERAGES);
        row[12] = f64::from(fixture.home_code);
        row[13] = f64::from(fixture.away_code);
        row[14] = f64::from(fixture.division_code);
        row
    }

    /// Softmax over the three outcome logits.
    pub fn predict(&self, features: &[f64; NUM_FEATURES]) -> ProbabilityVector {
        let scaled: Vec<f64> = features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect();

        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(&scaled).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect();

        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();

        ProbabilityVector::new(exps[0] / total, exps[1] / total, exps[2] / total)
    }
}

#[async_trait]
impl ProbabilitySource for ModelSource {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn probabilities(
        &self,
        fixture: &ResolvedFixture,
        context: &MatchContext,
    ) -> Result<ProbabilityVector> {
        Ok(self.predict(&Self::features(fixture, context)))
    }

    async fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture() -> ResolvedFixture {
        ResolvedFixture {
            home_team: "Real Madrid".to_string(),
            home_code: 3,
            away_team: "Barcelona".to_string(),
            away_code: 2,
            division: "SP1".to_string(),
            division_code: 32,
            division_name: "La Liga (Spain)".to_string(),
        }
    }

    fn model(home_bias: f64) -> ModelFile {
        ModelFile {
            scaler: ScalerParams {
                mean: vec![0.0; NUM_FEATURES],
                scale: vec![1.0; NUM_FEATURES],
            },
            weights: vec![vec![0.0; NUM_FEATURES]; 3],
            bias: vec![home_bias, 0.0, 0.0],
        }
    }

    #[test]
    fn test_zero_model_is_uniform() {
        let source = ModelSource::from_model(&model(0.0)).unwrap();
        let ctx = MatchContext { year: 2024, month: 5 };
        let p = source.predict(&ModelSource::features(&fixture(), &ctx));
        assert!((p.home - 1.0 / 3.0).abs() < 1e-12);
        assert!((p.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bias_favours_home() {
        let source = ModelSource::from_model(&model(1.0)).unwrap();
        let ctx = MatchContext { year: 2024, month: 5 };
        let p = source.predict(&ModelSource::features(&fixture(), &ctx));
        assert!(p.home > p.draw);
        assert!((p.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_large_logits_do_not_overflow() {
        let mut file = model(0.0);
        file.weights[0][0] = 10.0;
        let source = ModelSource::from_model(&file).unwrap();
        let ctx = MatchContext { year: 2024, month: 5 };
        let p = source.predict(&ModelSource::features(&fixture(), &ctx));
        assert!(p.home.is_finite());
        assert!((p.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_feature_layout() {
        let ctx = MatchContext { year: 2024, month: 5 };
        let row = ModelSource::features(&fixture(), &ctx);
        assert_eq!(row[0], 2024.0);
        assert_eq!(row[1], 5.0);
        assert_eq!(row[2], 12.0);
        assert_eq!(row[12], 3.0);
        assert_eq!(row[13], 2.0);
        assert_eq!(row[14], 32.0);
    }

    #[test]
    fn test_wrong_dimensions_rejected() {
        let mut file = model(0.0);
        file.scaler.mean.pop();
        assert!(ModelSource::from_model(&file).is_err());

        let mut file = model(0.0);
        file.weights.pop();
        assert!(ModelSource::from_model(&file).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let file = model(0.5);
        let json = serde_json::json!({
            "scaler": { "mean": file.scaler.mean, "scale": file.scaler.scale },
            "weights": file.weights,
            "bias": file.bias,
        });
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{json}").unwrap();
        let source = ModelSource::load(tmp.path()).unwrap();
        assert_eq!(source.name(), "model");
    }
}
