//! Fallback Source - Capability Substitution at the Port Boundary
//!
//! Asks a primary source first and, only if it fails or answers with a
//! vector that does not validate, a secondary one.
//! Typical wiring: remote predictor or classifier as primary, the
//! heuristic table as secondary. The odds engine never learns which
//! one answered.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::odds::{ProbabilityVector, DEFAULT_PROBABILITY_TOLERANCE};
use crate::domain::prediction::ResolvedFixture;
use crate::ports::probability_source::{MatchContext, ProbabilitySource};

/// Primary-then-secondary probability source.
pub struct FallbackSource {
    primary: Arc<dyn ProbabilitySource>,
    secondary: Arc<dyn ProbabilitySource>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl FallbackSource {
    pub fn new(primary: Arc<dyn ProbabilitySource>, secondary: Arc<dyn ProbabilitySource>) -> Self {
        Self {
            primary,
            secondary,
            metrics: None,
        }
    }

    /// Count fallbacks in `match_odds_source_fallbacks_total`.
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[async_trait]
impl ProbabilitySource for FallbackSource {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn probabilities(
        &self,
        fixture: &ResolvedFixture,
        context: &MatchContext,
    ) -> anyhow::Result<ProbabilityVector> {
        let primary = self
            .primary
            .probabilities(fixture, context)
            .await
            .and_then(|p| {
                p.validate(DEFAULT_PROBABILITY_TOLERANCE)?;
                Ok(p)
            });
        match primary {
            Ok(probabilities) => Ok(probabilities),
            Err(e) => {
                warn!(
                    primary = self.primary.name(),
                    secondary = self.secondary.name(),
                    error = %format!("{e:#}"),
                    "Primary probability source failed, falling back"
                );
                if let Some(metrics) = &self.metrics {
                    metrics
                        .source_fallbacks
                        .with_label_values(&[self.primary.name()])
                        .inc();
                }
                self.secondary.probabilities(fixture, context).await
            }
        }
    }

    async fn is_ready(&self) -> bool {
        self.primary.is_ready().await || self.secondary.is_ready().await
    }
}
