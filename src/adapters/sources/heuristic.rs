//! Heuristic Source - Fixed Probability Table with Noise
//!
//! The no-model fallback: a fixed home/draw/away table perturbed by
//! uniform noise and renormalized. Always available, never fails on
//! a valid fixture.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::domain::odds::ProbabilityVector;
use crate::domain::prediction::ResolvedFixture;
use crate::ports::probability_source::{MatchContext, ProbabilitySource};

/// Base table: home advantage over a roughly even away/draw split.
pub const BASE_TABLE: ProbabilityVector = ProbabilityVector::new(0.45, 0.27, 0.28);

/// Floor applied to each noisy weight before renormalizing.
const MIN_WEIGHT: f64 = 0.01;

/// Probability source backed by a fixed table plus random noise.
pub struct HeuristicSource {
    /// Table the noise is applied to.
    base: ProbabilityVector,
    /// Half-width of the uniform noise per outcome.
    jitter: f64,
    /// Noise generator; seeded for reproducible output when configured.
    rng: Mutex<StdRng>,
}

impl HeuristicSource {
    /// Create a source over [`BASE_TABLE`].
    pub fn new(jitter: f64, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            base: BASE_TABLE,
            jitter: jitter.abs(),
            rng: Mutex::new(rng),
        }
    }

    /// Replace the base table.
    pub fn with_base(mut self, base: ProbabilityVector) -> Self {
        self.base = base;
        self
    }

    /// Draw one noisy, normalized probability vector.
    pub fn sample(&self) -> anyhow::Result<ProbabilityVector> {
        let noisy = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let mut perturb =
                |p: f64| (p + rng.gen_range(-self.jitter..=self.jitter)).max(MIN_WEIGHT);
            ProbabilityVector::new(
                perturb(self.base.home),
                perturb(self.base.draw),
                perturb(self.base.away),
            )
        };
        Ok(noisy.normalized()?)
    }
}

#[async_trait]
impl ProbabilitySource for HeuristicSource {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn probabilities(
        &self,
        fixture: &ResolvedFixture,
        _context: &MatchContext,
    ) -> anyhow::Result<ProbabilityVector> {
        let probabilities = self.sample()?;
        trace!(
            home = %fixture.home_team,
            away = %fixture.away_team,
            ?probabilities,
            "Heuristic probabilities drawn"
        );
        Ok(probabilities)
    }

    async fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_normalized_and_positive() {
        let source = HeuristicSource::new(0.1, Some(7));
        for _ in 0..500 {
            let p = source.sample().unwrap();
            assert!((p.sum() - 1.0).abs() < 1e-9);
            assert!(p.iter().all(|(_, v)| v > 0.0));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = HeuristicSource::new(0.05, Some(42));
        let b = HeuristicSource::new(0.05, Some(42));
        for _ in 0..10 {
            assert_eq!(a.sample().unwrap(), b.sample().unwrap());
        }
    }

    #[test]
    fn test_zero_jitter_returns_base_table() {
        let source = HeuristicSource::new(0.0, None);
        let p = source.sample().unwrap();
        assert!((p.home - BASE_TABLE.home).abs() < 1e-12);
        assert!((p.away - BASE_TABLE.away).abs() < 1e-12);
    }

    #[test]
    fn test_extreme_base_stays_positive() {
        let source = HeuristicSource::new(0.2, Some(1))
            .with_base(ProbabilityVector::new(0.98, 0.01, 0.01));
        for _ in 0..200 {
            let p = source.sample().unwrap();
            assert!(p.iter().all(|(_, v)| v > 0.0));
        }
    }
}
