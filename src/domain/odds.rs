//! Odds engine: probabilities in, bookmaker odds and margin metrics out.
//!
//! Pure functions over three-outcome (1X2) markets. Nothing here holds
//! state or performs I/O, so every function is safe to call from any
//! number of requests concurrently.
//!
//! Pipeline:
//!   probabilities -> [`compute_fair_odds`] -> [`apply_house_margin`]
//!                 -> [`compute_margin_report`]
//!
//! Works in `f64` throughout; [`OddsVector::quoted`] converts to
//! `Decimal` only for the two-decimal display price.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::OddsError;

/// Default bookmaker overround applied when a request does not name one.
pub const DEFAULT_HOUSE_MARGIN: f64 = 0.12;

/// Default tolerance when checking that probabilities sum to 1.
pub const DEFAULT_PROBABILITY_TOLERANCE: f64 = 1e-3;

// ────────────────────────────────────────────
// Outcomes
// ────────────────────────────────────────────

/// One of the three results of a football match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl Outcome {
    /// All outcomes in market order.
    pub const ALL: [Self; 3] = [Self::HomeWin, Self::Draw, Self::AwayWin];
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HomeWin => write!(f, "home_win"),
            Self::Draw => write!(f, "draw"),
            Self::AwayWin => write!(f, "away_win"),
        }
    }
}

// ────────────────────────────────────────────
// Value types
// ────────────────────────────────────────────

/// Probability of each outcome, ordered home, draw, away.
///
/// The engine never renormalizes: callers are expected to supply a
/// vector summing to 1. [`ProbabilityVector::normalized`] exists for
/// probability sources that build vectors from raw weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityVector {
    #[serde(rename = "home_win")]
    pub home: f64,
    pub draw: f64,
    #[serde(rename = "away_win")]
    pub away: f64,
}

impl ProbabilityVector {
    pub const fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    /// Probability of a single outcome.
    pub const fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::HomeWin => self.home,
            Outcome::Draw => self.draw,
            Outcome::AwayWin => self.away,
        }
    }

    /// Outcomes paired with their probabilities, in market order.
    pub fn iter(&self) -> impl Iterator<Item = (Outcome, f64)> + '_ {
        Outcome::ALL.into_iter().map(|o| (o, self.get(o)))
    }

    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }

    /// Rescale so the components sum to 1.
    ///
    /// Fails if any component is negative or not finite, or if the total is zero.
    pub fn normalized(&self) -> Result<Self, OddsError> {
        if let Some((outcome, p)) = self.iter().find(|(_, p)| !p.is_finite() || *p < 0.0) {
            return Err(OddsError::invalid_probability(format!(
                "{outcome} weight {p} cannot be normalized"
            )));
        }
        let total = self.sum();
        if total <= 0.0 {
            return Err(OddsError::invalid_probability(
                "weights sum to zero",
            ));
        }
        Ok(Self::new(self.home / total, self.draw / total, self.away / total))
    }

    /// Check every component is in (0, 1] and the sum is 1 within `tolerance`.
    pub fn validate(&self, tolerance: f64) -> Result<(), OddsError> {
        for (outcome, p) in self.iter() {
            if !p.is_finite() || p <= 0.0 || p > 1.0 {
                return Err(OddsError::invalid_probability(format!(
                    "{outcome} probability {p} is outside (0, 1]"
                )));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > tolerance {
            return Err(OddsError::invalid_probability(format!(
                "probabilities sum to {sum}, expected 1 ± {tolerance}"
            )));
        }
        Ok(())
    }
}

/// Decimal odds for each outcome, ordered home, draw, away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OddsVector {
    #[serde(rename = "home_win")]
    pub home: f64,
    pub draw: f64,
    #[serde(rename = "away_win")]
    pub away: f64,
}

impl OddsVector {
    pub const fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    pub const fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::HomeWin => self.home,
            Outcome::Draw => self.draw,
            Outcome::AwayWin => self.away,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Outcome, f64)> + '_ {
        Outcome::ALL.into_iter().map(|o| (o, self.get(o)))
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.home), f(self.draw), f(self.away))
    }

    /// Gross return on `stake` for each outcome (stake included).
    pub fn payouts(&self, stake: f64) -> Self {
        self.map(|odds| stake * odds)
    }

    /// Odds as a bookmaker would quote them: truncated to two decimals.
    ///
    /// Truncation never raises a payout, so the quoted book keeps at
    /// least the computed margin.
    pub fn quoted(&self) -> Result<QuotedOdds, OddsError> {
        let quote = |outcome: Outcome| -> Result<Decimal, OddsError> {
            let value = self.get(outcome);
            Decimal::from_f64(value)
                .map(|d| {
                    let mut d = d.round_dp_with_strategy(2, RoundingStrategy::ToZero);
                    d.rescale(2);
                    d
                })
                .ok_or(OddsError::InvalidOdds { outcome, value })
        };
        Ok(QuotedOdds {
            home: quote(Outcome::HomeWin)?,
            draw: quote(Outcome::Draw)?,
            away: quote(Outcome::AwayWin)?,
        })
    }
}

/// Two-decimal display odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedOdds {
    #[serde(rename = "home_win")]
    pub home: Decimal,
    pub draw: Decimal,
    #[serde(rename = "away_win")]
    pub away: Decimal,
}

/// Validated bookmaker overround, in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct HouseMargin(f64);

impl HouseMargin {
    pub fn new(margin: f64) -> Result<Self, OddsError> {
        if margin.is_finite() && (0.0..1.0).contains(&margin) {
            Ok(Self(margin))
        } else {
            Err(OddsError::InvalidMargin { margin })
        }
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    /// The margin expressed in percent.
    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

/// Realized margin metrics of a set of bookmaker odds.
///
/// `actual_margin_percent` and `house_edge_percent` are the same
/// quantity, both already in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginReport {
    /// Sum of 1/odds over all outcomes.
    pub implied_prob_sum: f64,
    /// (implied_prob_sum - 1) * 100.
    pub actual_margin_percent: f64,
    /// Equal to `actual_margin_percent`.
    pub house_edge_percent: f64,
}

impl MarginReport {
    /// Realized margin minus the configured one, in percentage points.
    pub fn edge_vs_configured(&self, margin: HouseMargin) -> f64 {
        self.actual_margin_percent - margin.percent()
    }
}

// ────────────────────────────────────────────
// Engine operations
// ────────────────────────────────────────────

/// Break-even odds: `1 / p` for each outcome.
///
/// Fails with [`OddsError::InvalidProbability`] if any component is
/// `<= 0`, not finite, or so small that its reciprocal overflows. The
/// sum is not checked here.
pub fn compute_fair_odds(probabilities: &ProbabilityVector) -> Result<OddsVector, OddsError> {
    if let Some((outcome, p)) = probabilities
        .iter()
        .find(|(_, p)| !p.is_finite() || *p <= 0.0)
    {
        return Err(OddsError::invalid_probability(format!(
            "{outcome} probability {p} must be positive"
        )));
    }
    let fair = OddsVector::new(
        1.0 / probabilities.home,
        1.0 / probabilities.draw,
        1.0 / probabilities.away,
    );
    // Subnormal inputs overflow the reciprocal.
    if let Some((outcome, odds)) = fair.iter().find(|(_, o)| !o.is_finite()) {
        return Err(OddsError::invalid_probability(format!(
            "{outcome} probability {} is too small to price (odds {odds})",
            probabilities.get(outcome)
        )));
    }
    Ok(fair)
}

/// Shrink every payout by the same factor `(1 - margin)`.
///
/// Fails with [`OddsError::InvalidMargin`] unless `margin` is in [0, 1).
pub fn apply_house_margin(fair_odds: &OddsVector, margin: f64) -> Result<OddsVector, OddsError> {
    let margin = HouseMargin::new(margin)?;
    let factor = 1.0 - margin.value();
    Ok(fair_odds.map(|odds| odds * factor))
}

/// Implied-probability sum and realized margin of `bookmaker_odds`.
///
/// Fails with [`OddsError::InvalidOdds`] if any element is `<= 0` or not finite.
pub fn compute_margin_report(bookmaker_odds: &OddsVector) -> Result<MarginReport, OddsError> {
    if let Some((outcome, value)) = bookmaker_odds
        .iter()
        .find(|(_, o)| !o.is_finite() || *o <= 0.0)
    {
        return Err(OddsError::InvalidOdds { outcome, value });
    }
    let implied_prob_sum: f64 = bookmaker_odds.iter().map(|(_, o)| 1.0 / o).sum();
    let actual_margin_percent = (implied_prob_sum - 1.0) * 100.0;
    Ok(MarginReport {
        implied_prob_sum,
        actual_margin_percent,
        house_edge_percent: actual_margin_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const EPS: f64 = 1e-9;

    fn uniform() -> ProbabilityVector {
        ProbabilityVector::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }

    #[test]
    fn test_fair_odds_are_reciprocals() {
        let p = ProbabilityVector::new(0.5, 0.3, 0.2);
        let fair = compute_fair_odds(&p).unwrap();
        assert!((fair.home - 2.0).abs() < EPS);
        assert!((fair.draw - 1.0 / 0.3).abs() < EPS);
        assert!((fair.away - 5.0).abs() < EPS);
    }

    #[test]
    fn test_zero_probability_rejected() {
        let p = ProbabilityVector::new(0.5, 0.5, 0.0);
        let err = compute_fair_odds(&p).unwrap_err();
        assert!(matches!(err, OddsError::InvalidProbability { .. }));
    }

    #[test]
    fn test_nan_probability_rejected() {
        let p = ProbabilityVector::new(f64::NAN, 0.5, 0.5);
        assert!(compute_fair_odds(&p).is_err());
    }

    #[test]
    fn test_zero_margin_is_identity() {
        let fair = OddsVector::new(2.0, 3.5, 4.0);
        assert_eq!(apply_house_margin(&fair, 0.0).unwrap(), fair);
    }

    #[test]
    fn test_margin_out_of_range_rejected() {
        let fair = OddsVector::new(2.0, 3.5, 4.0);
        for margin in [1.0, 1.5, -0.01, f64::NAN] {
            let err = apply_house_margin(&fair, margin).unwrap_err();
            assert!(
                matches!(err, OddsError::InvalidMargin { .. }),
                "margin {margin} should be rejected"
            );
        }
    }

    #[test]
    fn test_uniform_book_with_twelve_percent_margin() {
        let fair = compute_fair_odds(&uniform()).unwrap();
        assert!((fair.home - 3.0).abs() < EPS);

        let book = apply_house_margin(&fair, 0.12).unwrap();
        for (_, odds) in book.iter() {
            assert!((odds - 2.64).abs() < 1e-9, "got {odds}");
        }

        let report = compute_margin_report(&book).unwrap();
        assert!((report.implied_prob_sum - 1.136_363_6).abs() < 1e-6);
        assert!((report.actual_margin_percent - 13.636_363_6).abs() < 1e-5);
        assert_eq!(report.house_edge_percent, report.actual_margin_percent);
    }

    #[test]
    fn test_margin_report_zero_for_fair_book() {
        let fair = compute_fair_odds(&ProbabilityVector::new(0.5, 0.25, 0.25)).unwrap();
        let report = compute_margin_report(&fair).unwrap();
        assert!(report.actual_margin_percent.abs() < 1e-9);
    }

    #[test]
    fn test_margin_report_rejects_non_positive_odds() {
        let err = compute_margin_report(&OddsVector::new(2.0, 0.0, 3.0)).unwrap_err();
        assert_eq!(
            err,
            OddsError::InvalidOdds {
                outcome: Outcome::Draw,
                value: 0.0
            }
        );
    }

    #[test]
    fn test_edge_vs_configured() {
        let book = apply_house_margin(&compute_fair_odds(&uniform()).unwrap(), 0.12).unwrap();
        let report = compute_margin_report(&book).unwrap();
        let margin = HouseMargin::new(0.12).unwrap();
        let diff = report.edge_vs_configured(margin);
        assert!((diff - 1.636_363_6).abs() < 1e-5, "got {diff}");
    }

    #[test]
    fn test_validate_sum_tolerance() {
        assert!(ProbabilityVector::new(0.5, 0.3, 0.2).validate(1e-3).is_ok());
        assert!(ProbabilityVector::new(0.5, 0.3, 0.2005).validate(1e-3).is_ok());
        assert!(ProbabilityVector::new(0.5, 0.3, 0.25).validate(1e-3).is_err());
    }

    #[test]
    fn test_normalized_rescales() {
        let p = ProbabilityVector::new(2.0, 1.0, 1.0).normalized().unwrap();
        assert!((p.home - 0.5).abs() < EPS);
        assert!((p.sum() - 1.0).abs() < EPS);
        assert!(ProbabilityVector::new(0.0, 0.0, 0.0).normalized().is_err());
    }

    #[test]
    fn test_quoted_truncates_to_two_decimals() {
        let quoted = OddsVector::new(2.6399, 3.005, 1.999).quoted().unwrap();
        assert_eq!(quoted.home, dec!(2.63));
        assert_eq!(quoted.draw, dec!(3.00));
        assert_eq!(quoted.away, dec!(1.99));
        assert_eq!(quoted.draw.to_string(), "3.00");
    }

    #[test]
    fn test_quoted_always_shows_two_decimals() {
        let quoted = OddsVector::new(3.0, 1.8, 2.5).quoted().unwrap();
        assert_eq!(quoted.home.to_string(), "3.00");
        assert_eq!(quoted.draw.to_string(), "1.80");
        assert_eq!(quoted.away.to_string(), "2.50");
        let json = serde_json::to_string(&quoted).unwrap();
        assert_eq!(json, r#"{"home_win":"3.00","draw":"1.80","away_win":"2.50"}"#);
    }

    #[test]
    fn test_subnormal_probability_rejected() {
        let p = ProbabilityVector::new(1e-310, 0.5, 0.5);
        let err = compute_fair_odds(&p).unwrap_err();
        assert!(matches!(err, OddsError::InvalidProbability { .. }));
        assert_eq!(err.kind(), "invalid_probability");
    }

    #[test]
    fn test_payouts_scale_with_stake() {
        let payouts = OddsVector::new(2.0, 3.0, 4.0).payouts(100.0);
        assert_eq!(payouts, OddsVector::new(200.0, 300.0, 400.0));
    }

    #[test]
    fn test_probability_vector_serializes_with_outcome_names() {
        let json = serde_json::to_value(ProbabilityVector::new(0.5, 0.3, 0.2)).unwrap();
        assert_eq!(json["home_win"], 0.5);
        assert_eq!(json["away_win"], 0.2);
    }
}
