//! Fixture validation and pricing.
//!
//! Checks run in a fixed order that callers rely on for deterministic
//! error messages:
//! 1. home team, then away team, must exist in the team registry
//! 2. the division must exist in the division registry
//! 3. home and away must be different teams
//!
//! Only after all three pass are the probabilities priced.

use serde::Serialize;
use tracing::debug;

use super::error::{OddsError, TeamSide};
use super::odds::{
    apply_house_margin, compute_fair_odds, compute_margin_report, HouseMargin, MarginReport,
    OddsVector, ProbabilityVector, QuotedOdds, DEFAULT_PROBABILITY_TOLERANCE,
};
use crate::ports::registry::{DivisionRegistry, TeamRegistry};

/// How many suggestions an unknown-team error carries.
pub const MAX_TEAM_SUGGESTIONS: usize = 3;

/// A fixture whose teams and division all resolved against the registries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFixture {
    pub home_team: String,
    pub home_code: u32,
    pub away_team: String,
    pub away_code: u32,
    pub division: String,
    pub division_code: u32,
    pub division_name: String,
}

/// Everything a caller receives for a priced fixture.
///
/// Fair odds stay internal; only the margin-adjusted book is exposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub fixture: ResolvedFixture,
    pub probabilities: ProbabilityVector,
    pub odds: OddsVector,
    pub quoted_odds: QuotedOdds,
    pub house_margin: HouseMargin,
    pub margin: MarginReport,
}

fn resolve_team(
    teams: &dyn TeamRegistry,
    side: TeamSide,
    name: &str,
) -> Result<u32, OddsError> {
    teams.team_code(name).ok_or_else(|| OddsError::UnknownTeam {
        side,
        team: name.to_string(),
        suggestions: teams.suggest(name, MAX_TEAM_SUGGESTIONS),
    })
}

/// Resolve a fixture against the registries, in the documented order.
pub fn validate_fixture(
    teams: &dyn TeamRegistry,
    divisions: &dyn DivisionRegistry,
    home_team: &str,
    away_team: &str,
    division: &str,
) -> Result<ResolvedFixture, OddsError> {
    let home_code = resolve_team(teams, TeamSide::Home, home_team)?;
    let away_code = resolve_team(teams, TeamSide::Away, away_team)?;

    let division_code =
        divisions
            .division_code(division)
            .ok_or_else(|| OddsError::UnknownDivision {
                division: division.to_string(),
                valid_codes: divisions.codes(),
            })?;

    if home_code == away_code {
        return Err(OddsError::IdenticalTeams {
            team: home_team.to_string(),
        });
    }

    let division_name = divisions
        .display_name(division)
        .unwrap_or_else(|| division.to_string());

    Ok(ResolvedFixture {
        home_team: home_team.to_string(),
        home_code,
        away_team: away_team.to_string(),
        away_code,
        division: division.to_string(),
        division_code,
        division_name,
    })
}

/// Price an already-resolved fixture.
///
/// Checks the probability sum against `tolerance`, then runs fair odds,
/// margin and margin report in that order.
pub fn price_fixture(
    fixture: ResolvedFixture,
    probabilities: ProbabilityVector,
    margin: f64,
    tolerance: f64,
) -> Result<PredictionResult, OddsError> {
    probabilities.validate(tolerance)?;
    let house_margin = HouseMargin::new(margin)?;

    let fair = compute_fair_odds(&probabilities)?;
    let odds = apply_house_margin(&fair, house_margin.value())?;
    let report = compute_margin_report(&odds)?;
    let quoted_odds = odds.quoted()?;

    debug!(
        home = %fixture.home_team,
        away = %fixture.away_team,
        margin = house_margin.value(),
        actual_margin = report.actual_margin_percent,
        "Fixture priced"
    );

    Ok(PredictionResult {
        fixture,
        probabilities,
        odds,
        quoted_odds,
        house_margin,
        margin: report,
    })
}

/// Validate a fixture and price it with the default sum tolerance.
///
/// Registry failures always take precedence over numeric ones.
pub fn validate_and_predict(
    teams: &dyn TeamRegistry,
    divisions: &dyn DivisionRegistry,
    home_team: &str,
    away_team: &str,
    division: &str,
    probabilities: ProbabilityVector,
    margin: f64,
) -> Result<PredictionResult, OddsError> {
    let fixture = validate_fixture(teams, divisions, home_team, away_team, division)?;
    price_fixture(fixture, probabilities, margin, DEFAULT_PROBABILITY_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct Teams(BTreeMap<&'static str, u32>);

    impl TeamRegistry for Teams {
        fn team_code(&self, name: &str) -> Option<u32> {
            self.0.get(name).copied()
        }

        fn teams(&self, _division: Option<&str>) -> Vec<String> {
            self.0.keys().map(|t| (*t).to_string()).collect()
        }

        fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
            let q = query.to_lowercase();
            self.0
                .keys()
                .filter(|t| {
                    t.to_lowercase()
                        .split_whitespace()
                        .any(|w| q.contains(w))
                })
                .take(limit)
                .map(|t| (*t).to_string())
                .collect()
        }

        fn team_count(&self) -> usize {
            self.0.len()
        }
    }

    struct Divisions;

    impl DivisionRegistry for Divisions {
        fn division_code(&self, code: &str) -> Option<u32> {
            (code == "SP1").then_some(0)
        }

        fn display_name(&self, code: &str) -> Option<String> {
            (code == "SP1").then(|| "La Liga (España)".to_string())
        }

        fn codes(&self) -> Vec<String> {
            vec!["SP1".to_string()]
        }
    }

    fn teams() -> Teams {
        Teams(BTreeMap::from([
            ("Barcelona", 0),
            ("Real Madrid", 1),
            ("Sevilla", 2),
        ]))
    }

    fn even() -> ProbabilityVector {
        ProbabilityVector::new(0.4, 0.3, 0.3)
    }

    #[test]
    fn test_valid_fixture_priced() {
        let result = validate_and_predict(
            &teams(),
            &Divisions,
            "Real Madrid",
            "Barcelona",
            "SP1",
            even(),
            0.12,
        )
        .unwrap();
        assert_eq!(result.fixture.division_name, "La Liga (España)");
        assert_eq!(result.fixture.home_code, 1);
        assert!(result.margin.actual_margin_percent > 0.0);
        assert!((result.odds.home - 2.5 * 0.88).abs() < 1e-9);
    }

    #[test]
    fn test_identical_teams_rejected() {
        let err = validate_and_predict(
            &teams(),
            &Divisions,
            "Real Madrid",
            "Real Madrid",
            "SP1",
            even(),
            0.12,
        )
        .unwrap_err();
        assert!(matches!(err, OddsError::IdenticalTeams { .. }));
    }

    #[test]
    fn test_identical_teams_wins_over_bad_probabilities() {
        let err = validate_and_predict(
            &teams(),
            &Divisions,
            "Sevilla",
            "Sevilla",
            "SP1",
            ProbabilityVector::new(0.5, 0.5, 0.0),
            2.0,
        )
        .unwrap_err();
        assert!(matches!(err, OddsError::IdenticalTeams { .. }));
    }

    #[test]
    fn test_unknown_team_carries_suggestions() {
        let err = validate_and_predict(
            &teams(),
            &Divisions,
            "Raal Madrid",
            "Barcelona",
            "SP1",
            even(),
            0.12,
        )
        .unwrap_err();
        match err {
            OddsError::UnknownTeam {
                side, suggestions, ..
            } => {
                assert_eq!(side, TeamSide::Home);
                assert!(suggestions.contains(&"Real Madrid".to_string()));
            }
            other => panic!("expected UnknownTeam, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_team_reported_before_unknown_division() {
        let err = validate_fixture(&teams(), &Divisions, "Barcelona", "Nobody", "XX")
            .unwrap_err();
        assert!(matches!(
            err,
            OddsError::UnknownTeam {
                side: TeamSide::Away,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_division_reported_before_identical_teams() {
        let err = validate_fixture(&teams(), &Divisions, "Sevilla", "Sevilla", "XX")
            .unwrap_err();
        match err {
            OddsError::UnknownDivision { valid_codes, .. } => {
                assert_eq!(valid_codes, vec!["SP1".to_string()]);
            }
            other => panic!("expected UnknownDivision, got {other:?}"),
        }
    }

    #[test]
    fn test_probabilities_off_sum_rejected() {
        let fixture =
            validate_fixture(&teams(), &Divisions, "Sevilla", "Barcelona", "SP1").unwrap();
        let err = price_fixture(fixture, ProbabilityVector::new(0.6, 0.3, 0.3), 0.1, 1e-3)
            .unwrap_err();
        assert!(matches!(err, OddsError::InvalidProbability { .. }));
    }

    #[test]
    fn test_margin_at_one_rejected() {
        let fixture =
            validate_fixture(&teams(), &Divisions, "Sevilla", "Barcelona", "SP1").unwrap();
        let err = price_fixture(fixture, even(), 1.0, 1e-3).unwrap_err();
        assert_eq!(err, OddsError::InvalidMargin { margin: 1.0 });
    }
}
