//! Odds engine errors.
//!
//! Every failure the engine can report is a variant of [`OddsError`].
//! Nothing here is retried or recovered; the caller decides how an
//! error is presented (HTTP status, CLI message, ...).

use thiserror::Error;

use super::odds::Outcome;

/// How many division codes an [`OddsError::UnknownDivision`] message lists.
pub const DIVISION_CODES_SHOWN: usize = 10;

/// Which side of the fixture a team was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    Home,
    Away,
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Away => write!(f, "away"),
        }
    }
}

/// Errors raised by the odds engine and its request validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OddsError {
    /// A probability component is non-positive, not finite, or the
    /// vector does not sum to 1 within tolerance.
    #[error("invalid probability: {reason}")]
    InvalidProbability {
        /// Human-readable cause.
        reason: String,
    },

    /// House margin outside [0, 1).
    #[error("invalid house margin {margin}: must be in [0, 1)")]
    InvalidMargin {
        /// The rejected margin.
        margin: f64,
    },

    /// An odds value is non-positive or not finite.
    #[error("invalid odds for {outcome}: {value}")]
    InvalidOdds {
        /// Outcome the odds belong to.
        outcome: Outcome,
        /// The rejected odds value.
        value: f64,
    },

    /// Team not present in the registry.
    #[error("{side} team '{team}' not found{}", format_suggestions(.suggestions))]
    UnknownTeam {
        /// Side the team was supplied for.
        side: TeamSide,
        /// Name as supplied by the caller.
        team: String,
        /// Up to three registry names resembling `team`.
        suggestions: Vec<String>,
    },

    /// Division code not present in the registry.
    #[error("division '{division}' not found. Available divisions: {}", format_codes(.valid_codes))]
    UnknownDivision {
        /// Code as supplied by the caller.
        division: String,
        /// Every valid code, sorted.
        valid_codes: Vec<String>,
    },

    /// Home and away resolve to the same team.
    #[error("home and away team must differ, got '{team}' twice")]
    IdenticalTeams {
        /// The duplicated team.
        team: String,
    },
}

impl OddsError {
    /// Stable snake_case tag, used as a metrics label and in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidProbability { .. } => "invalid_probability",
            Self::InvalidMargin { .. } => "invalid_margin",
            Self::InvalidOdds { .. } => "invalid_odds",
            Self::UnknownTeam { .. } => "unknown_team",
            Self::UnknownDivision { .. } => "unknown_division",
            Self::IdenticalTeams { .. } => "identical_teams",
        }
    }

    pub(crate) fn invalid_probability(reason: impl Into<String>) -> Self {
        Self::InvalidProbability {
            reason: reason.into(),
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(". Suggestions: {}", suggestions.join(", "))
    }
}

fn format_codes(codes: &[String]) -> String {
    let shown: Vec<&str> = codes
        .iter()
        .take(DIVISION_CODES_SHOWN)
        .map(String::as_str)
        .collect();
    shown.join(", ")
}
