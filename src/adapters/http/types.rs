//! Prediction API Request/Response Types
//!
//! JSON bodies of the public HTTP endpoints. Every response carries a
//! `success` flag; errors add a stable `kind` tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::odds::{OddsVector, ProbabilityVector, QuotedOdds};
use crate::usecases::{Prediction, PredictionRequest};

/// `POST /predict` body.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictBody {
    #[serde(flatten)]
    pub request: PredictionRequest,
    /// Optional stake; the response then includes gross payouts.
    #[serde(default)]
    pub stake: Option<f64>,
}

/// `POST /predict` response.
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction_id: String,
    pub source: &'static str,
    pub home_team: String,
    pub away_team: String,
    pub division: String,
    pub division_full_name: String,
    pub probabilities: ProbabilityVector,
    pub odds: OddsVector,
    pub quoted_odds: QuotedOdds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payouts: Option<OddsVector>,
    /// Applied margin as a fraction, e.g. 0.12.
    pub house_margin: f64,
    /// Realized margin of the book, in percent.
    pub actual_margin: f64,
    /// House edge, in percent. Equal to `actual_margin`.
    pub house_edge: f64,
    pub message: String,
}

impl PredictResponse {
    pub fn new(prediction: &Prediction, stake: Option<f64>) -> Self {
        let result = &prediction.result;
        let fixture = &result.fixture;
        Self {
            success: true,
            prediction_id: prediction.id.to_string(),
            source: prediction.source,
            home_team: fixture.home_team.clone(),
            away_team: fixture.away_team.clone(),
            division: fixture.division.clone(),
            division_full_name: fixture.division_name.clone(),
            probabilities: result.probabilities,
            odds: result.odds,
            quoted_odds: result.quoted_odds,
            payouts: stake.map(|s| result.odds.payouts(s)),
            house_margin: result.house_margin.value(),
            actual_margin: result.margin.actual_margin_percent,
            house_edge: result.margin.house_edge_percent,
            message: format!(
                "{} vs {} ({}) priced with a {:.1}% margin",
                fixture.home_team,
                fixture.away_team,
                fixture.division_name,
                result.house_margin.percent()
            ),
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_codes: Option<Vec<String>>,
}

/// `GET /teams` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamsQuery {
    pub division: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamsResponse {
    pub success: bool,
    pub teams: Vec<String>,
    pub total: usize,
    /// The requested division, or `all`.
    pub division: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DivisionsResponse {
    pub success: bool,
    pub divisions: BTreeMap<String, String>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionsResponse {
    pub success: bool,
    pub team_name: String,
    pub suggestions: Vec<String>,
    pub total_suggestions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `healthy` when the probability source is ready, else `degraded`.
    pub status: &'static str,
    pub model_loaded: bool,
    pub available_teams_count: usize,
    pub available_divisions_count: usize,
    pub api_version: String,
}

/// `GET /` banner.
#[derive(Debug, Clone, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub version: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}
