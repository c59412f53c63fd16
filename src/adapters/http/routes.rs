//! Prediction API route handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::metrics::HealthState;
use crate::domain::error::OddsError;
use crate::usecases::{PredictError, PredictionService};

use super::types::{
    DivisionsResponse, ErrorResponse, HealthResponse, IndexResponse, PredictBody,
    PredictResponse, SuggestionsResponse, TeamsQuery, TeamsResponse,
};

/// Application state shared across handlers.
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub health: Arc<HealthState>,
    pub service_name: String,
    pub api_version: String,
}

impl AppState {
    pub fn new(
        service: Arc<PredictionService>,
        health: Arc<HealthState>,
        service_name: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            service,
            health,
            service_name: service_name.into(),
            api_version: api_version.into(),
        }
    }
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn bad_request(kind: &'static str, msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                success: false,
                error: msg.into(),
                kind,
                suggestions: None,
                valid_codes: None,
            },
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        let status = match &err {
            PredictError::Rejected(_) => StatusCode::BAD_REQUEST,
            PredictError::SourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        let (suggestions, valid_codes) = match &err {
            PredictError::Rejected(OddsError::UnknownTeam { suggestions, .. }) => {
                (Some(suggestions.clone()), None)
            }
            PredictError::Rejected(OddsError::UnknownDivision { valid_codes, .. }) => {
                (None, Some(valid_codes.clone()))
            }
            _ => (None, None),
        };
        Self {
            status,
            body: ErrorResponse {
                success: false,
                error: err.to_string(),
                kind: err.kind(),
                suggestions,
                valid_codes,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Service banner.
pub async fn index(State(state): State<Arc<AppState>>) -> Json<IndexResponse> {
    let endpoints = BTreeMap::from([
        ("/predict", "POST - price a fixture"),
        ("/teams", "GET - list teams, optionally ?division=CODE"),
        ("/divisions", "GET - list divisions"),
        ("/team-suggestions/{name}", "GET - similar team names"),
        ("/health", "GET - service status"),
        ("/live", "GET - liveness probe"),
        ("/ready", "GET - readiness probe"),
        ("/metrics", "GET - Prometheus metrics"),
    ]);
    Json(IndexResponse {
        message: state.service_name.clone(),
        version: state.api_version.clone(),
        endpoints,
    })
}

/// Health endpoint. Also refreshes the readiness probe state.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.service.health().await;
    state.health.set_source_ready(snapshot.source_ready);
    Json(HealthResponse {
        status: if snapshot.source_ready { "healthy" } else { "degraded" },
        model_loaded: snapshot.source_ready,
        available_teams_count: snapshot.team_count,
        available_divisions_count: snapshot.division_count,
        api_version: state.api_version.clone(),
    })
}

/// Prediction endpoint.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PredictBody>,
) -> Result<Json<PredictResponse>, ApiError> {
    if let Some(stake) = body.stake {
        if !stake.is_finite() || stake <= 0.0 {
            return Err(ApiError::bad_request(
                "invalid_stake",
                format!("stake must be a positive number, got {stake}"),
            ));
        }
    }

    let prediction = state.service.predict(&body.request).await?;
    Ok(Json(PredictResponse::new(&prediction, body.stake)))
}

/// Team listing endpoint.
pub async fn teams(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TeamsQuery>,
) -> Result<Json<TeamsResponse>, ApiError> {
    if let Some(division) = &query.division {
        let valid_codes: Vec<String> =
            state.service.divisions().into_iter().map(|(code, _)| code).collect();
        if !valid_codes.contains(division) {
            return Err(PredictError::from(OddsError::UnknownDivision {
                division: division.clone(),
                valid_codes,
            })
            .into());
        }
    }

    let teams = state.service.teams(query.division.as_deref());
    Ok(Json(TeamsResponse {
        success: true,
        total: teams.len(),
        teams,
        division: query.division.unwrap_or_else(|| "all".to_string()),
    }))
}

/// Division listing endpoint.
pub async fn divisions(State(state): State<Arc<AppState>>) -> Json<DivisionsResponse> {
    let divisions: BTreeMap<String, String> = state.service.divisions().into_iter().collect();
    Json(DivisionsResponse {
        success: true,
        total: divisions.len(),
        divisions,
    })
}

/// Team name suggestion endpoint.
pub async fn team_suggestions(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Json<SuggestionsResponse> {
    let found = state.service.suggestions(&name);
    Json(SuggestionsResponse {
        success: true,
        team_name: name,
        suggestions: found.suggestions,
        total_suggestions: found.total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_team_error_carries_suggestions() {
        let err = ApiError::from(PredictError::Rejected(OddsError::UnknownTeam {
            side: crate::domain::error::TeamSide::Home,
            team: "Raal Madrid".to_string(),
            suggestions: vec!["Real Madrid".to_string()],
        }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body.kind, "unknown_team");
        assert_eq!(err.body.suggestions, Some(vec!["Real Madrid".to_string()]));
        assert!(err.body.valid_codes.is_none());
    }

    #[test]
    fn test_source_failure_is_503() {
        let err = ApiError::from(PredictError::SourceUnavailable {
            source_name: "remote",
            reason: "connection refused".to_string(),
        });
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.body.kind, "source_unavailable");
    }
}
