use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use climate_risk_core::types::Facility;

use crate::error::ApiError;
use crate::routes::{parse_scenario, parse_use_api_data, parse_year, Params};
use crate::state::{with_deadline, AppState};

const DEFAULT_ASSESSMENT_YEAR: u32 = 2050;

pub async fn assessment(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let scenario = parse_scenario(&params)?;
    let year = parse_year(&params, DEFAULT_ASSESSMENT_YEAR)?;
    let use_api_data = parse_use_api_data(&params)?;
    let facilities = state.analyzer.registry().seed_facilities().to_vec();
    let envelope = with_deadline(|token| async move {
        state
            .analyzer
            .physical_assessment(&facilities, scenario, year, use_api_data, &token)
            .await
    })
    .await?;
    Ok(Json(envelope))
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub scenario: Option<String>,
    pub year: Option<u32>,
    #[serde(default)]
    pub use_api_data: bool,
    pub facilities: Vec<Facility>,
}

/// Physical assessment over caller-posted facilities, without creating a
/// session.
pub async fn simulate(
    State(state): State<AppState>,
    Json(request): Json<SimulateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let scenario = match &request.scenario {
        None => climate_risk_core::types::ScenarioId::NetZero2050,
        Some(raw) => raw.parse().map_err(ApiError::from)?,
    };
    let year = request.year.unwrap_or(DEFAULT_ASSESSMENT_YEAR);
    let use_api_data = request.use_api_data;
    let facilities = request.facilities;
    let envelope = with_deadline(|token| async move {
        state
            .analyzer
            .physical_assessment(&facilities, scenario, year, use_api_data, &token)
            .await
    })
    .await?;
    Ok(Json(envelope))
}
