use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use climate_risk_core::types::ScenarioId;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Json<Value> {
    let scenarios: Vec<Value> = state
        .analyzer
        .registry()
        .scenarios()
        .iter()
        .map(|s| {
            json!({
                "id": s.id.as_str(),
                "name": s.name,
                "description": s.description,
                "warming_trajectory": s.warming_trajectory,
                "reduction_target": s.reduction_target,
                "target_year": s.target_year,
                "credit_spread": s.credit_spread,
            })
        })
        .collect();
    Json(json!({ "scenarios": scenarios }))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    // Unknown scenario ids on the path are 404, not 400.
    let scenario: ScenarioId = id
        .parse()
        .map_err(|_| ApiError::not_found(format!("Unknown scenario '{id}'")))?;
    let spec = state.analyzer.registry().scenario(scenario);
    Ok(Json(json!({
        "id": spec.id.as_str(),
        "name": spec.name,
        "description": spec.description,
        "warming_trajectory": spec.warming_trajectory,
        "price_points": spec.price_points,
        "reduction_target": spec.reduction_target,
        "target_year": spec.target_year,
        "inflection_year": spec.inflection_year,
        "steepness": spec.steepness,
        "credit_spread": spec.credit_spread,
    })))
}
