use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::routes::{parse_framework, parse_regime, parse_scenario, parse_year, Params};
use crate::state::{with_deadline, AppState};

pub async fn assessment(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let framework = parse_framework(&params)?;
    let facilities = state.analyzer.registry().seed_facilities().to_vec();
    let envelope = state.analyzer.esg_assessment(&facilities, framework)?;
    Ok(Json(envelope))
}

pub async fn disclosure_data(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let framework = parse_framework(&params)?;
    let facilities = state.analyzer.registry().seed_facilities().to_vec();
    let envelope = state.analyzer.disclosure(&facilities, framework)?;
    Ok(Json(envelope))
}

pub async fn disclosure_report(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let framework = parse_framework(&params)?;
    let scenario = parse_scenario(&params)?;
    let regime = parse_regime(&params)?;
    let year = parse_year(&params, 2050)?;
    let facilities = state.analyzer.registry().seed_facilities().to_vec();
    let workbook = with_deadline(|token| async move {
        state
            .analyzer
            .disclosure_report(&facilities, framework, scenario, regime, year, &token)
            .await
    })
    .await?;
    Ok(Json(workbook))
}

pub async fn frameworks(State(state): State<AppState>) -> Json<Value> {
    let frameworks: Vec<Value> = state
        .analyzer
        .registry()
        .frameworks()
        .iter()
        .map(|f| {
            json!({
                "id": f.id.as_str(),
                "name": f.name,
                "authority": f.authority,
                "description": f.description,
                "categories": f.categories.iter().map(|c| json!({
                    "key": c.key,
                    "name": c.name,
                    "weight": c.weight,
                })).collect::<Vec<_>>(),
            })
        })
        .collect();
    Json(json!({ "frameworks": frameworks }))
}
