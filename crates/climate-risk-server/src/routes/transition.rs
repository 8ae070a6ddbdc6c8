use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::ApiError;
use crate::routes::{parse_regime, parse_scenario, Params};
use crate::state::{with_deadline, AppState};

pub async fn analysis(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let scenario = parse_scenario(&params)?;
    let regime = parse_regime(&params)?;
    let facilities = state.analyzer.registry().seed_facilities().to_vec();
    let envelope = with_deadline(|token| async move {
        state.analyzer.transition_analysis(&facilities, scenario, regime, &token)
    })
    .await?;
    Ok(Json(envelope))
}

pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let scenario = parse_scenario(&params)?;
    let regime = parse_regime(&params)?;
    let facilities = state.analyzer.registry().seed_facilities().to_vec();
    let envelope = with_deadline(|token| async move {
        state.analyzer.transition_summary(&facilities, scenario, regime, &token)
    })
    .await?;
    Ok(Json(envelope))
}

pub async fn comparison(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let regime = parse_regime(&params)?;
    let facilities = state.analyzer.registry().seed_facilities().to_vec();
    let envelope = with_deadline(|token| async move {
        state.analyzer.scenario_comparison(&facilities, regime, &token)
    })
    .await?;
    Ok(Json(envelope))
}
