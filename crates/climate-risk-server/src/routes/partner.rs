use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use climate_risk_core::session::SESSION_TTL_SECS;
use climate_risk_core::types::Facility;

use crate::error::ApiError;
use crate::routes::{
    parse_regime, parse_scenario, parse_use_api_data, parse_year, session_facilities, Params,
};
use crate::state::{with_deadline, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub company_name: String,
    pub facilities: Vec<Facility>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (id, warnings) = state
        .sessions
        .create(state.analyzer.registry(), &request.company_name, request.facilities)
        .map_err(ApiError::from)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "partner_id": id.to_string(),
            "company_name": request.company_name,
            "expires_in_seconds": SESSION_TTL_SECS,
            "warnings": warnings,
        })),
    ))
}

pub async fn info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let uuid =
        Uuid::parse_str(&id).map_err(|_| ApiError::not_found("Session not found or expired"))?;
    let session = state.sessions.get(uuid).map_err(ApiError::from)?;
    Ok(Json(json!({
        "partner_id": session.id.to_string(),
        "company_name": session.company_name,
        "created_at": session.created_at,
        "last_access": session.last_access,
        "facility_count": session.facilities.len(),
        "facilities": session.facilities,
    })))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let uuid =
        Uuid::parse_str(&id).map_err(|_| ApiError::not_found("Session not found or expired"))?;
    state.sessions.delete(uuid).map_err(ApiError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Session-scoped analysis variants: same contracts as the portfolio routes,
// run over the session's facility set.
// ---------------------------------------------------------------------------

pub async fn transition_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let scenario = parse_scenario(&params)?;
    let regime = parse_regime(&params)?;
    let facilities = session_facilities(&state, &id)?;
    let envelope = with_deadline(|token| async move {
        state.analyzer.transition_analysis(&facilities, scenario, regime, &token)
    })
    .await?;
    Ok(Json(envelope))
}

pub async fn transition_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let scenario = parse_scenario(&params)?;
    let regime = parse_regime(&params)?;
    let facilities = session_facilities(&state, &id)?;
    let envelope = with_deadline(|token| async move {
        state.analyzer.transition_summary(&facilities, scenario, regime, &token)
    })
    .await?;
    Ok(Json(envelope))
}

pub async fn transition_comparison(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let regime = parse_regime(&params)?;
    let facilities = session_facilities(&state, &id)?;
    let envelope = with_deadline(|token| async move {
        state.analyzer.scenario_comparison(&facilities, regime, &token)
    })
    .await?;
    Ok(Json(envelope))
}

pub async fn physical_assessment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let scenario = parse_scenario(&params)?;
    let year = parse_year(&params, 2050)?;
    let use_api_data = parse_use_api_data(&params)?;
    let facilities = session_facilities(&state, &id)?;
    let envelope = with_deadline(|token| async move {
        state
            .analyzer
            .physical_assessment(&facilities, scenario, year, use_api_data, &token)
            .await
    })
    .await?;
    Ok(Json(envelope))
}

pub async fn esg_assessment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let framework = crate::routes::parse_framework(&params)?;
    let facilities = session_facilities(&state, &id)?;
    let envelope = state.analyzer.esg_assessment(&facilities, framework)?;
    Ok(Json(envelope))
}

pub async fn esg_disclosure_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let framework = crate::routes::parse_framework(&params)?;
    let facilities = session_facilities(&state, &id)?;
    let envelope = state.analyzer.disclosure(&facilities, framework)?;
    Ok(Json(envelope))
}

pub async fn esg_disclosure_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, ApiError> {
    let framework = crate::routes::parse_framework(&params)?;
    let scenario = parse_scenario(&params)?;
    let regime = parse_regime(&params)?;
    let year = parse_year(&params, 2050)?;
    let facilities = session_facilities(&state, &id)?;
    let workbook = with_deadline(|token| async move {
        state
            .analyzer
            .disclosure_report(&facilities, framework, scenario, regime, year, &token)
            .await
    })
    .await?;
    Ok(Json(workbook))
}
