use std::collections::HashMap;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use climate_risk_core::types::{Facility, FrameworkId, PricingRegime, ScenarioId};

use crate::error::ApiError;
use crate::state::AppState;

mod company;
mod esg;
mod partner;
mod physical;
mod scenarios;
mod transition;

pub type Params = HashMap<String, String>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/scenarios", get(scenarios::list))
        .route("/scenarios/:id", get(scenarios::detail))
        .route("/company/facilities", get(company::facilities))
        .route("/company/sectors", get(company::sectors))
        .route("/transition-risk/analysis", get(transition::analysis))
        .route("/transition-risk/summary", get(transition::summary))
        .route("/transition-risk/comparison", get(transition::comparison))
        .route("/physical-risk/assessment", get(physical::assessment))
        .route("/physical-risk/simulate", post(physical::simulate))
        .route("/esg/assessment", get(esg::assessment))
        .route("/esg/disclosure-data", get(esg::disclosure_data))
        .route("/esg/reports/disclosure", get(esg::disclosure_report))
        .route("/esg/frameworks", get(esg::frameworks))
        .route("/partner/sessions", post(partner::create))
        .route("/partner/sessions/:id", get(partner::info).delete(partner::remove))
        .route(
            "/partner/sessions/:id/transition-risk/analysis",
            get(partner::transition_analysis),
        )
        .route(
            "/partner/sessions/:id/transition-risk/summary",
            get(partner::transition_summary),
        )
        .route(
            "/partner/sessions/:id/transition-risk/comparison",
            get(partner::transition_comparison),
        )
        .route(
            "/partner/sessions/:id/physical-risk/assessment",
            get(partner::physical_assessment),
        )
        .route("/partner/sessions/:id/esg/assessment", get(partner::esg_assessment))
        .route(
            "/partner/sessions/:id/esg/disclosure-data",
            get(partner::esg_disclosure_data),
        )
        .route(
            "/partner/sessions/:id/esg/reports/disclosure",
            get(partner::esg_disclosure_report),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "climate-risk-server" }))
}

// ---------------------------------------------------------------------------
// Shared parameter parsing. Defaults follow the interface contract:
// scenario=net_zero_2050, pricing_regime=global, framework=tcfd,
// use_api_data=false.
// ---------------------------------------------------------------------------

pub(crate) fn parse_scenario(params: &Params) -> Result<ScenarioId, ApiError> {
    match params.get("scenario") {
        None => Ok(ScenarioId::NetZero2050),
        Some(raw) => raw.parse().map_err(ApiError::from),
    }
}

pub(crate) fn parse_regime(params: &Params) -> Result<PricingRegime, ApiError> {
    match params.get("pricing_regime") {
        None => Ok(PricingRegime::Global),
        Some(raw) => raw.parse().map_err(ApiError::from),
    }
}

pub(crate) fn parse_framework(params: &Params) -> Result<FrameworkId, ApiError> {
    match params.get("framework") {
        None => Ok(FrameworkId::Tcfd),
        Some(raw) => raw.parse().map_err(ApiError::from),
    }
}

pub(crate) fn parse_year(params: &Params, default: u32) -> Result<u32, ApiError> {
    match params.get("year") {
        None => Ok(default),
        Some(raw) => raw.parse::<u32>().map_err(|_| ApiError {
            status: axum::http::StatusCode::BAD_REQUEST,
            detail: format!("Invalid year '{raw}'."),
        }),
    }
}

pub(crate) fn parse_use_api_data(params: &Params) -> Result<bool, ApiError> {
    match params.get("use_api_data").map(String::as_str) {
        None => Ok(false),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(ApiError {
            status: axum::http::StatusCode::BAD_REQUEST,
            detail: format!("Invalid use_api_data '{other}'; expected true or false."),
        }),
    }
}

/// Resolve a session path segment to its facility set. Malformed ids read
/// the same as unknown ids.
pub(crate) fn session_facilities(state: &AppState, id: &str) -> Result<Vec<Facility>, ApiError> {
    let uuid = Uuid::parse_str(id).map_err(|_| ApiError::not_found("Session not found or expired"))?;
    state.sessions.list_facilities(uuid).map_err(ApiError::from)
}
