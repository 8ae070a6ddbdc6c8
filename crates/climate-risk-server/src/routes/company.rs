use axum::extract::{Query, State};
use axum::Json;
use serde_json::{json, Value};

use crate::routes::Params;
use crate::state::AppState;

pub async fn facilities(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Json<Value> {
    let sector = params.get("sector");
    let facilities: Vec<_> = state
        .analyzer
        .registry()
        .seed_facilities()
        .iter()
        .filter(|f| sector.map(|s| &f.sector == s).unwrap_or(true))
        .cloned()
        .collect();
    Json(json!({ "count": facilities.len(), "facilities": facilities }))
}

pub async fn sectors(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "sectors": state.analyzer.registry().sector_tags() }))
}
