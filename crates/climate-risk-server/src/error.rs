use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use climate_risk_core::ClimateRiskError;

/// Adapter-level error: wraps a core error and maps it onto the HTTP
/// surface with the `{"detail": "..."}` envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn not_found(detail: impl Into<String>) -> Self {
        ApiError { status: StatusCode::NOT_FOUND, detail: detail.into() }
    }
}

impl From<ClimateRiskError> for ApiError {
    fn from(err: ClimateRiskError) -> Self {
        let status = match &err {
            ClimateRiskError::InvalidInput { .. }
            | ClimateRiskError::InvalidScenario(_)
            | ClimateRiskError::InvalidRegime(_)
            | ClimateRiskError::InvalidFramework(_) => StatusCode::BAD_REQUEST,
            ClimateRiskError::SessionNotFound => StatusCode::NOT_FOUND,
            ClimateRiskError::DeadlineExceeded => StatusCode::REQUEST_TIMEOUT,
            // Client went away; 499 in the nginx tradition.
            ClimateRiskError::Cancelled => {
                StatusCode::from_u16(499).unwrap_or(StatusCode::REQUEST_TIMEOUT)
            }
            ClimateRiskError::WeatherUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ClimateRiskError::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError { status, detail: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
