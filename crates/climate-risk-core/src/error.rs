use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateRiskError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown scenario '{0}'. Expected one of: net_zero_2050, below_2c, delayed_transition, current_policies")]
    InvalidScenario(String),

    #[error("Unknown pricing regime '{0}'. Expected one of: global, kets")]
    InvalidRegime(String),

    #[error("Unknown disclosure framework '{0}'. Expected one of: tcfd, issb, kssb")]
    InvalidFramework(String),

    #[error("Session not found or expired")]
    SessionNotFound,

    #[error("Request cancelled by caller")]
    Cancelled,

    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    #[error("Weather archive unavailable: {0}")]
    WeatherUnavailable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ClimateRiskError {
    fn from(e: serde_json::Error) -> Self {
        ClimateRiskError::SerializationError(e.to_string())
    }
}
