use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use climate_risk_core::clock::SystemClock;
use climate_risk_core::config::ConfigRegistry;
use climate_risk_core::portfolio::Analyzer;
use climate_risk_core::session::SessionStore;
use climate_risk_core::weather::{OpenMeteoArchive, WeatherClient};
use climate_risk_core::{ClimateRiskError, ClimateRiskResult};

use crate::error::ApiError;

/// Per-request wall-clock budget.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(weather_archive_url: &str) -> Self {
        let clock = Arc::new(SystemClock);
        let registry = Arc::new(ConfigRegistry::builtin());
        let archive = Arc::new(OpenMeteoArchive::new(weather_archive_url));
        let weather = Arc::new(WeatherClient::new(archive, clock.clone()));
        AppState {
            analyzer: Arc::new(Analyzer::new(registry, weather)),
            sessions: Arc::new(SessionStore::new(clock)),
        }
    }
}

/// Run an analysis under the request deadline. On expiry the request token
/// is cancelled, which propagates into the engines and the weather client,
/// and the caller receives 408.
pub async fn with_deadline<T, F, Fut>(f: F) -> Result<T, ApiError>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = ClimateRiskResult<T>>,
{
    let token = CancellationToken::new();
    match tokio::time::timeout(REQUEST_TIMEOUT, f(token.clone())).await {
        Ok(outcome) => outcome.map_err(ApiError::from),
        Err(_) => {
            token.cancel();
            Err(ApiError::from(ClimateRiskError::DeadlineExceeded))
        }
    }
}
