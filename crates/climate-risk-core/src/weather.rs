//! Historical-weather client.
//!
//! Fetches ~30 years of daily precipitation and maximum temperature for a
//! coordinate from an Open-Meteo-style archive endpoint, fits Gumbel flood
//! parameters to the annual maxima, and caches the result by rounded
//! coordinate for one hour. Concurrent fetches for the same key collapse to
//! a single outstanding request. Every failure path falls back to the
//! latitude-band defaults and tags the result `hardcoded_config`; the
//! archive being down is a warning, never an error.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::config::LatitudeBand;
use crate::error::ClimateRiskError;
use crate::risk_math::gumbel_fit;
use crate::ClimateRiskResult;

/// Cache key resolution in degrees.
const COORD_RESOLUTION_DEG: f64 = 0.25;
/// Cache entry lifetime.
const CACHE_TTL_SECS: i64 = 3600;
/// Per-coordinate fetch budget.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// A heatwave day is a day whose maximum exceeds this temperature.
const HEATWAVE_THRESHOLD_C: f64 = 33.0;
/// Days per pseudo-year when chunking the archive series.
const DAYS_PER_YEAR: usize = 365;

/// Where a facility's weather statistics came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    OpenMeteoApi,
    HardcodedConfig,
}

/// Fitted statistics for one coordinate.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherStats {
    /// Gumbel location of annual-maximum daily precipitation (mm).
    pub gumbel_location: f64,
    /// Gumbel scale of annual-maximum daily precipitation (mm).
    pub gumbel_scale: f64,
    /// Mean annual count of days above the heatwave threshold.
    pub heatwave_days: f64,
    /// Standardised precipitation deficit; positive values mean the recent
    /// decade is drier than the archive mean.
    pub drought_index: f64,
    pub source: DataSource,
}

/// Raw daily series returned by the archive, oldest first.
#[derive(Debug, Clone)]
pub struct DailySeries {
    pub precipitation_mm: Vec<f64>,
    pub t_max_c: Vec<f64>,
}

/// Remote archive transport. Injected so tests can run without a network.
#[async_trait]
pub trait WeatherArchive: Send + Sync {
    async fn fetch_daily(&self, lat: f64, lon: f64) -> ClimateRiskResult<DailySeries>;
}

/// Production transport against the Open-Meteo ERA5 archive.
pub struct OpenMeteoArchive {
    http: reqwest::Client,
    base_url: String,
}

impl OpenMeteoArchive {
    pub fn new(base_url: impl Into<String>) -> Self {
        OpenMeteoArchive { http: reqwest::Client::new(), base_url: base_url.into() }
    }
}

#[derive(Deserialize)]
struct ArchiveDaily {
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
}

#[derive(Deserialize)]
struct ArchiveResponse {
    daily: ArchiveDaily,
}

#[async_trait]
impl WeatherArchive for OpenMeteoArchive {
    async fn fetch_daily(&self, lat: f64, lon: f64) -> ClimateRiskResult<DailySeries> {
        let url = format!("{}/v1/archive", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("start_date", "1994-01-01".to_string()),
                ("end_date", "2023-12-31".to_string()),
                ("daily", "precipitation_sum,temperature_2m_max".to_string()),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ClimateRiskError::WeatherUnavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ClimateRiskError::WeatherUnavailable(format!(
                "archive returned HTTP {}",
                response.status()
            )));
        }
        let body: ArchiveResponse = response
            .json()
            .await
            .map_err(|e| ClimateRiskError::WeatherUnavailable(e.to_string()))?;
        Ok(DailySeries {
            precipitation_mm: body.daily.precipitation_sum.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
            t_max_c: body.daily.temperature_2m_max.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
        })
    }
}

/// Latitude-band climate defaults used whenever live data is unavailable.
#[derive(Debug, Clone, Copy)]
pub struct BandClimate {
    pub gumbel_location: f64,
    pub gumbel_scale: f64,
    pub heatwave_days: f64,
    pub drought_return_period: f64,
}

pub fn band_climate(band: LatitudeBand) -> BandClimate {
    match band {
        LatitudeBand::Tropical => BandClimate {
            gumbel_location: 120.0,
            gumbel_scale: 35.0,
            heatwave_days: 45.0,
            drought_return_period: 25.0,
        },
        LatitudeBand::Subtropical => BandClimate {
            gumbel_location: 90.0,
            gumbel_scale: 28.0,
            heatwave_days: 25.0,
            drought_return_period: 18.0,
        },
        LatitudeBand::Temperate => BandClimate {
            gumbel_location: 70.0,
            gumbel_scale: 22.0,
            heatwave_days: 12.0,
            drought_return_period: 20.0,
        },
        LatitudeBand::HighLatitude => BandClimate {
            gumbel_location: 40.0,
            gumbel_scale: 12.0,
            heatwave_days: 2.0,
            drought_return_period: 30.0,
        },
    }
}

/// Defaults for a latitude, tagged as configuration-sourced.
pub fn default_stats(lat: f64) -> WeatherStats {
    let band = band_climate(LatitudeBand::from_latitude(lat));
    WeatherStats {
        gumbel_location: band.gumbel_location,
        gumbel_scale: band.gumbel_scale,
        heatwave_days: band.heatwave_days,
        drought_index: 0.0,
        source: DataSource::HardcodedConfig,
    }
}

/// Reduce a daily archive series to the statistics the hazard models need.
fn stats_from_series(series: &DailySeries) -> ClimateRiskResult<WeatherStats> {
    let annual_maxima: Vec<f64> = series
        .precipitation_mm
        .chunks(DAYS_PER_YEAR)
        .filter(|chunk| chunk.len() == DAYS_PER_YEAR)
        .map(|chunk| chunk.iter().cloned().fold(f64::MIN, f64::max))
        .collect();
    if annual_maxima.len() < 5 {
        return Err(ClimateRiskError::WeatherUnavailable(
            "archive series too short to fit annual maxima".into(),
        ));
    }
    let (gumbel_location, gumbel_scale) = gumbel_fit(&annual_maxima)?;

    let years = annual_maxima.len() as f64;
    let heatwave_days = series
        .t_max_c
        .iter()
        .filter(|t| t.is_finite() && **t > HEATWAVE_THRESHOLD_C)
        .count() as f64
        / years;

    let annual_totals: Vec<f64> = series
        .precipitation_mm
        .chunks(DAYS_PER_YEAR)
        .filter(|chunk| chunk.len() == DAYS_PER_YEAR)
        .map(|chunk| chunk.iter().sum())
        .collect();
    let mean: f64 = annual_totals.iter().sum::<f64>() / annual_totals.len() as f64;
    let recent = &annual_totals[annual_totals.len().saturating_sub(10)..];
    let recent_mean: f64 = recent.iter().sum::<f64>() / recent.len() as f64;
    let variance: f64 = annual_totals.iter().map(|t| (t - mean).powi(2)).sum::<f64>()
        / (annual_totals.len() as f64 - 1.0);
    let sd = variance.sqrt();
    let drought_index = if sd > 0.0 { (mean - recent_mean) / sd } else { 0.0 };

    Ok(WeatherStats {
        gumbel_location,
        gumbel_scale,
        heatwave_days,
        drought_index,
        source: DataSource::OpenMeteoApi,
    })
}

type CacheKey = (i32, i32);

fn cache_key(lat: f64, lon: f64) -> CacheKey {
    (
        (lat / COORD_RESOLUTION_DEG).round() as i32,
        (lon / COORD_RESOLUTION_DEG).round() as i32,
    )
}

enum Slot {
    Ready { stats: WeatherStats, expires_at: DateTime<Utc> },
    Pending(Arc<OnceCell<WeatherStats>>),
}

/// Caching, single-flight weather client.
pub struct WeatherClient {
    archive: Arc<dyn WeatherArchive>,
    clock: Arc<dyn Clock>,
    cache: Mutex<HashMap<CacheKey, Slot>>,
    fetch_timeout: Duration,
}

impl WeatherClient {
    pub fn new(archive: Arc<dyn WeatherArchive>, clock: Arc<dyn Clock>) -> Self {
        Self::with_timeout(archive, clock, FETCH_TIMEOUT)
    }

    pub fn with_timeout(
        archive: Arc<dyn WeatherArchive>,
        clock: Arc<dyn Clock>,
        fetch_timeout: Duration,
    ) -> Self {
        WeatherClient { archive, clock, cache: Mutex::new(HashMap::new()), fetch_timeout }
    }

    /// Statistics for a coordinate. Never fails: any failure path (archive
    /// error, timeout, cancellation) degrades to the latitude-band defaults
    /// tagged `hardcoded_config`.
    pub async fn fetch_stats(&self, lat: f64, lon: f64, token: &CancellationToken) -> WeatherStats {
        let key = cache_key(lat, lon);
        let cell = {
            let mut cache = self.cache.lock();
            let now = self.clock.now();
            let joined = match cache.get(&key) {
                Some(Slot::Ready { stats, expires_at }) if *expires_at > now => {
                    return stats.clone();
                }
                Some(Slot::Pending(cell)) => Some(cell.clone()),
                _ => None,
            };
            match joined {
                Some(cell) => cell,
                None => {
                    let cell = Arc::new(OnceCell::new());
                    cache.insert(key, Slot::Pending(cell.clone()));
                    cell
                }
            }
        };

        let outcome = cell
            .get_or_try_init(|| self.fetch_and_fit(lat, lon, token))
            .await
            .cloned();
        match outcome {
            Ok(stats) => {
                let mut cache = self.cache.lock();
                cache.insert(
                    key,
                    Slot::Ready {
                        stats: stats.clone(),
                        expires_at: self.clock.now() + chrono::Duration::seconds(CACHE_TTL_SECS),
                    },
                );
                stats
            }
            Err(e) => {
                tracing::warn!(lat, lon, error = %e, "weather fetch failed, using band defaults");
                let mut cache = self.cache.lock();
                let stale = matches!(
                    cache.get(&key),
                    Some(Slot::Pending(current)) if Arc::ptr_eq(current, &cell)
                );
                if stale {
                    cache.remove(&key);
                }
                default_stats(lat)
            }
        }
    }

    async fn fetch_and_fit(
        &self,
        lat: f64,
        lon: f64,
        token: &CancellationToken,
    ) -> ClimateRiskResult<WeatherStats> {
        let fetch = self.archive.fetch_daily(lat, lon);
        let series = tokio::select! {
            _ = token.cancelled() => return Err(ClimateRiskError::Cancelled),
            outcome = tokio::time::timeout(self.fetch_timeout, fetch) => match outcome {
                Ok(Ok(series)) => series,
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    return Err(ClimateRiskError::WeatherUnavailable(format!(
                        "fetch exceeded {}s budget",
                        self.fetch_timeout.as_secs()
                    )))
                }
            },
        };
        stats_from_series(&series)
    }
}
