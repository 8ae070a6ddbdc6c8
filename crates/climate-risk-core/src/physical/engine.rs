use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::climate::{
    drought_multiplier, flood_multiplier, heatwave_scaling, sea_level_rise_m,
    warming_above_baseline,
};
use crate::config::{ConfigRegistry, LatitudeBand, SectorParams};
use crate::error::ClimateRiskError;
use crate::physical::hazards::*;
use crate::risk_math::{annual_exceedance_probability, gumbel_quantile, poisson_p_at_least_one};
use crate::types::{Facility, Money, RiskLevel, ScenarioId};
use crate::weather::{band_climate, default_stats, DataSource, WeatherClient, WeatherStats};
use crate::ClimateRiskResult;

/// Hazard EAL above this fraction of asset value is High risk.
const HIGH_FRACTION: f64 = 0.01;
/// Hazard EAL above this fraction of asset value is Medium risk.
const MEDIUM_FRACTION: f64 = 0.001;

/// Assessment horizon accepted by the engine.
const YEAR_MIN: u32 = 2025;
const YEAR_MAX: u32 = 2100;

/// One hazard's assessment for one facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardAssessment {
    pub hazard_type: HazardType,
    pub return_period_years: f64,
    pub annual_exceedance_probability: f64,
    /// Loss if the design event occurs, currency units.
    pub potential_loss: Money,
    pub business_interruption_loss: Money,
    /// Always >= 1.
    pub climate_multiplier: f64,
    /// Probability-weighted damage plus expected business interruption.
    pub expected_annual_loss: Money,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityPhysicalResult {
    pub facility_id: String,
    pub facility_name: String,
    pub sector: String,
    pub latitude: f64,
    pub longitude: f64,
    pub data_source: DataSource,
    pub hazards: Vec<HazardAssessment>,
    pub total_expected_annual_loss: Money,
    pub overall_risk_level: RiskLevel,
}

/// Assess physical risk for a facility set under (scenario, year).
///
/// Facilities are evaluated concurrently (the weather fetch is the only
/// suspension point) and collected in input order, so two identical
/// requests produce identical output. When live weather fails for one
/// coordinate, only that facility degrades to the configuration defaults.
pub async fn assess(
    registry: &ConfigRegistry,
    weather: &WeatherClient,
    facilities: &[Facility],
    scenario: ScenarioId,
    year: u32,
    use_live_weather: bool,
    token: &CancellationToken,
    warnings: &mut Vec<String>,
) -> ClimateRiskResult<Vec<FacilityPhysicalResult>> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(ClimateRiskError::InvalidInput {
            field: "year".into(),
            reason: format!("Assessment year must lie in [{YEAR_MIN}, {YEAR_MAX}]."),
        });
    }

    let tasks = facilities.iter().map(|facility| async move {
        if token.is_cancelled() {
            return Err(ClimateRiskError::Cancelled);
        }
        facility.validate()?;
        let mut local_warnings = Vec::new();
        if !registry.knows_sector(&facility.sector) {
            local_warnings.push(format!(
                "Unknown sector '{}' for facility '{}'; default sector parameters applied.",
                facility.sector, facility.id
            ));
        }
        let params = registry.sector(&facility.sector);

        let stats = if use_live_weather {
            let fetched = weather.fetch_stats(facility.latitude, facility.longitude, token).await;
            if fetched.source == DataSource::HardcodedConfig {
                local_warnings.push(format!(
                    "Live weather unavailable for ({:.2}, {:.2}); statistical defaults applied.",
                    facility.latitude, facility.longitude
                ));
            }
            fetched
        } else {
            default_stats(facility.latitude)
        };
        if token.is_cancelled() {
            return Err(ClimateRiskError::Cancelled);
        }

        let result = assess_facility(facility, params, scenario, year, &stats)?;
        Ok((result, local_warnings))
    });

    let mut results = Vec::with_capacity(facilities.len());
    for outcome in join_all(tasks).await {
        let (result, local_warnings) = outcome?;
        warnings.extend(local_warnings);
        results.push(result);
    }
    Ok(results)
}

/// Pure per-facility evaluation, hazards in canonical order.
fn assess_facility(
    facility: &Facility,
    params: &SectorParams,
    scenario: ScenarioId,
    year: u32,
    stats: &WeatherStats,
) -> ClimateRiskResult<FacilityPhysicalResult> {
    let warming = warming_above_baseline(scenario, year as f64);
    let coastal = is_coastal(facility, params);
    let band = band_climate(LatitudeBand::from_latitude(facility.latitude));

    let mut hazards = Vec::with_capacity(HazardType::CANONICAL_ORDER.len());
    for hazard in HazardType::CANONICAL_ORDER {
        let assessment = match hazard {
            HazardType::Flood => assess_flood(facility, params, warming, stats)?,
            HazardType::Typhoon => assess_typhoon(facility, params, warming, coastal)?,
            HazardType::Heatwave => assess_heatwave(facility, params, warming, stats),
            HazardType::Drought => assess_drought(facility, params, warming, stats, &band)?,
            HazardType::SeaLevelRise => assess_sea_level_rise(facility, scenario, year, coastal),
        };
        hazards.push(assessment);
    }

    let total: Money = hazards.iter().map(|h| h.expected_annual_loss).sum();
    let overall = hazards
        .iter()
        .map(|h| h.risk_level)
        .max()
        .unwrap_or(RiskLevel::Low);

    Ok(FacilityPhysicalResult {
        facility_id: facility.id.clone(),
        facility_name: facility.name.clone(),
        sector: facility.sector.clone(),
        latitude: facility.latitude,
        longitude: facility.longitude,
        data_source: stats.source,
        hazards,
        total_expected_annual_loss: total,
        overall_risk_level: overall,
    })
}

fn level(facility: &Facility, eal: Money) -> RiskLevel {
    let fraction = if facility.asset_value > 0.0 { eal / facility.asset_value } else { 0.0 };
    RiskLevel::from_asset_fraction(fraction, HIGH_FRACTION, MEDIUM_FRACTION)
}

fn assess_flood(
    facility: &Facility,
    params: &SectorParams,
    warming: f64,
    stats: &WeatherStats,
) -> ClimateRiskResult<HazardAssessment> {
    let aep = annual_exceedance_probability(FLOOD_RETURN_PERIOD)?;
    let design_rain_mm = gumbel_quantile(
        stats.gumbel_location,
        stats.gumbel_scale,
        1.0 - 1.0 / FLOOD_RETURN_PERIOD,
    )?;
    let depth_m = ((design_rain_mm - RAIN_THRESHOLD_MM) / MM_PER_METRE_DEPTH).max(0.0);
    let multiplier = flood_multiplier(warming);
    let potential_loss =
        facility.asset_value * depth_damage_ratio(depth_m) * multiplier * params.hazard.flood;
    let eal = aep * potential_loss;
    Ok(HazardAssessment {
        hazard_type: HazardType::Flood,
        return_period_years: FLOOD_RETURN_PERIOD,
        annual_exceedance_probability: aep,
        potential_loss,
        business_interruption_loss: 0.0,
        climate_multiplier: multiplier,
        expected_annual_loss: eal,
        risk_level: level(facility, eal),
    })
}

fn assess_typhoon(
    facility: &Facility,
    params: &SectorParams,
    warming: f64,
    coastal: bool,
) -> ClimateRiskResult<HazardAssessment> {
    let base = if in_typhoon_belt(facility.latitude) {
        TYPHOON_LAMBDA_BELT
    } else {
        TYPHOON_LAMBDA_ELSEWHERE
    };
    let lambda = base * if coastal { TYPHOON_COASTAL_FACTOR } else { 1.0 };
    let p_strike = poisson_p_at_least_one(lambda)?;

    let wind = TYPHOON_BASE_WIND_MS + TYPHOON_WIND_PER_DEGREE * warming;
    let baseline_wind = TYPHOON_BASE_WIND_MS + TYPHOON_WIND_PER_DEGREE * 1.2;
    let damage = wind_damage_ratio(wind);
    let baseline_damage = wind_damage_ratio(baseline_wind);
    let multiplier = if baseline_damage > 0.0 { (damage / baseline_damage).max(1.0) } else { 1.0 };

    let potential_loss = facility.asset_value * damage * params.hazard.typhoon;
    let expected_damage = lambda * potential_loss;
    let business_interruption = p_strike * TYPHOON_BI_RATE * facility.annual_revenue;
    let eal = expected_damage + business_interruption;
    Ok(HazardAssessment {
        hazard_type: HazardType::Typhoon,
        return_period_years: 1.0 / lambda,
        annual_exceedance_probability: p_strike,
        potential_loss,
        business_interruption_loss: business_interruption,
        climate_multiplier: multiplier,
        expected_annual_loss: eal,
        risk_level: level(facility, eal),
    })
}

fn assess_heatwave(
    facility: &Facility,
    params: &SectorParams,
    warming: f64,
    stats: &WeatherStats,
) -> HazardAssessment {
    let scaling = heatwave_scaling(warming);
    let days = stats.heatwave_days * scaling;
    let loss = days
        * params.heat_productivity_factor
        * facility.annual_revenue
        * HEATWAVE_LOSS_RATE
        * params.hazard.heatwave;
    HazardAssessment {
        hazard_type: HazardType::Heatwave,
        return_period_years: 1.0,
        annual_exceedance_probability: 1.0,
        potential_loss: loss,
        business_interruption_loss: 0.0,
        climate_multiplier: scaling,
        expected_annual_loss: loss,
        risk_level: level(facility, loss),
    }
}

fn assess_drought(
    facility: &Facility,
    params: &SectorParams,
    warming: f64,
    stats: &WeatherStats,
    band: &crate::weather::BandClimate,
) -> ClimateRiskResult<HazardAssessment> {
    // A positive precipitation deficit shortens the effective return period.
    let return_period = (band.drought_return_period / (1.0 + stats.drought_index.max(0.0)))
        .max(DROUGHT_MIN_RETURN_PERIOD);
    let aep = annual_exceedance_probability(return_period)?;
    let multiplier = drought_multiplier(warming);
    let potential_loss =
        facility.asset_value * DROUGHT_LOSS_RATE * multiplier * params.hazard.drought;
    let eal = aep * potential_loss;
    Ok(HazardAssessment {
        hazard_type: HazardType::Drought,
        return_period_years: return_period,
        annual_exceedance_probability: aep,
        potential_loss,
        business_interruption_loss: 0.0,
        climate_multiplier: multiplier,
        expected_annual_loss: eal,
        risk_level: level(facility, eal),
    })
}

fn assess_sea_level_rise(
    facility: &Facility,
    scenario: ScenarioId,
    year: u32,
    coastal: bool,
) -> HazardAssessment {
    let slr_m = sea_level_rise_m(scenario, year as f64);
    let loss = if coastal {
        facility.asset_value * SLR_EXPOSURE_SHARE * slr_m * SLR_DAMAGE_RATE
    } else {
        0.0
    };
    HazardAssessment {
        hazard_type: HazardType::SeaLevelRise,
        return_period_years: 1.0,
        annual_exceedance_probability: 1.0,
        potential_loss: loss,
        business_interruption_loss: 0.0,
        climate_multiplier: 1.0 + slr_m,
        expected_annual_loss: loss,
        risk_level: level(facility, loss),
    }
}
