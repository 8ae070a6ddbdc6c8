use serde::{Deserialize, Serialize};

use crate::config::SectorParams;
use crate::risk_math::interp_linear;
use crate::types::Facility;

/// The five modelled hazards, in canonical evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardType {
    Flood,
    Typhoon,
    Heatwave,
    Drought,
    SeaLevelRise,
}

impl HazardType {
    pub const CANONICAL_ORDER: [HazardType; 5] = [
        HazardType::Flood,
        HazardType::Typhoon,
        HazardType::Heatwave,
        HazardType::Drought,
        HazardType::SeaLevelRise,
    ];
}

/// Flood design event return period, years.
pub const FLOOD_RETURN_PERIOD: f64 = 100.0;
/// Daily rainfall absorbed before ponding, mm.
pub const RAIN_THRESHOLD_MM: f64 = 80.0;
/// Rainfall-to-inundation conversion, mm of rain per metre of depth.
pub const MM_PER_METRE_DEPTH: f64 = 150.0;

/// Latitude belt with meaningful typhoon exposure, degrees absolute.
pub const TYPHOON_BELT: (f64, f64) = (15.0, 40.0);
/// Annual strike rate inside / outside the belt.
pub const TYPHOON_LAMBDA_BELT: f64 = 0.6;
pub const TYPHOON_LAMBDA_ELSEWHERE: f64 = 0.1;
/// Coastal strike-rate multiplier.
pub const TYPHOON_COASTAL_FACTOR: f64 = 1.5;
/// Peak wind model: base speed plus warming sensitivity, m/s.
pub const TYPHOON_BASE_WIND_MS: f64 = 35.0;
pub const TYPHOON_WIND_PER_DEGREE: f64 = 5.0;
/// Business interruption conditional on a strike, share of annual revenue.
pub const TYPHOON_BI_RATE: f64 = 0.03;

/// Productivity loss per heatwave day, share of revenue per factor unit.
pub const HEATWAVE_LOSS_RATE: f64 = 0.004;

/// Severe-drought loss as a share of asset value.
pub const DROUGHT_LOSS_RATE: f64 = 0.016;
/// Floor on the drought return period when a strong deficit is observed.
pub const DROUGHT_MIN_RETURN_PERIOD: f64 = 5.0;

/// Share of asset value exposed to chronic coastal inundation.
pub const SLR_EXPOSURE_SHARE: f64 = 0.05;
/// Annualised damage per metre of sea-level rise on the exposed share.
pub const SLR_DAMAGE_RATE: f64 = 0.15;

/// USACE industrial depth-damage relationship, damage ratio by inundation
/// depth in metres. Monotone, flat ceiling at 0.6.
const DEPTH_DAMAGE_CURVE: [(f64, f64); 6] = [
    (0.0, 0.0),
    (0.5, 0.15),
    (1.0, 0.25),
    (2.0, 0.40),
    (3.0, 0.50),
    (4.0, 0.60),
];

pub fn depth_damage_ratio(depth_m: f64) -> f64 {
    if depth_m <= 0.0 {
        return 0.0;
    }
    interp_linear(&DEPTH_DAMAGE_CURVE, depth_m).min(0.6)
}

/// Hazus hurricane wind curve: damage ratio by peak gust, m/s.
const WIND_DAMAGE_CURVE: [(f64, f64); 5] = [
    (30.0, 0.003),
    (40.0, 0.015),
    (50.0, 0.045),
    (60.0, 0.10),
    (70.0, 0.18),
];

pub fn wind_damage_ratio(wind_ms: f64) -> f64 {
    if wind_ms < WIND_DAMAGE_CURVE[0].0 {
        return 0.0;
    }
    interp_linear(&WIND_DAMAGE_CURVE, wind_ms)
}

pub fn in_typhoon_belt(latitude: f64) -> bool {
    let a = latitude.abs();
    (TYPHOON_BELT.0..=TYPHOON_BELT.1).contains(&a)
}

/// Coastal exposure: the explicit flag wins, otherwise the sector
/// presumption stands in for the 5 km coastline test.
pub fn is_coastal(facility: &Facility, params: &SectorParams) -> bool {
    facility.coastal.unwrap_or(params.coastal_presumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_depth_damage_monotone_with_ceiling() {
        assert_eq!(depth_damage_ratio(-0.5), 0.0);
        assert_eq!(depth_damage_ratio(0.0), 0.0);
        assert_eq!(depth_damage_ratio(0.5), 0.15);
        assert!((depth_damage_ratio(1.5) - 0.325).abs() < 1e-12);
        assert_eq!(depth_damage_ratio(4.0), 0.6);
        // Flat ceiling beyond the deepest knot.
        assert_eq!(depth_damage_ratio(9.0), 0.6);
        let mut prev = 0.0;
        for i in 0..50 {
            let d = depth_damage_ratio(i as f64 * 0.2);
            assert!(d >= prev);
            prev = d;
        }
    }

    #[test]
    fn test_wind_damage_curve() {
        assert_eq!(wind_damage_ratio(20.0), 0.0);
        assert_eq!(wind_damage_ratio(40.0), 0.015);
        // 42.75 m/s sits between the 40 and 50 knots: 0.015 + 0.275*0.03
        assert!((wind_damage_ratio(42.75) - 0.023_25).abs() < 1e-12);
        assert_eq!(wind_damage_ratio(90.0), 0.18);
    }

    #[test]
    fn test_typhoon_belt() {
        assert!(in_typhoon_belt(35.5));
        assert!(in_typhoon_belt(-22.0));
        assert!(!in_typhoon_belt(55.0));
        assert!(!in_typhoon_belt(5.0));
    }

    #[test]
    fn test_canonical_order_is_stable() {
        let names: Vec<_> = HazardType::CANONICAL_ORDER
            .iter()
            .map(|h| serde_json::to_string(h).unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "\"flood\"",
                "\"typhoon\"",
                "\"heatwave\"",
                "\"drought\"",
                "\"sea_level_rise\""
            ]
        );
    }
}
