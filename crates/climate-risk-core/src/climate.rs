//! Climate-science lookups: (scenario, year) to warming above the
//! pre-industrial baseline, sea-level rise, and the regional hazard
//! multipliers derived from the warming level.

use crate::risk_math::interp_linear;
use crate::types::ScenarioId;

/// Warming already realised at the 2024 baseline, degrees C.
pub const BASELINE_WARMING_C: f64 = 1.2;

fn warming_points(scenario: ScenarioId) -> &'static [(f64, f64)] {
    match scenario {
        ScenarioId::NetZero2050 => &[
            (2024.0, 1.2),
            (2030.0, 1.3),
            (2040.0, 1.4),
            (2050.0, 1.5),
            (2075.0, 1.45),
            (2100.0, 1.4),
        ],
        ScenarioId::Below2c => &[
            (2024.0, 1.2),
            (2030.0, 1.35),
            (2040.0, 1.55),
            (2050.0, 1.7),
            (2075.0, 1.8),
            (2100.0, 1.9),
        ],
        ScenarioId::DelayedTransition => &[
            (2024.0, 1.2),
            (2030.0, 1.4),
            (2040.0, 1.7),
            (2050.0, 1.9),
            (2075.0, 2.2),
            (2100.0, 2.5),
        ],
        ScenarioId::CurrentPolicies => &[
            (2024.0, 1.2),
            (2030.0, 1.45),
            (2040.0, 1.75),
            (2050.0, 2.1),
            (2075.0, 2.6),
            (2100.0, 3.0),
        ],
    }
}

fn slr_points(scenario: ScenarioId) -> &'static [(f64, f64)] {
    match scenario {
        ScenarioId::NetZero2050 => &[
            (2024.0, 0.0),
            (2040.0, 0.10),
            (2050.0, 0.18),
            (2070.0, 0.26),
            (2100.0, 0.38),
        ],
        ScenarioId::Below2c => &[
            (2024.0, 0.0),
            (2040.0, 0.12),
            (2050.0, 0.20),
            (2070.0, 0.31),
            (2100.0, 0.47),
        ],
        ScenarioId::DelayedTransition => &[
            (2024.0, 0.0),
            (2040.0, 0.14),
            (2050.0, 0.23),
            (2070.0, 0.37),
            (2100.0, 0.56),
        ],
        ScenarioId::CurrentPolicies => &[
            (2024.0, 0.0),
            (2040.0, 0.16),
            (2050.0, 0.25),
            (2070.0, 0.44),
            (2100.0, 0.70),
        ],
    }
}

/// Global mean warming above pre-industrial for (scenario, year), degrees C.
pub fn warming_above_baseline(scenario: ScenarioId, year: f64) -> f64 {
    interp_linear(warming_points(scenario), year)
}

/// Mean sea-level rise above the 2024 baseline for (scenario, year), metres.
pub fn sea_level_rise_m(scenario: ScenarioId, year: f64) -> f64 {
    interp_linear(slr_points(scenario), year)
}

/// Scaling factor on annual heatwave-day counts: linear per degree of
/// warming beyond the 2024 baseline, never below 1.
pub fn heatwave_scaling(warming_c: f64) -> f64 {
    1.0 + 0.33 * (warming_c - BASELINE_WARMING_C).max(0.0)
}

/// Multiplier on drought severity, never below 1.
pub fn drought_multiplier(warming_c: f64) -> f64 {
    (1.0 + 0.2 * (warming_c - BASELINE_WARMING_C)).max(1.0)
}

/// Multiplier on flood losses under a warmer atmosphere, never below 1.
pub fn flood_multiplier(warming_c: f64) -> f64 {
    1.0 + 0.08 * (warming_c - 1.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warming_interpolates_between_knots() {
        // below_2c: 2030 -> 1.35, 2040 -> 1.55, so 2035 -> 1.45
        let w = warming_above_baseline(ScenarioId::Below2c, 2035.0);
        assert!((w - 1.45).abs() < 1e-12);
    }

    #[test]
    fn test_warming_ordering_across_scenarios_mid_century() {
        let year = 2050.0;
        let nz = warming_above_baseline(ScenarioId::NetZero2050, year);
        let b2 = warming_above_baseline(ScenarioId::Below2c, year);
        let dt = warming_above_baseline(ScenarioId::DelayedTransition, year);
        let cp = warming_above_baseline(ScenarioId::CurrentPolicies, year);
        assert!(nz < b2 && b2 < dt && dt < cp);
    }

    #[test]
    fn test_slr_zero_at_baseline_year() {
        for id in ScenarioId::ALL {
            assert_eq!(sea_level_rise_m(id, 2024.0), 0.0);
        }
    }

    #[test]
    fn test_slr_clamps_beyond_2100() {
        let v = sea_level_rise_m(ScenarioId::CurrentPolicies, 2150.0);
        assert_eq!(v, 0.70);
    }

    #[test]
    fn test_multipliers_never_below_one() {
        // Even under cooling relative to baseline the multipliers floor at 1.
        assert_eq!(heatwave_scaling(1.0), 1.0);
        assert_eq!(drought_multiplier(0.9), 1.0);
        assert_eq!(flood_multiplier(0.5), 1.0);
        assert!(heatwave_scaling(2.2) > 1.3);
    }
}
