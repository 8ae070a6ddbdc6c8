//! Carbon pricing: the interpolated price path for a (scenario, regime)
//! pair and the K-ETS free-allocation schedule.
//!
//! The global path is quoted in USD/tCO2e. The K-ETS path is quoted in
//! KRW/tCO2e and is a blend of the converted global path and the Korean
//! allowance market's own calibration points. Outside the calibration range
//! prices clamp to the nearest endpoint; there is no extrapolation.

use serde::Serialize;

use crate::config::ConfigRegistry;
use crate::risk_math::interp_linear;
use crate::types::{Money, PricingRegime, ScenarioId};

/// Years outside this window clamp to an endpoint and add a warning.
pub const CALIBRATION_START_YEAR: f64 = 2024.0;
pub const HORIZON_END_YEAR: f64 = 2100.0;

/// One point on a carbon-price path.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PricePoint {
    pub year: f64,
    /// USD/tCO2e under the global regime, KRW/tCO2e under K-ETS.
    pub price: Money,
}

/// Carbon price for any year under the selected regime.
pub fn price_at(
    registry: &ConfigRegistry,
    scenario: ScenarioId,
    regime: PricingRegime,
    year: f64,
) -> Money {
    let spec = registry.scenario(scenario);
    let global_usd = interp_linear(&spec.price_points, year);
    match regime {
        PricingRegime::Global => global_usd,
        PricingRegime::Kets => {
            let kets = registry.kets();
            let converted = global_usd * kets.krw_per_usd;
            let domestic = interp_linear(&kets.price_points, year);
            kets.global_blend * converted + (1.0 - kets.global_blend) * domestic
        }
    }
}

/// K-ETS price expressed in the request currency (USD) at the fixed rate.
pub fn kets_price_usd(registry: &ConfigRegistry, scenario: ScenarioId, year: f64) -> Money {
    price_at(registry, scenario, PricingRegime::Kets, year) / registry.kets().krw_per_usd
}

/// Free-allocation fraction for K-ETS:
/// `max(0, base[sector] - tighten[sector] * (year - 2024))`, clamped to [0, 1].
/// The clamp at zero is deliberate; allocation deficits never turn into
/// bankable credits.
pub fn allocation_fraction(registry: &ConfigRegistry, sector: &str, year: f64) -> f64 {
    let params = registry.sector(sector);
    (params.kets_base_allocation - params.kets_tightening * (year - CALIBRATION_START_YEAR))
        .clamp(0.0, 1.0)
}

/// The full interpolated path for [year_start, year_end], one point per
/// year. Built once per request and reused by the engines. Years outside
/// [2024, 2100] clamp and record a warning.
pub fn build_path(
    registry: &ConfigRegistry,
    scenario: ScenarioId,
    regime: PricingRegime,
    year_start: u32,
    year_end: u32,
    warnings: &mut Vec<String>,
) -> Vec<PricePoint> {
    if (year_start as f64) < CALIBRATION_START_YEAR || (year_end as f64) > HORIZON_END_YEAR {
        tracing::warn!(year_start, year_end, "price path clamped to the calibration horizon");
        warnings.push(format!(
            "Years outside [{CALIBRATION_START_YEAR}, {HORIZON_END_YEAR}] use the nearest calibrated endpoint price."
        ));
    }
    (year_start..=year_end)
        .map(|y| PricePoint { year: y as f64, price: price_at(registry, scenario, regime, y as f64) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> ConfigRegistry {
        ConfigRegistry::builtin()
    }

    #[test]
    fn test_global_price_interpolates() {
        let reg = registry();
        // net_zero_2050: 2024 -> 30, 2027 -> 80; 2025 is a third of the way.
        let p = price_at(&reg, ScenarioId::NetZero2050, PricingRegime::Global, 2025.0);
        assert!((p - (30.0 + 50.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_global_price_clamps_at_endpoints() {
        let reg = registry();
        let before = price_at(&reg, ScenarioId::NetZero2050, PricingRegime::Global, 2015.0);
        let after = price_at(&reg, ScenarioId::NetZero2050, PricingRegime::Global, 2090.0);
        assert_eq!(before, 30.0);
        assert_eq!(after, 700.0);
    }

    #[test]
    fn test_prices_nonnegative_and_monotone_for_orderly_scenarios() {
        let reg = registry();
        for id in ScenarioId::ALL {
            let mut prev = f64::NEG_INFINITY;
            for year in 2024..=2050 {
                let p = price_at(&reg, id, PricingRegime::Global, year as f64);
                assert!(p >= 0.0, "{id} {year}");
                if matches!(id, ScenarioId::NetZero2050 | ScenarioId::Below2c) {
                    assert!(p >= prev, "{id} price path must be non-decreasing at {year}");
                }
                prev = p;
            }
        }
    }

    #[test]
    fn test_kets_price_is_blend_of_global_and_domestic() {
        let reg = registry();
        let year = 2030.0;
        let global_usd = price_at(&reg, ScenarioId::NetZero2050, PricingRegime::Global, year);
        let kets = price_at(&reg, ScenarioId::NetZero2050, PricingRegime::Kets, year);
        // 0.5 * (130 * 1350) + 0.5 * 25_000
        let expected = 0.5 * global_usd * 1_350.0 + 0.5 * 25_000.0;
        assert!((kets - expected).abs() < 1e-6);
    }

    #[test]
    fn test_allocation_fraction_bounds_and_monotonicity() {
        let reg = registry();
        for tag in reg.sector_tags() {
            let mut prev = f64::INFINITY;
            for year in 2024..=2060 {
                let a = allocation_fraction(&reg, tag, year as f64);
                assert!((0.0..=1.0).contains(&a), "{tag} {year}: {a}");
                assert!(a <= prev, "{tag} allocation must not increase ({year})");
                prev = a;
            }
        }
    }

    #[test]
    fn test_allocation_clamps_at_zero() {
        let reg = registry();
        // steel: 0.95 - 0.036 * 40 < 0 at 2064
        assert_eq!(allocation_fraction(&reg, "steel", 2064.0), 0.0);
    }

    #[test]
    fn test_unknown_sector_uses_default_allocation() {
        let reg = registry();
        let unknown = allocation_fraction(&reg, "asteroid_mining", 2024.0);
        let default = allocation_fraction(&reg, "default-not-a-tag", 2024.0);
        assert_eq!(unknown, default);
        assert_eq!(unknown, 0.80);
    }

    #[test]
    fn test_build_path_covers_every_year_in_order() {
        let reg = registry();
        let mut warnings = Vec::new();
        let path = build_path(
            &reg,
            ScenarioId::Below2c,
            PricingRegime::Global,
            2025,
            2050,
            &mut warnings,
        );
        assert_eq!(path.len(), 26);
        assert_eq!(path[0].year, 2025.0);
        assert_eq!(path[25].year, 2050.0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_build_path_warns_outside_horizon() {
        let reg = registry();
        let mut warnings = Vec::new();
        let path = build_path(
            &reg,
            ScenarioId::Below2c,
            PricingRegime::Global,
            2020,
            2030,
            &mut warnings,
        );
        assert_eq!(path[0].price, 20.0); // clamped to the 2024 endpoint
        assert_eq!(warnings.len(), 1);
    }
}
