use serde::Serialize;

use crate::types::{Rate, ScenarioId};

/// Base weighted average cost of capital before the scenario credit spread.
pub const BASE_WACC: Rate = 0.08;

/// A reference policy future: warming trajectory, carbon-price calibration,
/// decarbonisation target, and financing-cost adjustment.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSpec {
    pub id: ScenarioId,
    pub name: &'static str,
    pub description: &'static str,
    /// Label of the warming trajectory this scenario follows.
    pub warming_trajectory: &'static str,
    /// Eight ascending (year, USD/tCO2e) calibration points, 2024-2050.
    pub price_points: Vec<(f64, f64)>,
    /// Fraction of baseline emissions removed by `target_year`.
    pub reduction_target: f64,
    pub target_year: f64,
    /// Inflection year of the logistic reduction trajectory.
    pub inflection_year: f64,
    /// Steepness of the logistic reduction trajectory (1/yr).
    pub steepness: f64,
    /// Credit spread added to the base WACC under this scenario.
    pub credit_spread: Rate,
}

/// The Korean allowance market: its own calibration points in KRW/tCO2e,
/// blended with the converted global path.
#[derive(Debug, Clone, Serialize)]
pub struct KetsMarket {
    /// Eight ascending (year, KRW/tCO2e) allowance-price calibration points.
    pub price_points: Vec<(f64, f64)>,
    /// Fixed conversion rate applied per request.
    pub krw_per_usd: f64,
    /// Weight of the converted global path in the blend; the remainder comes
    /// from the allowance-market points.
    pub global_blend: f64,
}

pub fn builtin_scenarios() -> Vec<ScenarioSpec> {
    vec![
        ScenarioSpec {
            id: ScenarioId::NetZero2050,
            name: "Net Zero 2050",
            description: "Orderly transition reaching net-zero CO2 by 2050; immediate, stringent policy.",
            warming_trajectory: "1.5C-consistent, limited overshoot",
            price_points: vec![
                (2024.0, 30.0),
                (2027.0, 80.0),
                (2030.0, 130.0),
                (2035.0, 250.0),
                (2040.0, 400.0),
                (2045.0, 550.0),
                (2048.0, 630.0),
                (2050.0, 700.0),
            ],
            reduction_target: 0.90,
            target_year: 2050.0,
            inflection_year: 2035.0,
            steepness: 0.14,
            credit_spread: 0.015,
        },
        ScenarioSpec {
            id: ScenarioId::Below2c,
            name: "Below 2\u{b0}C",
            description: "Orderly transition holding warming below 2C with gradually rising prices.",
            warming_trajectory: "well-below-2C",
            price_points: vec![
                (2024.0, 20.0),
                (2027.0, 40.0),
                (2030.0, 65.0),
                (2035.0, 110.0),
                (2040.0, 160.0),
                (2045.0, 210.0),
                (2048.0, 240.0),
                (2050.0, 260.0),
            ],
            reduction_target: 0.70,
            target_year: 2050.0,
            inflection_year: 2038.0,
            steepness: 0.12,
            credit_spread: 0.010,
        },
        ScenarioSpec {
            id: ScenarioId::DelayedTransition,
            name: "Delayed Transition",
            description: "Policy inaction until 2030 followed by an abrupt, disorderly correction.",
            warming_trajectory: "below-2C after overshoot",
            price_points: vec![
                (2024.0, 10.0),
                (2027.0, 12.0),
                (2030.0, 15.0),
                (2035.0, 180.0),
                (2040.0, 260.0),
                (2045.0, 330.0),
                (2048.0, 370.0),
                (2050.0, 400.0),
            ],
            reduction_target: 0.60,
            target_year: 2050.0,
            inflection_year: 2041.0,
            steepness: 0.22,
            credit_spread: 0.020,
        },
        ScenarioSpec {
            id: ScenarioId::CurrentPolicies,
            name: "Current Policies",
            description: "Only policies already legislated; carbon prices stay marginal.",
            warming_trajectory: "3C by 2100",
            price_points: vec![
                (2024.0, 5.0),
                (2027.0, 8.0),
                (2030.0, 10.0),
                (2035.0, 15.0),
                (2040.0, 20.0),
                (2045.0, 25.0),
                (2048.0, 28.0),
                (2050.0, 30.0),
            ],
            reduction_target: 0.15,
            target_year: 2050.0,
            inflection_year: 2040.0,
            steepness: 0.10,
            credit_spread: 0.005,
        },
    ]
}

pub fn kets_market() -> KetsMarket {
    KetsMarket {
        price_points: vec![
            (2024.0, 9_000.0),
            (2027.0, 15_000.0),
            (2030.0, 25_000.0),
            (2035.0, 60_000.0),
            (2040.0, 110_000.0),
            (2045.0, 170_000.0),
            (2048.0, 210_000.0),
            (2050.0, 240_000.0),
        ],
        krw_per_usd: 1_350.0,
        global_blend: 0.5,
    }
}
