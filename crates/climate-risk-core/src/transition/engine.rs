use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigRegistry, BASE_WACC};
use crate::error::ClimateRiskError;
use crate::pricing;
use crate::risk_math::{compose_wacc, npv, reduction_fraction};
use crate::types::{Facility, Money, PricingRegime, RiskLevel, ScenarioId, TonnesCo2};
use crate::ClimateRiskResult;

pub const DEFAULT_YEAR_START: u32 = 2025;
pub const DEFAULT_YEAR_END: u32 = 2050;

/// Fraction of energy cost added per USD/tCO2e of carbon price (grid and
/// fuel passthrough).
const ENERGY_PASSTHROUGH_PER_USD: f64 = 0.0012;
/// Transition capex per unit of asset value at r = 0.
const ALPHA_CAPEX: f64 = 0.006;
/// Transition opex per unit of asset value at r = 0.
const ALPHA_OPEX: f64 = 0.0015;
/// Capex/opex ramp with the reduction fraction: (1 + RAMP * r).
const REDUCTION_RAMP: f64 = 10.0;
/// Years per decay step in the technology-learning exponent.
const LEARNING_PERIOD_YEARS: f64 = 5.0;
/// |dNPV| above this fraction of asset value is High risk.
const HIGH_FRACTION: f64 = 0.10;
/// |dNPV| above this fraction of asset value is Medium risk.
const MEDIUM_FRACTION: f64 = 0.03;

/// One year of the facility's emission pathway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionPathPoint {
    pub year: u32,
    pub scope1: TonnesCo2,
    pub scope2: TonnesCo2,
    pub total: TonnesCo2,
}

/// One year of cost impacts. All columns are non-negative costs; the EBITDA
/// delta is their negated sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualImpact {
    pub year: u32,
    pub carbon_cost: Money,
    pub energy_cost_uplift: Money,
    pub revenue_impact: Money,
    /// Includes the stranded-asset write-down for carbon-intensive sectors.
    pub transition_capex: Money,
    pub transition_opex: Money,
    pub scope3_cost: Money,
    pub stranded_writedown: Money,
    /// Tonnes allocated for free under K-ETS. Present only for that regime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kets_free_allocation: Option<TonnesCo2>,
    /// Tonnes priced after free allocation. Present only under K-ETS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kets_excess_emissions: Option<TonnesCo2>,
    pub delta_ebitda: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityTransitionResult {
    pub facility_id: String,
    pub facility_name: String,
    pub sector: String,
    pub emission_pathway: Vec<EmissionPathPoint>,
    pub annual_impacts: Vec<AnnualImpact>,
    /// Sum of discounted EBITDA deltas over the horizon; non-positive.
    pub delta_npv: Money,
    /// delta_npv as a fraction of asset value.
    pub npv_vs_assets: f64,
    pub risk_level: RiskLevel,
}

/// Analyse transition risk for a facility set under (scenario, regime).
///
/// Pure over its inputs plus the registry; the only side channel is the
/// warnings vector (unknown sectors, clamped horizon years). Output order
/// matches input order. Cancellation is checked between facilities.
pub fn analyse(
    registry: &ConfigRegistry,
    facilities: &[Facility],
    scenario: ScenarioId,
    regime: PricingRegime,
    year_start: u32,
    year_end: u32,
    token: &CancellationToken,
    warnings: &mut Vec<String>,
) -> ClimateRiskResult<Vec<FacilityTransitionResult>> {
    if year_end < year_start {
        return Err(ClimateRiskError::InvalidInput {
            field: "year_end".into(),
            reason: "Analysis horizon must not end before it starts.".into(),
        });
    }
    let spec = registry.scenario(scenario);
    let wacc = compose_wacc(BASE_WACC, spec.credit_spread);

    // Price paths are memoised once per request. The global USD path always
    // drives energy passthrough and scope-3 exposure; the KRW path prices
    // allowance shortfalls when the regime is K-ETS.
    let usd_path = pricing::build_path(
        registry,
        scenario,
        PricingRegime::Global,
        year_start,
        year_end,
        warnings,
    );
    let krw_path = match regime {
        PricingRegime::Global => None,
        PricingRegime::Kets => {
            let mut scratch = Vec::new();
            Some(pricing::build_path(registry, scenario, PricingRegime::Kets, year_start, year_end, &mut scratch))
        }
    };
    let krw_per_usd = registry.kets().krw_per_usd;

    let mut results = Vec::with_capacity(facilities.len());
    for facility in facilities {
        if token.is_cancelled() {
            return Err(ClimateRiskError::Cancelled);
        }
        facility.validate()?;
        if !registry.knows_sector(&facility.sector) {
            warnings.push(format!(
                "Unknown sector '{}' for facility '{}'; default sector parameters applied.",
                facility.sector, facility.id
            ));
        }
        let params = registry.sector(&facility.sector);

        let mut pathway = Vec::with_capacity((year_end - year_start + 1) as usize);
        let mut impacts = Vec::with_capacity(pathway.capacity());
        let mut deltas: Vec<Money> = Vec::with_capacity(pathway.capacity());

        for (idx, year) in (year_start..=year_end).enumerate() {
            let r = reduction_fraction(
                spec.reduction_target,
                spec.steepness,
                spec.inflection_year,
                spec.target_year,
                year as f64,
            );
            let scope1 = facility.scope1_emissions * (1.0 - r);
            let scope2 = facility.scope2_emissions * (1.0 - r);
            pathway.push(EmissionPathPoint { year, scope1, scope2, total: scope1 + scope2 });

            let usd_price = usd_path[idx].price;
            let (carbon_cost, kets_free_allocation, kets_excess_emissions) = match &krw_path {
                None => (scope1 * usd_price, None, None),
                Some(krw) => {
                    let allocated = pricing::allocation_fraction(registry, &facility.sector, year as f64)
                        * facility.scope1_emissions;
                    let excess = (scope1 - allocated).max(0.0);
                    let cost = excess * krw[idx].price / krw_per_usd;
                    (cost, Some(allocated), Some(excess))
                }
            };

            let energy_cost_uplift = params.energy_cost_share
                * facility.annual_revenue
                * (usd_price * ENERGY_PASSTHROUGH_PER_USD)
                * (1.0 - 0.5 * r);
            let revenue_impact = facility.annual_revenue * params.demand_sensitivity * r;
            let learning = (1.0 - params.learning_rate).powf(idx as f64 / LEARNING_PERIOD_YEARS);
            let stranded_writedown = facility.asset_value * params.stranded_rate;
            let transition_capex =
                facility.asset_value * ALPHA_CAPEX * (1.0 + REDUCTION_RAMP * r) * learning
                    + stranded_writedown;
            let transition_opex =
                facility.asset_value * ALPHA_OPEX * (1.0 + REDUCTION_RAMP * r) * learning;
            let scope3_cost = facility.scope3_emissions * usd_price * params.scope3_exposure;

            let delta_ebitda = -(carbon_cost
                + energy_cost_uplift
                + revenue_impact
                + transition_capex
                + transition_opex
                + scope3_cost);
            deltas.push(delta_ebitda);

            impacts.push(AnnualImpact {
                year,
                carbon_cost,
                energy_cost_uplift,
                revenue_impact,
                transition_capex,
                transition_opex,
                scope3_cost,
                stranded_writedown,
                kets_free_allocation,
                kets_excess_emissions,
                delta_ebitda,
            });
        }

        let delta_npv = npv(wacc, &deltas)?;
        let npv_vs_assets = if facility.asset_value > 0.0 {
            delta_npv / facility.asset_value
        } else {
            0.0
        };
        results.push(FacilityTransitionResult {
            facility_id: facility.id.clone(),
            facility_name: facility.name.clone(),
            sector: facility.sector.clone(),
            emission_pathway: pathway,
            annual_impacts: impacts,
            delta_npv,
            npv_vs_assets,
            risk_level: RiskLevel::from_asset_fraction(npv_vs_assets, HIGH_FRACTION, MEDIUM_FRACTION),
        });
    }
    Ok(results)
}
