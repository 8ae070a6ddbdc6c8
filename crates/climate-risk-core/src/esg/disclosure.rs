use serde::Serialize;

use crate::config::{ConfigRegistry, RegulatoryDeadline};
use crate::esg::scoring::{assess, FrameworkAssessment};
use crate::types::{Facility, FrameworkId, Money, TonnesCo2};
use crate::ClimateRiskResult;

#[derive(Debug, Clone, Serialize)]
pub struct DisclosureSection {
    pub key: String,
    pub title: String,
    pub narrative: String,
}

/// Portfolio emission and financial aggregates quoted in the disclosure.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioMetrics {
    pub facility_count: usize,
    pub total_scope1: TonnesCo2,
    pub total_scope2: TonnesCo2,
    pub total_scope3: TonnesCo2,
    pub total_revenue: Money,
    pub total_asset_value: Money,
    /// tCO2e (scope 1+2) per million units of revenue.
    pub carbon_intensity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisclosureData {
    pub framework: FrameworkId,
    pub framework_name: &'static str,
    pub overall_score: f64,
    pub compliance_level: &'static str,
    pub maturity_level: u8,
    pub sections: Vec<DisclosureSection>,
    pub metrics: PortfolioMetrics,
    pub deadlines: Vec<RegulatoryDeadline>,
}

/// Assemble the disclosure narrative and metrics for one framework.
pub fn disclosure_data(
    registry: &ConfigRegistry,
    facilities: &[Facility],
    framework: FrameworkId,
) -> ClimateRiskResult<DisclosureData> {
    let assessment = assess(registry, facilities, framework)?;
    let metrics = portfolio_metrics(facilities);
    let sections = narrative_sections(&assessment, &metrics);
    Ok(DisclosureData {
        framework,
        framework_name: assessment.framework_name,
        overall_score: assessment.overall_score,
        compliance_level: assessment.compliance_level,
        maturity_level: assessment.maturity_level,
        sections,
        metrics,
        deadlines: assessment.deadlines,
    })
}

pub fn portfolio_metrics(facilities: &[Facility]) -> PortfolioMetrics {
    let total_scope1: f64 = facilities.iter().map(|f| f.scope1_emissions).sum();
    let total_scope2: f64 = facilities.iter().map(|f| f.scope2_emissions).sum();
    let total_scope3: f64 = facilities.iter().map(|f| f.scope3_emissions).sum();
    let total_revenue: f64 = facilities.iter().map(|f| f.annual_revenue).sum();
    let total_asset_value: f64 = facilities.iter().map(|f| f.asset_value).sum();
    let carbon_intensity = if total_revenue > 0.0 {
        (total_scope1 + total_scope2) / (total_revenue / 1.0e6)
    } else {
        0.0
    };
    PortfolioMetrics {
        facility_count: facilities.len(),
        total_scope1,
        total_scope2,
        total_scope3,
        total_revenue,
        total_asset_value,
        carbon_intensity,
    }
}

fn narrative_sections(
    assessment: &FrameworkAssessment,
    metrics: &PortfolioMetrics,
) -> Vec<DisclosureSection> {
    assessment
        .categories
        .iter()
        .map(|category| {
            let weakest = category
                .items
                .iter()
                .min_by(|a, b| {
                    a.status
                        .score()
                        .partial_cmp(&b.status.score())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|i| i.name.clone())
                .unwrap_or_default();
            let narrative = match category.key.as_str() {
                "governance" => format!(
                    "Climate governance for the {}-facility portfolio scores {:.1}/100 under {}. \
                     Priority improvement area: {}.",
                    metrics.facility_count, category.score, assessment.framework_name, weakest
                ),
                "strategy" => format!(
                    "Strategy disclosures score {:.1}/100. Scenario analysis covers the four \
                     reference policy futures; the weakest element is: {}.",
                    category.score, weakest
                ),
                "risk_management" => format!(
                    "Risk-management processes score {:.1}/100 across transition and physical \
                     hazards. Priority improvement area: {}.",
                    category.score, weakest
                ),
                "metrics_and_targets" => format!(
                    "Metrics & targets score {:.1}/100. Portfolio footprint: {:.0} tCO2e scope 1, \
                     {:.0} tCO2e scope 2, {:.0} tCO2e scope 3; intensity {:.1} tCO2e per million \
                     of revenue. Priority improvement area: {}.",
                    category.score,
                    metrics.total_scope1,
                    metrics.total_scope2,
                    metrics.total_scope3,
                    metrics.carbon_intensity,
                    weakest
                ),
                _ => format!("{} scores {:.1}/100.", category.name, category.score),
            };
            DisclosureSection {
                key: category.key.clone(),
                title: category.name.clone(),
                narrative,
            }
        })
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
    fn test_metrics_aggregate_the_portfolio() {
        let reg = registry();
        let metrics = portfolio_metrics(reg.seed_facilities());
        assert_eq!(metrics.facility_count, 17);
        let expected_scope1: f64 = reg.seed_facilities().iter().map(|f| f.scope1_emissions).sum();
        assert_eq!(metrics.total_scope1, expected_scope1);
        assert!(metrics.carbon_intensity > 0.0);
    }

    #[test]
    fn test_disclosure_has_a_section_per_category() {
        let reg = registry();
        let data = disclosure_data(&reg, reg.seed_facilities(), FrameworkId::Kssb).unwrap();
        let expected = reg.framework(FrameworkId::Kssb).categories.len();
        assert_eq!(data.sections.len(), expected);
        assert!(data.sections.iter().all(|s| !s.narrative.is_empty()));
    }

    #[test]
    fn test_metrics_section_quotes_the_footprint() {
        let reg = registry();
        let data = disclosure_data(&reg, reg.seed_facilities(), FrameworkId::Tcfd).unwrap();
        let metrics_section =
            data.sections.iter().find(|s| s.key == "metrics_and_targets").unwrap();
        assert!(metrics_section.narrative.contains("scope 1"));
    }
}
