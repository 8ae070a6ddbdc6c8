//! Request orchestration: resolves the facility set, runs the engines with
//! per-request memoised pricing, aggregates portfolio summaries, and wraps
//! every analysis in the standard envelope.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigRegistry, BASE_WACC};
use crate::esg::{self, DisclosureData, FrameworkAssessment};
use crate::physical::{self, FacilityPhysicalResult};
use crate::report::{build_disclosure_workbook, Workbook};
use crate::risk_math::compose_wacc;
use crate::transition::{self, FacilityTransitionResult, DEFAULT_YEAR_END, DEFAULT_YEAR_START};
use crate::types::{
    with_envelope, AnalysisEnvelope, Facility, FrameworkId, Money, PricingRegime, RiskLevel,
    ScenarioId,
};
use crate::weather::WeatherClient;
use crate::ClimateRiskResult;

#[derive(Debug, Clone, Serialize)]
pub struct TransitionAnalysis {
    pub scenario: ScenarioId,
    pub pricing_regime: PricingRegime,
    pub year_start: u32,
    pub year_end: u32,
    pub discount_rate: f64,
    pub facilities: Vec<FacilityTransitionResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskLevelCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectorBreakdown {
    pub sector: String,
    pub facility_count: usize,
    pub delta_npv: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionSummary {
    pub scenario: ScenarioId,
    pub pricing_regime: PricingRegime,
    pub facility_count: usize,
    pub total_delta_npv: Money,
    pub total_asset_value: Money,
    pub portfolio_npv_vs_assets: f64,
    pub risk_levels: RiskLevelCounts,
    /// In first-appearance order of the input facilities.
    pub by_sector: Vec<SectorBreakdown>,
    pub worst_facility_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioComparisonEntry {
    pub scenario: ScenarioId,
    pub total_delta_npv: Money,
    pub portfolio_npv_vs_assets: f64,
    pub high_risk_facilities: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioComparison {
    pub pricing_regime: PricingRegime,
    pub facility_count: usize,
    pub entries: Vec<ScenarioComparisonEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhysicalAssessment {
    pub scenario: ScenarioId,
    pub year: u32,
    pub use_live_weather: bool,
    pub facilities: Vec<FacilityPhysicalResult>,
    pub total_expected_annual_loss: Money,
    pub risk_levels: RiskLevelCounts,
}

fn count_levels<I: Iterator<Item = RiskLevel>>(levels: I) -> RiskLevelCounts {
    let mut counts = RiskLevelCounts { high: 0, medium: 0, low: 0 };
    for level in levels {
        match level {
            RiskLevel::High => counts.high += 1,
            RiskLevel::Medium => counts.medium += 1,
            RiskLevel::Low => counts.low += 1,
        }
    }
    counts
}

/// The analysis facade the adapter layer talks to.
pub struct Analyzer {
    registry: Arc<ConfigRegistry>,
    weather: Arc<WeatherClient>,
}

impl Analyzer {
    pub fn new(registry: Arc<ConfigRegistry>, weather: Arc<WeatherClient>) -> Self {
        Analyzer { registry, weather }
    }

    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    /// Literature sources quoted in the assumptions block.
    fn citation_sources(&self, ids: &[&str]) -> Vec<&'static str> {
        self.registry
            .citations()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(|c| c.source)
            .collect()
    }

    pub fn transition_analysis(
        &self,
        facilities: &[Facility],
        scenario: ScenarioId,
        regime: PricingRegime,
        token: &CancellationToken,
    ) -> ClimateRiskResult<AnalysisEnvelope<TransitionAnalysis>> {
        let start = Instant::now();
        let mut warnings = Vec::new();
        let results = transition::analyse(
            &self.registry,
            facilities,
            scenario,
            regime,
            DEFAULT_YEAR_START,
            DEFAULT_YEAR_END,
            token,
            &mut warnings,
        )?;
        let spec = self.registry.scenario(scenario);
        let analysis = TransitionAnalysis {
            scenario,
            pricing_regime: regime,
            year_start: DEFAULT_YEAR_START,
            year_end: DEFAULT_YEAR_END,
            discount_rate: compose_wacc(BASE_WACC, spec.credit_spread),
            facilities: results,
        };
        Ok(with_envelope(
            "Transition risk: discounted EBITDA deltas under a scenario carbon-price path",
            &json!({
                "scenario": scenario.as_str(),
                "pricing_regime": regime.as_str(),
                "base_wacc": BASE_WACC,
                "credit_spread": spec.credit_spread,
                "reduction_target": spec.reduction_target,
                "sources": self.citation_sources(&["ngfs-phase4", "kets-phase3"]),
            }),
            warnings,
            start.elapsed().as_micros() as u64,
            analysis,
        ))
    }

    pub fn transition_summary(
        &self,
        facilities: &[Facility],
        scenario: ScenarioId,
        regime: PricingRegime,
        token: &CancellationToken,
    ) -> ClimateRiskResult<AnalysisEnvelope<TransitionSummary>> {
        let start = Instant::now();
        let envelope = self.transition_analysis(facilities, scenario, regime, token)?;
        let results = &envelope.result.facilities;

        let total_delta_npv: f64 = results.iter().map(|r| r.delta_npv).sum();
        let total_asset_value: f64 = facilities.iter().map(|f| f.asset_value).sum();
        let mut by_sector: Vec<SectorBreakdown> = Vec::new();
        for result in results {
            match by_sector.iter_mut().find(|s| s.sector == result.sector) {
                Some(entry) => {
                    entry.facility_count += 1;
                    entry.delta_npv += result.delta_npv;
                }
                None => by_sector.push(SectorBreakdown {
                    sector: result.sector.clone(),
                    facility_count: 1,
                    delta_npv: result.delta_npv,
                }),
            }
        }
        let worst_facility_id = results
            .iter()
            .min_by(|a, b| {
                a.delta_npv.partial_cmp(&b.delta_npv).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|r| r.facility_id.clone());

        let summary = TransitionSummary {
            scenario,
            pricing_regime: regime,
            facility_count: results.len(),
            total_delta_npv,
            total_asset_value,
            portfolio_npv_vs_assets: if total_asset_value > 0.0 {
                total_delta_npv / total_asset_value
            } else {
                0.0
            },
            risk_levels: count_levels(results.iter().map(|r| r.risk_level)),
            by_sector,
            worst_facility_id,
        };
        Ok(with_envelope(
            "Portfolio aggregation of per-facility transition results",
            &envelope.assumptions,
            envelope.warnings,
            start.elapsed().as_micros() as u64,
            summary,
        ))
    }

    /// All four scenarios under one regime, for side-by-side comparison.
    pub fn scenario_comparison(
        &self,
        facilities: &[Facility],
        regime: PricingRegime,
        token: &CancellationToken,
    ) -> ClimateRiskResult<AnalysisEnvelope<ScenarioComparison>> {
        let start = Instant::now();
        let mut warnings = Vec::new();
        let total_assets: f64 = facilities.iter().map(|f| f.asset_value).sum();
        let mut entries = Vec::with_capacity(ScenarioId::ALL.len());
        for scenario in ScenarioId::ALL {
            let results = transition::analyse(
                &self.registry,
                facilities,
                scenario,
                regime,
                DEFAULT_YEAR_START,
                DEFAULT_YEAR_END,
                token,
                &mut warnings,
            )?;
            let total: f64 = results.iter().map(|r| r.delta_npv).sum();
            entries.push(ScenarioComparisonEntry {
                scenario,
                total_delta_npv: total,
                portfolio_npv_vs_assets: if total_assets > 0.0 { total / total_assets } else { 0.0 },
                high_risk_facilities: results
                    .iter()
                    .filter(|r| r.risk_level == RiskLevel::High)
                    .count(),
            });
        }
        warnings.sort();
        warnings.dedup();
        let comparison =
            ScenarioComparison { pricing_regime: regime, facility_count: facilities.len(), entries };
        Ok(with_envelope(
            "Four-scenario transition comparison under a single pricing regime",
            &json!({ "pricing_regime": regime.as_str(), "scenarios": 4 }),
            warnings,
            start.elapsed().as_micros() as u64,
            comparison,
        ))
    }

    pub async fn physical_assessment(
        &self,
        facilities: &[Facility],
        scenario: ScenarioId,
        year: u32,
        use_live_weather: bool,
        token: &CancellationToken,
    ) -> ClimateRiskResult<AnalysisEnvelope<PhysicalAssessment>> {
        let start = Instant::now();
        let mut warnings = Vec::new();
        let results = physical::assess(
            &self.registry,
            &self.weather,
            facilities,
            scenario,
            year,
            use_live_weather,
            token,
            &mut warnings,
        )
        .await?;
        let total: f64 = results.iter().map(|r| r.total_expected_annual_loss).sum();
        let assessment = PhysicalAssessment {
            scenario,
            year,
            use_live_weather,
            risk_levels: count_levels(results.iter().map(|r| r.overall_risk_level)),
            total_expected_annual_loss: total,
            facilities: results,
        };
        Ok(with_envelope(
            "Physical risk: hazard-specific expected annual loss per facility",
            &json!({
                "scenario": scenario.as_str(),
                "year": year,
                "use_live_weather": use_live_weather,
                "hazards": ["flood", "typhoon", "heatwave", "drought", "sea_level_rise"],
                "sources": self.citation_sources(&["ipcc-ar6-wg1", "ipcc-ar6-slr", "usace-depth-damage", "hazus-wind", "gumbel-precip", "heat-productivity"]),
            }),
            warnings,
            start.elapsed().as_micros() as u64,
            assessment,
        ))
    }

    pub fn esg_assessment(
        &self,
        facilities: &[Facility],
        framework: FrameworkId,
    ) -> ClimateRiskResult<AnalysisEnvelope<FrameworkAssessment>> {
        let start = Instant::now();
        let assessment = esg::assess(&self.registry, facilities, framework)?;
        Ok(with_envelope(
            "ESG disclosure readiness: weighted maturity with gap analysis",
            &json!({ "framework": framework.as_str(), "facility_count": facilities.len() }),
            Vec::new(),
            start.elapsed().as_micros() as u64,
            assessment,
        ))
    }

    pub fn disclosure(
        &self,
        facilities: &[Facility],
        framework: FrameworkId,
    ) -> ClimateRiskResult<AnalysisEnvelope<DisclosureData>> {
        let start = Instant::now();
        let data = esg::disclosure_data(&self.registry, facilities, framework)?;
        Ok(with_envelope(
            "Disclosure narrative and portfolio metrics",
            &json!({ "framework": framework.as_str() }),
            Vec::new(),
            start.elapsed().as_micros() as u64,
            data,
        ))
    }

    /// The multi-sheet disclosure artefact over all three engines.
    pub async fn disclosure_report(
        &self,
        facilities: &[Facility],
        framework: FrameworkId,
        scenario: ScenarioId,
        regime: PricingRegime,
        year: u32,
        token: &CancellationToken,
    ) -> ClimateRiskResult<Workbook> {
        let assessment = esg::assess(&self.registry, facilities, framework)?;
        let disclosure = esg::disclosure_data(&self.registry, facilities, framework)?;
        let mut warnings = Vec::new();
        let transition = transition::analyse(
            &self.registry,
            facilities,
            scenario,
            regime,
            DEFAULT_YEAR_START,
            DEFAULT_YEAR_END,
            token,
            &mut warnings,
        )?;
        let physical = physical::assess(
            &self.registry,
            &self.weather,
            facilities,
            scenario,
            year,
            false,
            token,
            &mut warnings,
        )
        .await?;
        Ok(build_disclosure_workbook(
            &assessment,
            &disclosure,
            &transition,
            &physical,
            facilities,
            scenario,
            regime,
            year,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::error::ClimateRiskError;
    use crate::weather::{DailySeries, WeatherArchive};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct DeadArchive;

    #[async_trait]
    impl WeatherArchive for DeadArchive {
        async fn fetch_daily(&self, _lat: f64, _lon: f64) -> ClimateRiskResult<DailySeries> {
            Err(ClimateRiskError::WeatherUnavailable("offline".into()))
        }
    }

    fn analyzer() -> Analyzer {
        let registry = Arc::new(ConfigRegistry::builtin());
        let weather = Arc::new(WeatherClient::new(Arc::new(DeadArchive), Arc::new(SystemClock)));
        Analyzer::new(registry, weather)
    }

    #[test]
    fn test_summary_totals_match_analysis() {
        let analyzer = analyzer();
        let token = CancellationToken::new();
        let facilities = analyzer.registry().seed_facilities().to_vec();
        let analysis = analyzer
            .transition_analysis(&facilities, ScenarioId::NetZero2050, PricingRegime::Global, &token)
            .unwrap();
        let summary = analyzer
            .transition_summary(&facilities, ScenarioId::NetZero2050, PricingRegime::Global, &token)
            .unwrap();
        let expected: f64 = analysis.result.facilities.iter().map(|r| r.delta_npv).sum();
        assert_eq!(summary.result.total_delta_npv, expected);
        assert_eq!(summary.result.facility_count, 17);
        let level_total = summary.result.risk_levels.high
            + summary.result.risk_levels.medium
            + summary.result.risk_levels.low;
        assert_eq!(level_total, 17);
    }

    #[test]
    fn test_sector_breakdown_in_first_appearance_order() {
        let analyzer = analyzer();
        let token = CancellationToken::new();
        let facilities = analyzer.registry().seed_facilities().to_vec();
        let summary = analyzer
            .transition_summary(&facilities, ScenarioId::Below2c, PricingRegime::Global, &token)
            .unwrap();
        let sectors: Vec<&str> =
            summary.result.by_sector.iter().map(|s| s.sector.as_str()).collect();
        // The seed portfolio opens with steel and ends with logistics.
        assert_eq!(sectors.first(), Some(&"steel"));
        assert_eq!(sectors.last(), Some(&"logistics"));
        let count: usize = summary.result.by_sector.iter().map(|s| s.facility_count).sum();
        assert_eq!(count, 17);
    }

    #[test]
    fn test_comparison_covers_four_scenarios_current_smallest() {
        let analyzer = analyzer();
        let token = CancellationToken::new();
        let facilities = analyzer.registry().seed_facilities().to_vec();
        let comparison = analyzer
            .scenario_comparison(&facilities, PricingRegime::Global, &token)
            .unwrap();
        assert_eq!(comparison.result.entries.len(), 4);
        let current = comparison
            .result
            .entries
            .iter()
            .find(|e| e.scenario == ScenarioId::CurrentPolicies)
            .unwrap();
        for entry in &comparison.result.entries {
            if entry.scenario != ScenarioId::CurrentPolicies {
                assert!(
                    current.total_delta_npv.abs() < entry.total_delta_npv.abs(),
                    "current_policies must be the mildest scenario"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_physical_assessment_envelope() {
        let analyzer = analyzer();
        let token = CancellationToken::new();
        let facilities = analyzer.registry().seed_facilities().to_vec();
        let envelope = analyzer
            .physical_assessment(&facilities, ScenarioId::Below2c, 2040, false, &token)
            .await
            .unwrap();
        assert_eq!(envelope.result.facilities.len(), 17);
        let expected: f64 =
            envelope.result.facilities.iter().map(|f| f.total_expected_annual_loss).sum();
        assert_eq!(envelope.result.total_expected_annual_loss, expected);
        assert_eq!(envelope.metadata.precision, "f64");
    }

    #[tokio::test]
    async fn test_disclosure_report_builds_workbook() {
        let analyzer = analyzer();
        let token = CancellationToken::new();
        let facilities = analyzer.registry().seed_facilities().to_vec();
        let workbook = analyzer
            .disclosure_report(
                &facilities,
                FrameworkId::Tcfd,
                ScenarioId::NetZero2050,
                PricingRegime::Global,
                2040,
                &token,
            )
            .await
            .unwrap();
        assert_eq!(workbook.sheets.len(), 8);
    }

    #[test]
    fn test_unknown_sector_warning_reaches_envelope() {
        let analyzer = analyzer();
        let token = CancellationToken::new();
        let mut facility = analyzer.registry().seed_facilities()[0].clone();
        facility.sector = "deep_sea_mining".into();
        let envelope = analyzer
            .transition_analysis(&[facility], ScenarioId::Below2c, PricingRegime::Global, &token)
            .unwrap();
        assert!(envelope.warnings.iter().any(|w| w.contains("deep_sea_mining")));
    }
}
