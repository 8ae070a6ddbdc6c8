//! Report serialiser: flattens engine outputs into a multi-sheet tabular
//! artefact. The external spreadsheet writer consumes this structure as-is.
//! Monetary values are rounded to whole currency units here and only here.

use serde::Serialize;
use serde_json::{json, Value};

use crate::esg::{DisclosureData, FrameworkAssessment};
use crate::physical::FacilityPhysicalResult;
use crate::transition::FacilityTransitionResult;
use crate::types::{Facility, PricingRegime, ScenarioId};

/// The sheets of the disclosure workbook, in order.
pub const SHEET_NAMES: [&str; 8] = [
    "overview",
    "governance",
    "strategy",
    "risk_management",
    "metrics_and_targets",
    "gap_analysis",
    "regulatory_schedule",
    "raw_data",
];

#[derive(Debug, Clone, Serialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

fn money(v: f64) -> Value {
    json!(v.round())
}

fn headers(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Build the disclosure workbook from the already-computed engine outputs.
pub fn build_disclosure_workbook(
    assessment: &FrameworkAssessment,
    disclosure: &DisclosureData,
    transition: &[FacilityTransitionResult],
    physical: &[FacilityPhysicalResult],
    facilities: &[Facility],
    scenario: ScenarioId,
    regime: PricingRegime,
    year: u32,
) -> Workbook {
    let total_delta_npv: f64 = transition.iter().map(|t| t.delta_npv).sum();
    let total_eal: f64 = physical.iter().map(|p| p.total_expected_annual_loss).sum();

    let overview = Sheet {
        name: "overview".into(),
        headers: headers(&["field", "value"]),
        rows: vec![
            vec![json!("framework"), json!(assessment.framework.as_str())],
            vec![json!("framework_name"), json!(assessment.framework_name)],
            vec![json!("scenario"), json!(scenario.as_str())],
            vec![json!("pricing_regime"), json!(regime.as_str())],
            vec![json!("assessment_year"), json!(year)],
            vec![json!("facility_count"), json!(facilities.len())],
            vec![json!("overall_score"), json!(assessment.overall_score)],
            vec![json!("compliance_level"), json!(assessment.compliance_level)],
            vec![json!("maturity_level"), json!(assessment.maturity_level)],
            vec![json!("portfolio_transition_npv"), money(total_delta_npv)],
            vec![json!("portfolio_expected_annual_loss"), money(total_eal)],
        ],
    };

    // One sheet per disclosure pillar: checklist plus the narrative line.
    let mut sheets = vec![overview];
    for key in ["governance", "strategy", "risk_management", "metrics_and_targets"] {
        let mut rows: Vec<Vec<Value>> = Vec::new();
        if let Some(category) = assessment.categories.iter().find(|c| c.key == key) {
            for item in &category.items {
                rows.push(vec![
                    json!(item.name),
                    json!(item.status),
                    json!(item.recommendation),
                ]);
            }
        }
        if let Some(section) = disclosure.sections.iter().find(|s| s.key == key) {
            rows.push(vec![json!("narrative"), json!("-"), json!(section.narrative)]);
        }
        sheets.push(Sheet {
            name: key.into(),
            headers: headers(&["item", "status", "recommendation"]),
            rows,
        });
    }

    sheets.push(Sheet {
        name: "gap_analysis".into(),
        headers: headers(&[
            "category",
            "gap",
            "impact",
            "effort",
            "priority_score",
            "focus_item",
            "recommendation",
        ]),
        rows: assessment
            .gap_analysis
            .iter()
            .map(|g| {
                vec![
                    json!(g.category_name),
                    json!(g.gap),
                    json!(g.impact),
                    json!(g.effort.as_str()),
                    json!(g.priority_score),
                    json!(g.focus_item),
                    json!(g.recommendation),
                ]
            })
            .collect(),
    });

    sheets.push(Sheet {
        name: "regulatory_schedule".into(),
        headers: headers(&["date", "requirement"]),
        rows: assessment
            .deadlines
            .iter()
            .map(|d| vec![json!(d.date), json!(d.requirement)])
            .collect(),
    });

    let raw_rows = facilities
        .iter()
        .map(|f| {
            let t = transition.iter().find(|t| t.facility_id == f.id);
            let p = physical.iter().find(|p| p.facility_id == f.id);
            vec![
                json!(f.id),
                json!(f.name),
                json!(f.company),
                json!(f.sector),
                json!(f.latitude),
                json!(f.longitude),
                json!(f.scope1_emissions),
                json!(f.scope2_emissions),
                json!(f.scope3_emissions),
                money(f.annual_revenue),
                money(f.ebitda),
                money(f.asset_value),
                t.map(|t| money(t.delta_npv)).unwrap_or(Value::Null),
                t.map(|t| json!(t.risk_level)).unwrap_or(Value::Null),
                p.map(|p| money(p.total_expected_annual_loss)).unwrap_or(Value::Null),
                p.map(|p| json!(p.overall_risk_level)).unwrap_or(Value::Null),
                p.map(|p| json!(p.data_source)).unwrap_or(Value::Null),
            ]
        })
        .collect();
    sheets.push(Sheet {
        name: "raw_data".into(),
        headers: headers(&[
            "facility_id",
            "name",
            "company",
            "sector",
            "latitude",
            "longitude",
            "scope1_tco2e",
            "scope2_tco2e",
            "scope3_tco2e",
            "annual_revenue",
            "ebitda",
            "asset_value",
            "transition_npv",
            "transition_risk_level",
            "expected_annual_loss",
            "physical_risk_level",
            "weather_data_source",
        ]),
        rows: raw_rows,
    });

    Workbook { sheets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigRegistry;
    use crate::esg;
    use crate::physical;
    use crate::transition;
    use crate::types::FrameworkId;
    use crate::weather::{WeatherArchive, WeatherClient};
    use crate::clock::SystemClock;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    struct DeadArchive;

    #[async_trait]
    impl WeatherArchive for DeadArchive {
        async fn fetch_daily(
            &self,
            _lat: f64,
            _lon: f64,
        ) -> crate::ClimateRiskResult<crate::weather::DailySeries> {
            Err(crate::error::ClimateRiskError::WeatherUnavailable("offline".into()))
        }
    }

    async fn sample_workbook() -> Workbook {
        let reg = ConfigRegistry::builtin();
        let token = CancellationToken::new();
        let mut warnings = Vec::new();
        let facilities = reg.seed_facilities().to_vec();
        let assessment = esg::assess(&reg, &facilities, FrameworkId::Tcfd).unwrap();
        let disclosure = esg::disclosure_data(&reg, &facilities, FrameworkId::Tcfd).unwrap();
        let transition = transition::analyse(
            &reg,
            &facilities,
            ScenarioId::NetZero2050,
            PricingRegime::Global,
            transition::DEFAULT_YEAR_START,
            transition::DEFAULT_YEAR_END,
            &token,
            &mut warnings,
        )
        .unwrap();
        let weather = WeatherClient::new(Arc::new(DeadArchive), Arc::new(SystemClock));
        let physical = physical::assess(
            &reg,
            &weather,
            &facilities,
            ScenarioId::NetZero2050,
            2040,
            false,
            &token,
            &mut warnings,
        )
        .await
        .unwrap();
        build_disclosure_workbook(
            &assessment,
            &disclosure,
            &transition,
            &physical,
            &facilities,
            ScenarioId::NetZero2050,
            PricingRegime::Global,
            2040,
        )
    }

    #[tokio::test]
    async fn test_workbook_has_expected_sheets_in_order() {
        let workbook = sample_workbook().await;
        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, SHEET_NAMES.to_vec());
    }

    #[tokio::test]
    async fn test_raw_data_has_one_row_per_facility() {
        let workbook = sample_workbook().await;
        let raw = workbook.sheets.last().unwrap();
        assert_eq!(raw.rows.len(), 17);
        assert_eq!(raw.headers.len(), raw.rows[0].len());
    }

    #[tokio::test]
    async fn test_monetary_cells_are_rounded_whole_units() {
        let workbook = sample_workbook().await;
        let raw = workbook.sheets.last().unwrap();
        let npv_col = raw.headers.iter().position(|h| h == "transition_npv").unwrap();
        for row in &raw.rows {
            let v = row[npv_col].as_f64().expect("npv cell must be numeric");
            assert_eq!(v, v.round(), "monetary cells round at the boundary");
        }
    }

    #[tokio::test]
    async fn test_gap_sheet_mirrors_assessment() {
        let workbook = sample_workbook().await;
        let gaps = workbook.sheets.iter().find(|s| s.name == "gap_analysis").unwrap();
        assert_eq!(gaps.rows.len(), 4, "one row per TCFD category");
    }
}
