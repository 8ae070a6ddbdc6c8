use serde::{Deserialize, Serialize};

use crate::config::{
    CategorySpec, ConfigRegistry, DataProbe, Effort, ItemStatus, RegulatoryDeadline,
};
use crate::error::ClimateRiskError;
use crate::types::{Facility, FrameworkId};
use crate::ClimateRiskResult;

/// Portfolio coverage at or above this share counts as compliant.
const COVERAGE_COMPLIANT: f64 = 0.8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItemResult {
    pub name: String,
    pub status: ItemStatus,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResult {
    pub key: String,
    pub name: String,
    pub weight: f64,
    /// 0-100.
    pub score: f64,
    pub items: Vec<ChecklistItemResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapItem {
    pub category_key: String,
    pub category_name: String,
    /// 100 - category score.
    pub gap: f64,
    /// Weighted impact scaled to 1-10.
    pub impact: f64,
    pub effort: Effort,
    pub priority_score: f64,
    /// Weakest checklist item of the category.
    pub focus_item: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameworkAssessment {
    pub framework: FrameworkId,
    pub framework_name: &'static str,
    /// 0-100 weighted maturity score.
    pub overall_score: f64,
    /// Korean grade label: 선도 / 우수 / 양호 / 보통 / 미흡.
    pub compliance_level: &'static str,
    /// 1-5.
    pub maturity_level: u8,
    pub categories: Vec<CategoryResult>,
    /// Sorted by priority score, highest first.
    pub gap_analysis: Vec<GapItem>,
    pub deadlines: Vec<RegulatoryDeadline>,
}

/// Score a portfolio's disclosure readiness against one framework.
pub fn assess(
    registry: &ConfigRegistry,
    facilities: &[Facility],
    framework: FrameworkId,
) -> ClimateRiskResult<FrameworkAssessment> {
    if facilities.is_empty() {
        return Err(ClimateRiskError::InvalidInput {
            field: "facilities".into(),
            reason: "ESG assessment requires at least one facility.".into(),
        });
    }
    let spec = registry.framework(framework);

    let mut categories = Vec::with_capacity(spec.categories.len());
    let mut overall_score = 0.0;
    for category in &spec.categories {
        let result = score_category(category, facilities);
        overall_score += category.weight * result.score;
        categories.push(result);
    }

    let gap_analysis = build_gap_analysis(&spec.categories, &categories);

    Ok(FrameworkAssessment {
        framework,
        framework_name: spec.name,
        overall_score,
        compliance_level: compliance_level(overall_score),
        maturity_level: maturity_level(overall_score),
        categories,
        gap_analysis,
        deadlines: spec.deadlines.clone(),
    })
}

fn score_category(category: &CategorySpec, facilities: &[Facility]) -> CategoryResult {
    let items: Vec<ChecklistItemResult> = category
        .items
        .iter()
        .map(|item| {
            let status = match item.probe {
                Some(probe) => probe_status(probe, facilities),
                None => item.default_status,
            };
            ChecklistItemResult {
                name: item.name.to_string(),
                status,
                recommendation: item.recommendation.to_string(),
            }
        })
        .collect();
    let score = if items.is_empty() {
        0.0
    } else {
        100.0 * items.iter().map(|i| i.status.score()).sum::<f64>() / items.len() as f64
    };
    CategoryResult {
        key: category.key.to_string(),
        name: category.name.to_string(),
        weight: category.weight,
        score,
        items,
    }
}

/// Derive an item status from portfolio reporting coverage.
fn probe_status(probe: DataProbe, facilities: &[Facility]) -> ItemStatus {
    let reported = facilities
        .iter()
        .filter(|f| match probe {
            DataProbe::Scope1Coverage => f.scope1_emissions > 0.0,
            DataProbe::Scope2Coverage => f.scope2_emissions > 0.0,
            DataProbe::Scope3Coverage => f.scope3_emissions > 0.0,
        })
        .count() as f64;
    let coverage = reported / facilities.len() as f64;
    if coverage >= COVERAGE_COMPLIANT {
        ItemStatus::Compliant
    } else if coverage > 0.0 {
        ItemStatus::Partial
    } else {
        ItemStatus::NonCompliant
    }
}

fn build_gap_analysis(specs: &[CategorySpec], results: &[CategoryResult]) -> Vec<GapItem> {
    let mut gaps: Vec<GapItem> = specs
        .iter()
        .zip(results)
        .map(|(spec, result)| {
            let gap = 100.0 - result.score;
            let impact = (spec.weight * gap).clamp(1.0, 10.0);
            let priority_score = impact / spec.effort.weight();
            // The weakest item anchors the remediation advice.
            let focus = result
                .items
                .iter()
                .min_by(|a, b| {
                    a.status
                        .score()
                        .partial_cmp(&b.status.score())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .cloned()
                .unwrap_or(ChecklistItemResult {
                    name: result.name.clone(),
                    status: ItemStatus::Partial,
                    recommendation: String::new(),
                });
            GapItem {
                category_key: result.key.clone(),
                category_name: result.name.clone(),
                gap,
                impact,
                effort: spec.effort,
                priority_score,
                focus_item: focus.name,
                recommendation: focus.recommendation,
            }
        })
        .collect();
    gaps.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category_key.cmp(&b.category_key))
    });
    gaps
}

fn compliance_level(score: f64) -> &'static str {
    if score >= 90.0 {
        "선도"
    } else if score >= 80.0 {
        "우수"
    } else if score >= 65.0 {
        "양호"
    } else if score >= 50.0 {
        "보통"
    } else {
        "미흡"
    }
}

fn maturity_level(score: f64) -> u8 {
    if score >= 90.0 {
        5
    } else if score >= 75.0 {
        4
    } else if score >= 60.0 {
        3
    } else if score >= 40.0 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> ConfigRegistry {
        ConfigRegistry::builtin()
    }

    /// A portfolio that reports Scope 1 and 2 everywhere but no Scope 3.
    fn scope12_only_portfolio() -> Vec<Facility> {
        registry()
            .seed_facilities()
            .iter()
            .cloned()
            .map(|mut f| {
                f.scope3_emissions = 0.0;
                f
            })
            .collect()
    }

    #[test]
    fn test_scope12_portfolio_scores_in_band() {
        let reg = registry();
        let assessment = assess(&reg, &scope12_only_portfolio(), FrameworkId::Tcfd).unwrap();
        assert!(
            (70.0..=90.0).contains(&assessment.overall_score),
            "score out of band: {}",
            assessment.overall_score
        );
        // gov 87.5*0.25 + strat 87.5*0.30 + risk 87.5*0.25 + metrics 60*0.20
        assert!((assessment.overall_score - 82.0).abs() < 1e-9);
        assert_eq!(assessment.compliance_level, "우수");
        assert_eq!(assessment.maturity_level, 4);
    }

    #[test]
    fn test_missing_scope3_tops_gap_analysis() {
        let reg = registry();
        let assessment = assess(&reg, &scope12_only_portfolio(), FrameworkId::Tcfd).unwrap();
        let top = &assessment.gap_analysis[0];
        assert_eq!(top.category_key, "metrics_and_targets");
        assert!(top.focus_item.contains("Scope 3"), "focus: {}", top.focus_item);
        assert!(matches!(top.effort, Effort::Medium | Effort::High));
        // impact = weight (0.20) * gap (40) = 8, effort high -> 8/3
        assert!((top.impact - 8.0).abs() < 1e-9);
        assert!((top.priority_score - 8.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_scope_reporting_lifts_metrics_category() {
        let reg = registry();
        let full = assess(&reg, reg.seed_facilities(), FrameworkId::Tcfd).unwrap();
        let partial = assess(&reg, &scope12_only_portfolio(), FrameworkId::Tcfd).unwrap();
        let metrics_full = full.categories.iter().find(|c| c.key == "metrics_and_targets").unwrap();
        let metrics_partial =
            partial.categories.iter().find(|c| c.key == "metrics_and_targets").unwrap();
        // [1, 1, 1, 0.5, 0.5] -> 80 vs [1, 1, 0, 0.5, 0.5] -> 60
        assert_eq!(metrics_full.score, 80.0);
        assert_eq!(metrics_partial.score, 60.0);
        assert!(full.overall_score > partial.overall_score);
    }

    #[test]
    fn test_partial_scope3_coverage_is_partial_status() {
        let reg = registry();
        let mut facilities = scope12_only_portfolio();
        // 4 of 17 report scope 3: coverage 23%, below the 80% bar.
        for f in facilities.iter_mut().take(4) {
            f.scope3_emissions = 1.0e5;
        }
        let assessment = assess(&reg, &facilities, FrameworkId::Tcfd).unwrap();
        let metrics = assessment.categories.iter().find(|c| c.key == "metrics_and_targets").unwrap();
        let scope3 = metrics.items.iter().find(|i| i.name.contains("Scope 3")).unwrap();
        assert_eq!(scope3.status, ItemStatus::Partial);
    }

    #[test]
    fn test_every_framework_is_assessable() {
        let reg = registry();
        for id in FrameworkId::ALL {
            let assessment = assess(&reg, reg.seed_facilities(), id).unwrap();
            assert!(assessment.overall_score > 0.0 && assessment.overall_score <= 100.0);
            assert!(!assessment.gap_analysis.is_empty());
            assert!(!assessment.deadlines.is_empty());
        }
    }

    #[test]
    fn test_gap_analysis_sorted_by_priority() {
        let reg = registry();
        let assessment = assess(&reg, &scope12_only_portfolio(), FrameworkId::Tcfd).unwrap();
        for pair in assessment.gap_analysis.windows(2) {
            assert!(pair[0].priority_score >= pair[1].priority_score);
        }
    }

    #[test]
    fn test_compliance_grades() {
        assert_eq!(compliance_level(93.0), "선도");
        assert_eq!(compliance_level(90.0), "선도");
        assert_eq!(compliance_level(82.0), "우수");
        assert_eq!(compliance_level(70.0), "양호");
        assert_eq!(compliance_level(55.0), "보통");
        assert_eq!(compliance_level(49.9), "미흡");
    }

    #[test]
    fn test_maturity_levels() {
        assert_eq!(maturity_level(95.0), 5);
        assert_eq!(maturity_level(75.0), 4);
        assert_eq!(maturity_level(60.0), 3);
        assert_eq!(maturity_level(40.0), 2);
        assert_eq!(maturity_level(10.0), 1);
    }

    #[test]
    fn test_empty_portfolio_rejected() {
        let reg = registry();
        assert!(assess(&reg, &[], FrameworkId::Tcfd).is_err());
    }
}
