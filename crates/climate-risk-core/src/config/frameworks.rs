use serde::{Deserialize, Serialize};

use crate::types::FrameworkId;

/// Checklist item status and its score contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Compliant,
    Partial,
    NonCompliant,
}

impl ItemStatus {
    pub fn score(&self) -> f64 {
        match self {
            ItemStatus::Compliant => 1.0,
            ItemStatus::Partial => 0.5,
            ItemStatus::NonCompliant => 0.0,
        }
    }
}

/// Implementation effort bucket used by the gap analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    pub fn weight(&self) -> f64 {
        match self {
            Effort::Low => 1.0,
            Effort::Medium => 2.0,
            Effort::High => 3.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Effort::Low => "low",
            Effort::Medium => "medium",
            Effort::High => "high",
        }
    }
}

/// Portfolio-derived item statuses. Items carrying a probe are scored from
/// the facility data instead of the static default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataProbe {
    /// Share of facilities reporting scope-1 emissions.
    Scope1Coverage,
    /// Share of facilities reporting scope-2 emissions.
    Scope2Coverage,
    /// Share of facilities reporting scope-3 emissions.
    Scope3Coverage,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItemSpec {
    pub name: &'static str,
    /// Status used when no probe applies.
    pub default_status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<DataProbe>,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySpec {
    pub key: &'static str,
    pub name: &'static str,
    /// Category weights sum to 1.0 within a framework.
    pub weight: f64,
    pub effort: Effort,
    pub items: Vec<ChecklistItemSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegulatoryDeadline {
    pub date: &'static str,
    pub requirement: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameworkSpec {
    pub id: FrameworkId,
    pub name: &'static str,
    pub authority: &'static str,
    pub description: &'static str,
    pub categories: Vec<CategorySpec>,
    pub deadlines: Vec<RegulatoryDeadline>,
}

fn item(name: &'static str, status: ItemStatus, recommendation: &'static str) -> ChecklistItemSpec {
    ChecklistItemSpec { name, default_status: status, probe: None, recommendation }
}

fn probed(
    name: &'static str,
    probe: DataProbe,
    recommendation: &'static str,
) -> ChecklistItemSpec {
    ChecklistItemSpec { name, default_status: ItemStatus::NonCompliant, probe: Some(probe), recommendation }
}

pub fn builtin_frameworks() -> Vec<FrameworkSpec> {
    use Effort::*;
    use ItemStatus::*;

    vec![
        FrameworkSpec {
            id: FrameworkId::Tcfd,
            name: "TCFD Recommendations",
            authority: "Task Force on Climate-related Financial Disclosures (FSB)",
            description: "Four-pillar disclosure architecture: governance, strategy, risk management, metrics & targets.",
            categories: vec![
                CategorySpec {
                    key: "governance",
                    name: "Governance",
                    weight: 0.25,
                    effort: Medium,
                    items: vec![
                        item(
                            "Board oversight of climate-related issues",
                            Compliant,
                            "Document the board committee charter covering climate oversight.",
                        ),
                        item(
                            "Management's role in assessing climate risk",
                            Compliant,
                            "Name the accountable executive and reporting line for climate risk.",
                        ),
                        item(
                            "Climate competence on the board",
                            Compliant,
                            "Record climate-related expertise in director skill matrices.",
                        ),
                        item(
                            "Climate-linked executive remuneration",
                            Partial,
                            "Tie a defined share of variable pay to decarbonisation milestones.",
                        ),
                    ],
                },
                CategorySpec {
                    key: "strategy",
                    name: "Strategy",
                    weight: 0.30,
                    effort: High,
                    items: vec![
                        item(
                            "Identification of climate risks over short, medium and long horizons",
                            Compliant,
                            "Maintain the horizon-bucketed climate risk inventory.",
                        ),
                        item(
                            "Impact on business strategy and financial planning",
                            Compliant,
                            "Quantify transition-cost impact inside the annual financial plan.",
                        ),
                        item(
                            "Scenario analysis including a 2\u{b0}C or lower pathway",
                            Compliant,
                            "Refresh the scenario suite annually against current reference futures.",
                        ),
                        item(
                            "Resilience of strategy under divergent scenarios",
                            Partial,
                            "Publish a strategy-resilience statement covering the disorderly case.",
                        ),
                    ],
                },
                CategorySpec {
                    key: "risk_management",
                    name: "Risk Management",
                    weight: 0.25,
                    effort: Medium,
                    items: vec![
                        item(
                            "Processes for identifying climate risks",
                            Compliant,
                            "Keep the hazard and transition-driver register current.",
                        ),
                        item(
                            "Processes for managing climate risks",
                            Compliant,
                            "Assign mitigation owners and track residual exposure.",
                        ),
                        item(
                            "Integration into enterprise risk management",
                            Partial,
                            "Score climate risks on the corporate ERM scale alongside other risks.",
                        ),
                        item(
                            "Prioritisation of material climate risks",
                            Compliant,
                            "Review materiality thresholds with the audit committee.",
                        ),
                    ],
                },
                CategorySpec {
                    key: "metrics_and_targets",
                    name: "Metrics & Targets",
                    weight: 0.20,
                    effort: High,
                    items: vec![
                        probed(
                            "Scope 1 emissions disclosure",
                            DataProbe::Scope1Coverage,
                            "Report direct emissions for every consolidated facility.",
                        ),
                        probed(
                            "Scope 2 emissions disclosure",
                            DataProbe::Scope2Coverage,
                            "Report purchased-energy emissions for every consolidated facility.",
                        ),
                        probed(
                            "Scope 3 value-chain emissions disclosure",
                            DataProbe::Scope3Coverage,
                            "Build the value-chain inventory and report material Scope 3 categories.",
                        ),
                        item(
                            "Science-based reduction targets",
                            Partial,
                            "Submit reduction targets for external validation.",
                        ),
                        item(
                            "Internal carbon price and intensity metrics",
                            Partial,
                            "Adopt an internal carbon price in capital-allocation decisions.",
                        ),
                    ],
                },
            ],
            deadlines: vec![
                RegulatoryDeadline {
                    date: "2025-01-01",
                    requirement: "TCFD-aligned disclosure expected in mainstream annual filings.",
                },
                RegulatoryDeadline {
                    date: "2026-01-01",
                    requirement: "Transition of TCFD monitoring to the ISSB reporting baseline.",
                },
            ],
        },
        FrameworkSpec {
            id: FrameworkId::Issb,
            name: "ISSB IFRS S2",
            authority: "International Sustainability Standards Board",
            description: "Climate-related disclosures under IFRS S2, building on the TCFD architecture.",
            categories: vec![
                CategorySpec {
                    key: "governance",
                    name: "Governance",
                    weight: 0.20,
                    effort: Medium,
                    items: vec![
                        item(
                            "Governance body oversight of climate disclosures",
                            Compliant,
                            "Map S2 governance disclosures to existing board reporting.",
                        ),
                        item(
                            "Management processes and controls over climate information",
                            Partial,
                            "Extend financial-reporting controls to sustainability data.",
                        ),
                        item(
                            "Skills and competencies available to oversee climate strategy",
                            Compliant,
                            "Document climate training for the oversight body.",
                        ),
                    ],
                },
                CategorySpec {
                    key: "strategy",
                    name: "Strategy",
                    weight: 0.35,
                    effort: High,
                    items: vec![
                        item(
                            "Climate risks and opportunities affecting prospects",
                            Compliant,
                            "Disclose effects on business model and value chain.",
                        ),
                        item(
                            "Current and anticipated financial effects",
                            Partial,
                            "Quantify anticipated effects on financial position and performance.",
                        ),
                        item(
                            "Climate resilience assessment using scenario analysis",
                            Compliant,
                            "Apply scenario analysis commensurate with exposure.",
                        ),
                        item(
                            "Transition plan disclosure",
                            Partial,
                            "Publish the transition plan with milestones and dependencies.",
                        ),
                    ],
                },
                CategorySpec {
                    key: "risk_management",
                    name: "Risk Management",
                    weight: 0.20,
                    effort: Medium,
                    items: vec![
                        item(
                            "Processes to identify and assess climate risks",
                            Compliant,
                            "Describe inputs, parameters and prioritisation.",
                        ),
                        item(
                            "Integration with the overall risk management process",
                            Partial,
                            "Show how climate feeds the entity-wide risk profile.",
                        ),
                        item(
                            "Use of climate-related opportunity assessment",
                            Compliant,
                            "Track opportunity pipeline alongside risk register.",
                        ),
                    ],
                },
                CategorySpec {
                    key: "metrics_and_targets",
                    name: "Metrics & Targets",
                    weight: 0.25,
                    effort: High,
                    items: vec![
                        probed(
                            "Scope 1 greenhouse gas emissions",
                            DataProbe::Scope1Coverage,
                            "Measure under the GHG Protocol as required by S2.",
                        ),
                        probed(
                            "Scope 2 greenhouse gas emissions",
                            DataProbe::Scope2Coverage,
                            "Report location-based scope-2 emissions.",
                        ),
                        probed(
                            "Scope 3 greenhouse gas emissions",
                            DataProbe::Scope3Coverage,
                            "Report material scope-3 categories with the measurement approach.",
                        ),
                        item(
                            "Industry-based metrics (SASB-derived)",
                            Partial,
                            "Adopt the applicable industry metric set.",
                        ),
                        item(
                            "Targets and progress, including use of carbon credits",
                            Partial,
                            "Disclose target architecture and planned reliance on credits.",
                        ),
                    ],
                },
            ],
            deadlines: vec![
                RegulatoryDeadline {
                    date: "2026-01-01",
                    requirement: "First IFRS S1/S2 annual reporting period for adopting jurisdictions.",
                },
                RegulatoryDeadline {
                    date: "2027-01-01",
                    requirement: "Scope 3 relief expires; full value-chain reporting required.",
                },
            ],
        },
        FrameworkSpec {
            id: FrameworkId::Kssb,
            name: "KSSB Disclosure Standard",
            authority: "Korea Sustainability Standards Board",
            description: "Korean sustainability disclosure standard aligned to ISSB with K-ETS specifics.",
            categories: vec![
                CategorySpec {
                    key: "governance",
                    name: "Governance",
                    weight: 0.20,
                    effort: Medium,
                    items: vec![
                        item(
                            "Board-level ESG committee in place",
                            Compliant,
                            "Charter the ESG committee with climate authority.",
                        ),
                        item(
                            "Sustainability reporting accountability",
                            Compliant,
                            "Assign executive sign-off for the Korean sustainability report.",
                        ),
                        item(
                            "Internal audit of sustainability data",
                            Partial,
                            "Bring emission data under internal audit coverage.",
                        ),
                    ],
                },
                CategorySpec {
                    key: "strategy",
                    name: "Strategy",
                    weight: 0.30,
                    effort: High,
                    items: vec![
                        item(
                            "2050 carbon-neutrality alignment statement",
                            Compliant,
                            "Reference the national 2050 carbon-neutral commitment.",
                        ),
                        item(
                            "NDC-consistent interim milestones",
                            Partial,
                            "Set 2030 milestones consistent with the national NDC.",
                        ),
                        item(
                            "Scenario analysis covering domestic policy futures",
                            Compliant,
                            "Include a delayed-transition case in the scenario suite.",
                        ),
                        item(
                            "Climate investment plan for facility conversion",
                            Partial,
                            "Disclose the capex plan for process conversion.",
                        ),
                    ],
                },
                CategorySpec {
                    key: "risk_management",
                    name: "Risk Management",
                    weight: 0.20,
                    effort: Medium,
                    items: vec![
                        item(
                            "Physical-risk assessment of domestic sites",
                            Compliant,
                            "Cover typhoon and flood exposure for all domestic sites.",
                        ),
                        item(
                            "Transition-risk assessment under K-ETS",
                            Compliant,
                            "Model allowance-price exposure under tightening allocation.",
                        ),
                        item(
                            "Supply-chain climate risk screening",
                            Partial,
                            "Screen tier-1 suppliers for climate exposure.",
                        ),
                    ],
                },
                CategorySpec {
                    key: "metrics_and_targets",
                    name: "Metrics & Targets",
                    weight: 0.30,
                    effort: High,
                    items: vec![
                        probed(
                            "Scope 1 emissions reported to the national GHG system",
                            DataProbe::Scope1Coverage,
                            "Reconcile facility reports with NGMS submissions.",
                        ),
                        probed(
                            "Scope 2 emissions reported to the national GHG system",
                            DataProbe::Scope2Coverage,
                            "Reconcile purchased-power emissions with NGMS submissions.",
                        ),
                        probed(
                            "Scope 3 value-chain emissions inventory",
                            DataProbe::Scope3Coverage,
                            "Stand up the value-chain inventory ahead of mandatory scope-3 reporting.",
                        ),
                        item(
                            "K-ETS allowance position and shortfall disclosure",
                            Partial,
                            "Disclose allowance holdings against projected emissions.",
                        ),
                        item(
                            "Energy-transition capex ratio",
                            Partial,
                            "Track transition capex as a share of total investment.",
                        ),
                    ],
                },
            ],
            deadlines: vec![
                RegulatoryDeadline {
                    date: "2026-01-01",
                    requirement: "Phase 1: mandatory disclosure for KOSPI-listed issuers over KRW 2tn.",
                },
                RegulatoryDeadline {
                    date: "2027-01-01",
                    requirement: "Phase 2: threshold lowered to KRW 1tn market capitalisation.",
                },
                RegulatoryDeadline {
                    date: "2029-01-01",
                    requirement: "Phase 3: all KOSPI-listed issuers in scope.",
                },
            ],
        },
    ]
}
