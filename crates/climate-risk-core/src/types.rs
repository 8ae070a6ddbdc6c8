use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClimateRiskError;
use crate::ClimateRiskResult;

/// All monetary values. One currency unit per request; rounding happens only
/// at the report serialisation boundary.
pub type Money = f64;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = f64;

/// Greenhouse-gas quantities in tonnes of CO2-equivalent per year.
pub type TonnesCo2 = f64;

/// One of the four reference policy futures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    NetZero2050,
    Below2c,
    DelayedTransition,
    CurrentPolicies,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 4] = [
        ScenarioId::NetZero2050,
        ScenarioId::Below2c,
        ScenarioId::DelayedTransition,
        ScenarioId::CurrentPolicies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioId::NetZero2050 => "net_zero_2050",
            ScenarioId::Below2c => "below_2c",
            ScenarioId::DelayedTransition => "delayed_transition",
            ScenarioId::CurrentPolicies => "current_policies",
        }
    }
}

impl FromStr for ScenarioId {
    type Err = ClimateRiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "net_zero_2050" => Ok(ScenarioId::NetZero2050),
            "below_2c" => Ok(ScenarioId::Below2c),
            "delayed_transition" => Ok(ScenarioId::DelayedTransition),
            "current_policies" => Ok(ScenarioId::CurrentPolicies),
            other => Err(ClimateRiskError::InvalidScenario(other.to_string())),
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Carbon pricing regime applied to a transition analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingRegime {
    /// Global reference path, USD per tCO2e.
    Global,
    /// Korean emissions trading scheme, KRW per tCO2e with free allocation.
    Kets,
}

impl PricingRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingRegime::Global => "global",
            PricingRegime::Kets => "kets",
        }
    }
}

impl FromStr for PricingRegime {
    type Err = ClimateRiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(PricingRegime::Global),
            "kets" => Ok(PricingRegime::Kets),
            other => Err(ClimateRiskError::InvalidRegime(other.to_string())),
        }
    }
}

/// Disclosure framework against which ESG readiness is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameworkId {
    Tcfd,
    Issb,
    Kssb,
}

impl FrameworkId {
    pub const ALL: [FrameworkId; 3] = [FrameworkId::Tcfd, FrameworkId::Issb, FrameworkId::Kssb];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameworkId::Tcfd => "tcfd",
            FrameworkId::Issb => "issb",
            FrameworkId::Kssb => "kssb",
        }
    }
}

impl FromStr for FrameworkId {
    type Err = ClimateRiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcfd" => Ok(FrameworkId::Tcfd),
            "issb" => Ok(FrameworkId::Issb),
            "kssb" => Ok(FrameworkId::Kssb),
            other => Err(ClimateRiskError::InvalidFramework(other.to_string())),
        }
    }
}

/// Risk bucket. Ordered so that `max` across hazards picks the stricter one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bucket a loss-to-asset fraction. Equality at a threshold lands in the
    /// stricter (higher) bucket.
    pub fn from_asset_fraction(fraction: f64, high: f64, medium: f64) -> RiskLevel {
        let f = fraction.abs();
        if f >= high {
            RiskLevel::High
        } else if f >= medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// An industrial facility: identity, placement, emissions, financial state.
///
/// Arrives as loosely typed JSON; `validate` narrows it to a closed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub company: String,
    /// One of the ten recognised sector tags, or an unknown string that is
    /// analysed with default parameters plus a warning.
    pub sector: String,
    pub location: String,
    /// Degrees north, [-90, 90].
    pub latitude: f64,
    /// Degrees east, [-180, 180].
    pub longitude: f64,
    /// Scope 1 direct emissions (tCO2e/yr).
    pub scope1_emissions: TonnesCo2,
    /// Scope 2 purchased-energy emissions (tCO2e/yr).
    pub scope2_emissions: TonnesCo2,
    /// Scope 3 value-chain emissions (tCO2e/yr). Zero when not reported.
    #[serde(default)]
    pub scope3_emissions: TonnesCo2,
    pub annual_revenue: Money,
    pub ebitda: Money,
    pub asset_value: Money,
    /// Within ~5 km of the coast. When absent, a sector + latitude heuristic
    /// decides sea-level-rise exposure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coastal: Option<bool>,
}

impl Facility {
    /// Validate ranges and sign constraints. Returns the list of non-fatal
    /// warnings (currently only the unknown-sector case, which is decided by
    /// the caller against the registry).
    pub fn validate(&self) -> ClimateRiskResult<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ClimateRiskError::InvalidInput {
                field: format!("facility[{}].latitude", self.id),
                reason: "Latitude must be within [-90, 90].".into(),
            });
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ClimateRiskError::InvalidInput {
                field: format!("facility[{}].longitude", self.id),
                reason: "Longitude must be within [-180, 180].".into(),
            });
        }
        for (label, value) in [
            ("scope1_emissions", self.scope1_emissions),
            ("scope2_emissions", self.scope2_emissions),
            ("scope3_emissions", self.scope3_emissions),
            ("annual_revenue", self.annual_revenue),
            ("asset_value", self.asset_value),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(ClimateRiskError::InvalidInput {
                    field: format!("facility[{}].{label}", self.id),
                    reason: "Value must be finite and non-negative.".into(),
                });
            }
        }
        if !self.ebitda.is_finite() {
            return Err(ClimateRiskError::InvalidInput {
                field: format!("facility[{}].ebitda", self.id),
                reason: "Value must be finite.".into(),
            });
        }
        Ok(())
    }
}

/// Standard analysis output envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisEnvelope<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: AnalysisMetadata,
}

/// Metadata attached to every analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap analysis results with metadata.
pub fn with_envelope<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> AnalysisEnvelope<T> {
    AnalysisEnvelope {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: AnalysisMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "f64".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_facility() -> Facility {
        Facility {
            id: "f-001".into(),
            name: "Test Works".into(),
            company: "TestCo".into(),
            sector: "steel".into(),
            location: "Pohang".into(),
            latitude: 36.0,
            longitude: 129.4,
            scope1_emissions: 1_000_000.0,
            scope2_emissions: 200_000.0,
            scope3_emissions: 0.0,
            annual_revenue: 2.0e9,
            ebitda: 3.0e8,
            asset_value: 2.5e9,
            coastal: Some(true),
        }
    }

    #[test]
    fn test_scenario_tag_round_trip() {
        for id in ScenarioId::ALL {
            assert_eq!(id.as_str().parse::<ScenarioId>().unwrap(), id);
        }
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        let err = "net_zero_2049".parse::<ScenarioId>().unwrap_err();
        match err {
            ClimateRiskError::InvalidScenario(tag) => assert_eq!(tag, "net_zero_2049"),
            other => panic!("Expected InvalidScenario, got: {other:?}"),
        }
    }

    #[test]
    fn test_risk_level_threshold_equality_is_stricter_bucket() {
        // Exactly 10% of assets must land in High, exactly 3% in Medium.
        assert_eq!(RiskLevel::from_asset_fraction(0.10, 0.10, 0.03), RiskLevel::High);
        assert_eq!(RiskLevel::from_asset_fraction(0.03, 0.10, 0.03), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_asset_fraction(0.0299, 0.10, 0.03), RiskLevel::Low);
        // Sign is irrelevant: NPV deltas are negative.
        assert_eq!(RiskLevel::from_asset_fraction(-0.2, 0.10, 0.03), RiskLevel::High);
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
    }

    #[test]
    fn test_facility_validates() {
        assert!(sample_facility().validate().is_ok());
    }

    #[test]
    fn test_facility_rejects_bad_latitude() {
        let mut f = sample_facility();
        f.latitude = 95.0;
        let err = f.validate().unwrap_err();
        match err {
            ClimateRiskError::InvalidInput { field, .. } => {
                assert!(field.contains("latitude"));
            }
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }

    #[test]
    fn test_facility_rejects_negative_emissions() {
        let mut f = sample_facility();
        f.scope2_emissions = -1.0;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_facility_decodes_with_defaults() {
        // scope3 and coastal are optional in uploaded payloads.
        let f: Facility = serde_json::from_value(serde_json::json!({
            "id": "u-1",
            "name": "Uploaded Plant",
            "company": "Partner Co",
            "sector": "cement",
            "location": "Danyang",
            "latitude": 36.9,
            "longitude": 128.3,
            "scope1_emissions": 5.0e5,
            "scope2_emissions": 8.0e4,
            "annual_revenue": 9.0e8,
            "ebitda": 1.1e8,
            "asset_value": 1.4e9
        }))
        .unwrap();
        assert_eq!(f.scope3_emissions, 0.0);
        assert_eq!(f.coastal, None);
    }

    #[test]
    fn test_envelope_metadata() {
        let env = with_envelope("Test methodology", &serde_json::json!({}), vec![], 42, 1.0);
        assert_eq!(env.metadata.precision, "f64");
        assert_eq!(env.metadata.computation_time_us, 42);
    }
}
