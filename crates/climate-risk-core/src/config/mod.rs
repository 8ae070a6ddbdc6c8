//! Configuration as data: scenario definitions, sector parameter sets, the
//! K-ETS regime table, disclosure frameworks, the seed portfolio, and the
//! literature citations behind the calibration choices. Built once at
//! startup into an immutable registry; the engines are parameterised by
//! reference and hold no state of their own.

mod citations;
mod facilities;
mod frameworks;
mod scenarios;
mod sectors;

pub use citations::Citation;
pub use frameworks::{
    CategorySpec, ChecklistItemSpec, DataProbe, Effort, FrameworkSpec, ItemStatus,
    RegulatoryDeadline,
};
pub use scenarios::{KetsMarket, ScenarioSpec, BASE_WACC};
pub use sectors::{HazardSensitivity, LatitudeBand, SectorParams};

use crate::error::ClimateRiskError;
use crate::types::{Facility, FrameworkId, ScenarioId};
use crate::ClimateRiskResult;

pub struct ConfigRegistry {
    scenarios: Vec<ScenarioSpec>,
    sectors: Vec<SectorParams>,
    default_sector: SectorParams,
    kets: KetsMarket,
    frameworks: Vec<FrameworkSpec>,
    seed_facilities: Vec<Facility>,
    citations: Vec<Citation>,
}

impl ConfigRegistry {
    /// Build the built-in registry. Cheap enough to construct eagerly at
    /// startup; immutable afterwards, so readers need no synchronisation.
    pub fn builtin() -> Self {
        ConfigRegistry {
            scenarios: scenarios::builtin_scenarios(),
            sectors: sectors::builtin_sectors(),
            default_sector: sectors::default_sector(),
            kets: scenarios::kets_market(),
            frameworks: frameworks::builtin_frameworks(),
            seed_facilities: facilities::seed_facilities(),
            citations: citations::builtin_citations(),
        }
    }

    pub fn scenario(&self, id: ScenarioId) -> &ScenarioSpec {
        // The four scenarios are always present; the id enum is closed.
        self.scenarios
            .iter()
            .find(|s| s.id == id)
            .expect("registry always holds all four scenarios")
    }

    pub fn scenarios(&self) -> &[ScenarioSpec] {
        &self.scenarios
    }

    /// Sector parameters by tag. Unknown tags fall back to the default set;
    /// callers that care (the engines) check [`ConfigRegistry::knows_sector`]
    /// first and emit a warning.
    pub fn sector(&self, tag: &str) -> &SectorParams {
        self.sectors
            .iter()
            .find(|s| s.tag == tag)
            .unwrap_or(&self.default_sector)
    }

    pub fn knows_sector(&self, tag: &str) -> bool {
        self.sectors.iter().any(|s| s.tag == tag)
    }

    pub fn sector_tags(&self) -> Vec<&'static str> {
        self.sectors.iter().map(|s| s.tag).collect()
    }

    pub fn kets(&self) -> &KetsMarket {
        &self.kets
    }

    pub fn framework(&self, id: FrameworkId) -> &FrameworkSpec {
        self.frameworks
            .iter()
            .find(|f| f.id == id)
            .expect("registry always holds all three frameworks")
    }

    pub fn frameworks(&self) -> &[FrameworkSpec] {
        &self.frameworks
    }

    pub fn seed_facilities(&self) -> &[Facility] {
        &self.seed_facilities
    }

    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    /// Validate a caller-supplied facility set and collect unknown-sector
    /// warnings. Unknown sectors are accepted and analysed with the default
    /// parameter set.
    pub fn validate_facilities(&self, facilities: &[Facility]) -> ClimateRiskResult<Vec<String>> {
        if facilities.is_empty() {
            return Err(ClimateRiskError::InvalidInput {
                field: "facilities".into(),
                reason: "At least one facility is required.".into(),
            });
        }
        let mut warnings = Vec::new();
        for f in facilities {
            f.validate()?;
            if !self.knows_sector(&f.sector) {
                tracing::warn!(facility = %f.id, sector = %f.sector, "unknown sector, using default parameters");
                warnings.push(format!(
                    "Unknown sector '{}' for facility '{}'; default sector parameters applied.",
                    f.sector, f.id
                ));
            }
        }
        Ok(warnings)
    }
}
