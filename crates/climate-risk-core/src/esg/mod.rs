//! ESG disclosure-readiness engine: weighted maturity scoring against the
//! three supported frameworks, gap analysis, and disclosure-narrative
//! assembly for the reporting surface.

mod disclosure;
mod scoring;

pub use disclosure::{disclosure_data, DisclosureData, DisclosureSection, PortfolioMetrics};
pub use scoring::{
    assess, CategoryResult, ChecklistItemResult, FrameworkAssessment, GapItem,
};
