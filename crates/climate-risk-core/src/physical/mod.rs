//! Physical-risk engine: per-facility, per-hazard expected annual loss for
//! flood, typhoon, heatwave, drought and sea-level rise, with optional live
//! weather statistics and deterministic fan-out.

mod engine;
mod hazards;

pub use engine::{assess, FacilityPhysicalResult, HazardAssessment};
pub use hazards::HazardType;
