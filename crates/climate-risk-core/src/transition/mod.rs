//! Transition-risk engine: per-facility, per-year composition of carbon
//! cost, energy uplift, demand impact, transition capex/opex, scope-3 cost
//! and stranded-asset write-downs, discounted to a net-present-value delta.

mod engine;

pub use engine::{
    analyse, AnnualImpact, EmissionPathPoint, FacilityTransitionResult, DEFAULT_YEAR_END,
    DEFAULT_YEAR_START,
};
