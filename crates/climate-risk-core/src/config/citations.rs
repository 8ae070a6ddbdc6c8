use serde::Serialize;

/// Literature source behind a calibration choice. Surfaced alongside
/// analysis assumptions so results stay auditable.
#[derive(Debug, Clone, Serialize)]
pub struct Citation {
    pub id: &'static str,
    pub source: &'static str,
    pub claim: &'static str,
}

pub fn builtin_citations() -> Vec<Citation> {
    vec![
        Citation {
            id: "ngfs-phase4",
            source: "NGFS Climate Scenarios, Phase IV (2023)",
            claim: "Scenario family and carbon-price trajectory shapes for the four reference futures.",
        },
        Citation {
            id: "ipcc-ar6-wg1",
            source: "IPCC AR6 WG1, Summary for Policymakers (2021)",
            claim: "Warming trajectories and regional heatwave/drought scaling per degree of warming.",
        },
        Citation {
            id: "ipcc-ar6-slr",
            source: "IPCC AR6 WG1 Chapter 9 (2021)",
            claim: "Sea-level-rise projections by scenario used for coastal exposure.",
        },
        Citation {
            id: "usace-depth-damage",
            source: "USACE Economic Guidance Memorandum 04-01 (2003)",
            claim: "Depth-damage relationship for industrial structures, capped at a 0.6 damage ratio.",
        },
        Citation {
            id: "hazus-wind",
            source: "FEMA Hazus Hurricane Model Technical Manual (2022)",
            claim: "Wind-speed to damage-ratio curve applied to typhoon strikes.",
        },
        Citation {
            id: "kets-phase3",
            source: "Korean Ministry of Environment, K-ETS Phase 3 Allocation Plan (2021)",
            claim: "Baseline free-allocation fractions and annual tightening for EITE sectors.",
        },
        Citation {
            id: "gumbel-precip",
            source: "Koutsoyiannis, Statistics of extremes and estimation of extreme rainfall (2004)",
            claim: "Gumbel Type I fit to annual-maximum daily precipitation for flood frequency.",
        },
        Citation {
            id: "heat-productivity",
            source: "ILO, Working on a Warmer Planet (2019)",
            claim: "Linear productivity-loss scaling with heatwave-day counts.",
        },
    ]
}
