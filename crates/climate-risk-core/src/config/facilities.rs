use crate::types::Facility;

#[allow(clippy::too_many_arguments)]
fn facility(
    id: &str,
    name: &str,
    company: &str,
    sector: &str,
    location: &str,
    latitude: f64,
    longitude: f64,
    scope1: f64,
    scope2: f64,
    scope3: f64,
    revenue: f64,
    ebitda: f64,
    assets: f64,
    coastal: bool,
) -> Facility {
    Facility {
        id: id.to_string(),
        name: name.to_string(),
        company: company.to_string(),
        sector: sector.to_string(),
        location: location.to_string(),
        latitude,
        longitude,
        scope1_emissions: scope1,
        scope2_emissions: scope2,
        scope3_emissions: scope3,
        annual_revenue: revenue,
        ebitda,
        asset_value: assets,
        coastal: Some(coastal),
    }
}

/// The built-in sample portfolio: seventeen Korean industrial facilities.
/// Monetary values in USD; emissions in tCO2e per year.
pub fn seed_facilities() -> Vec<Facility> {
    vec![
        facility(
            "fac-001", "Pohang Integrated Steelworks", "Daehan Steel", "steel",
            "Pohang, North Gyeongsang", 36.02, 129.37,
            8.2e6, 1.1e6, 2.4e6, 1.4e10, 1.9e9, 1.8e10, true,
        ),
        facility(
            "fac-002", "Gwangyang Steel Mill", "Daehan Steel", "steel",
            "Gwangyang, South Jeolla", 34.94, 127.70,
            7.6e6, 9.5e5, 2.1e6, 1.2e10, 1.6e9, 1.5e10, true,
        ),
        facility(
            "fac-003", "Ulsan Petrochemical Complex", "Hanbit Chemical", "petrochemical",
            "Ulsan", 35.50, 129.36,
            3.4e6, 6.2e5, 1.8e6, 8.5e9, 1.1e9, 9.6e9, true,
        ),
        facility(
            "fac-004", "Yeosu Cracker No. 2", "Hanbit Chemical", "petrochemical",
            "Yeosu, South Jeolla", 34.76, 127.66,
            2.9e6, 5.4e5, 1.5e6, 7.2e9, 9.0e8, 8.1e9, true,
        ),
        facility(
            "fac-005", "Danyang Cement Works", "Taebaek Cement", "cement",
            "Danyang, North Chungcheong", 36.98, 128.37,
            4.1e6, 3.0e5, 6.0e5, 2.1e9, 3.4e8, 2.8e9, false,
        ),
        facility(
            "fac-006", "Onsan Refinery", "Kukje Energy", "refining",
            "Ulsan (Onsan)", 35.43, 129.34,
            3.8e6, 4.8e5, 5.2e6, 1.8e10, 1.4e9, 1.1e10, true,
        ),
        facility(
            "fac-007", "Daesan Refinery & Aromatics", "Kukje Energy", "refining",
            "Seosan, South Chungcheong", 37.00, 126.38,
            3.1e6, 4.1e5, 4.4e6, 1.5e10, 1.2e9, 9.3e9, true,
        ),
        facility(
            "fac-008", "Dangjin Coal Power Station", "Hanguk Power", "power_generation",
            "Dangjin, South Chungcheong", 37.05, 126.51,
            1.6e7, 9.0e4, 8.0e5, 3.4e9, 7.5e8, 6.8e9, true,
        ),
        facility(
            "fac-009", "Boryeong Combined Cycle Plant", "Hanguk Power", "power_generation",
            "Boryeong, South Chungcheong", 36.40, 126.49,
            5.8e6, 6.0e4, 4.5e5, 1.9e9, 4.2e8, 3.9e9, true,
        ),
        facility(
            "fac-010", "Icheon Memory Fab Campus", "Sena Semiconductor", "semiconductor",
            "Icheon, Gyeonggi", 37.27, 127.44,
            7.8e5, 2.9e6, 1.2e6, 2.6e10, 6.8e9, 3.1e10, false,
        ),
        facility(
            "fac-011", "Pyeongtaek Foundry Line", "Sena Semiconductor", "semiconductor",
            "Pyeongtaek, Gyeonggi", 36.99, 127.09,
            6.4e5, 2.4e6, 9.5e5, 2.2e10, 5.6e9, 2.7e10, false,
        ),
        facility(
            "fac-012", "Gumi Display & Module Plant", "Mirae Electronics", "electronics",
            "Gumi, North Gyeongsang", 36.11, 128.34,
            2.1e5, 8.8e5, 7.0e5, 9.8e9, 1.3e9, 7.4e9, false,
        ),
        facility(
            "fac-013", "Hwaseong Vehicle Assembly", "Arirang Motors", "automotive",
            "Hwaseong, Gyeonggi", 37.20, 126.83,
            3.6e5, 7.2e5, 6.8e6, 2.4e10, 2.2e9, 1.6e10, false,
        ),
        facility(
            "fac-014", "Gwangju Vehicle Plant No. 1", "Arirang Motors", "automotive",
            "Gwangju", 35.16, 126.79,
            2.8e5, 5.9e5, 5.1e6, 1.8e10, 1.7e9, 1.2e10, false,
        ),
        facility(
            "fac-015", "Geoje Shipyard", "Haeyang Heavy Industries", "shipbuilding",
            "Geoje, South Gyeongsang", 34.89, 128.69,
            4.2e5, 3.8e5, 1.1e6, 6.4e9, 4.1e8, 7.9e9, true,
        ),
        facility(
            "fac-016", "Ulsan Shipyard East Dock", "Haeyang Heavy Industries", "shipbuilding",
            "Ulsan (Mipo)", 35.52, 129.43,
            5.0e5, 4.4e5, 1.3e6, 7.8e9, 5.3e8, 9.2e9, true,
        ),
        facility(
            "fac-017", "Busan New Port Logistics Hub", "Hanbada Logistics", "logistics",
            "Busan (Gadeok)", 35.08, 128.83,
            1.9e5, 2.6e5, 2.2e6, 3.1e9, 3.6e8, 2.4e9, true,
        ),
    ]
}
