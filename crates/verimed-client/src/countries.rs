use serde::Serialize;

/// Registry integration level for a country
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    /// Verified automatically against the registry API
    Full,
    /// Routed to a human reviewer
    ManualReview,
}

/// A country the verification API accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedCountry {
    /// ISO 3166-1 alpha-2 code
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
    /// Authoritative registry consulted
    pub registry: &'static str,
    /// Integration level
    pub api_status: ApiStatus,
}

const fn country(
    code: &'static str,
    name: &'static str,
    registry: &'static str,
    api_status: ApiStatus,
) -> SupportedCountry {
    SupportedCountry {
        code,
        name,
        registry,
        api_status,
    }
}

static SUPPORTED_COUNTRIES: [SupportedCountry; 11] = [
    country("US", "USA", "NPI (NPPES)", ApiStatus::Full),
    country("FR", "France", "ANS (RPPS)", ApiStatus::Full),
    country("AE", "UAE", "DHA", ApiStatus::Full),
    country("NL", "Netherlands", "BIG-register", ApiStatus::Full),
    country("IL", "Israel", "MOH", ApiStatus::Full),
    country("GB", "UK", "GMC", ApiStatus::ManualReview),
    country("CA", "Canada", "Provincial Colleges", ApiStatus::ManualReview),
    country("AU", "Australia", "AHPRA", ApiStatus::ManualReview),
    country("DE", "Germany", "Bundesärztekammer", ApiStatus::ManualReview),
    country("ZA", "South Africa", "HPCSA", ApiStatus::ManualReview),
    country("BR", "Brazil", "CFM", ApiStatus::ManualReview),
];

/// Countries supported by the verification API
///
/// Fixed table; never touches the network.
pub fn supported_countries() -> &'static [SupportedCountry] {
    &SUPPORTED_COUNTRIES
}
