use chrono::{DateTime, Utc};
use serde::Serialize;

/// Platform tag stamped on every persisted storefront.
pub const PLATFORM_TAG: &str = "mercadolivre";

/// Location tokens that indicate a Brazil-based storefront.
const BRAZIL_TOKENS: [&str; 4] = ["Brasil", "SP", "RJ", "MG"];

/// The persisted projection of an approved seller.
///
/// `seller_link` is the unique business key across the store. `sequence` is
/// advisory: it is reserved before the upsert resolves, so a conflicting
/// upsert leaves a gap in the numbering.
#[derive(Debug, Clone, Serialize)]
pub struct StorefrontRecord {
    pub sequence: u64,
    pub origin_term: String,
    pub category: String,
    pub seller_name: String,
    pub seller_link: String,
    pub sales_estimate: u64,
    pub mercado_lider: bool,
    pub green_reputation: bool,
    pub location: Option<String>,
    pub regional_confidence: i16,
    pub platform: String,
    pub extracted_at: DateTime<Utc>,
}

/// Confidence score that a seller ships from Brazil: 9 when the scraped
/// location mentions a Brazil-indicating token, 7 otherwise (locations are
/// frequently missing from the seller card, so absence is not disqualifying).
#[must_use]
pub fn regional_confidence(location: Option<&str>) -> i16 {
    match location {
        Some(loc) if BRAZIL_TOKENS.iter().any(|token| loc.contains(token)) => 9,
        _ => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brazil_location_scores_high() {
        assert_eq!(regional_confidence(Some("São Paulo, SP")), 9);
        assert_eq!(regional_confidence(Some("Brasil")), 9);
        assert_eq!(regional_confidence(Some("Belo Horizonte MG")), 9);
    }

    #[test]
    fn missing_or_foreign_location_scores_default() {
        assert_eq!(regional_confidence(None), 7);
        assert_eq!(regional_confidence(Some("Shenzhen")), 7);
        assert_eq!(regional_confidence(Some("")), 7);
    }
}
