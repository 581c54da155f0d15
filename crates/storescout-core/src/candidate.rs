//! Domain types produced by the extraction boundary.
//!
//! Every field an extractor may fail to find is represented as a zero value
//! (`None`, `0`, `false`) rather than an error. "Not found" is data here —
//! it becomes a `missing-data` rejection in the qualification pipeline, not
//! a failed request.

use serde::Serialize;

/// A product reference discovered on a search-result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    /// Canonical product URL.
    pub url: String,
    /// Marketplace product id (digits only, `MLB` prefix stripped).
    pub id: String,
}

/// One rendered search-result page.
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// URL after redirects. The marketplace rewrites seed URLs into
    /// category-qualified listing URLs; pagination is derived from this.
    pub final_url: String,
    pub products: Vec<ProductRef>,
}

/// Why a seller is treated as a disqualified cross-border storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossBorderReason {
    /// The product page carries an international-purchase banner.
    InternationalPurchase,
}

impl std::fmt::Display for CrossBorderReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrossBorderReason::InternationalPurchase => write!(f, "international_purchase"),
        }
    }
}

/// Seller data scraped from one product-detail page. Built once per
/// `ProductDetail` request and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct SellerCandidate {
    pub name: Option<String>,
    pub profile_link: Option<String>,
    pub sales_count: u64,
    /// Raw reputation label when the seller card shows one (e.g. "MercadoLíder Platinum").
    pub reputation_tier: Option<String>,
    pub green_reputation: bool,
    pub mercado_lider: bool,
    pub location: Option<String>,
    /// `Some` when the listing is a disqualified cross-border offer.
    pub cross_border: Option<CrossBorderReason>,
}
