//! The ordered seller-qualification filter chain.
//!
//! Pure and side-effect free: the chain is evaluated against snapshots of
//! the seen-sets and returns either the first failing reason or an
//! [`ApprovedSeller`] with the optional fields proven present. The caller
//! owns inserting the approved link/name into the seen-sets (see
//! `CrawlState::qualify`, which runs this chain and the claim under one
//! lock) and owns counting rejections in `FilterStats`.

use std::collections::HashSet;

use storescout_core::SellerCandidate;

/// Why a candidate was rejected. Order of variants is the evaluation order
/// of the chain; the first failing predicate wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Name or profile link absent from the page.
    MissingData,
    /// Profile link already claimed this run.
    DuplicateLink,
    /// Normalized name already claimed this run.
    DuplicateName,
    /// Cross-border listing; the storefront is not eligible.
    DisqualifiedOrigin,
    /// Sales count below the configured minimum.
    InsufficientSales,
    /// Green reputation required but absent.
    ReputationTier,
}

impl RejectReason {
    /// All reasons in evaluation order, for stats reporting.
    pub const ALL: [RejectReason; 6] = [
        RejectReason::MissingData,
        RejectReason::DuplicateLink,
        RejectReason::DuplicateName,
        RejectReason::DisqualifiedOrigin,
        RejectReason::InsufficientSales,
        RejectReason::ReputationTier,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::MissingData => "missing_data",
            RejectReason::DuplicateLink => "duplicate_link",
            RejectReason::DuplicateName => "duplicate_name",
            RejectReason::DisqualifiedOrigin => "disqualified_origin",
            RejectReason::InsufficientSales => "insufficient_sales",
            RejectReason::ReputationTier => "reputation_tier",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            RejectReason::MissingData => 0,
            RejectReason::DuplicateLink => 1,
            RejectReason::DuplicateName => 2,
            RejectReason::DisqualifiedOrigin => 3,
            RejectReason::InsufficientSales => 4,
            RejectReason::ReputationTier => 5,
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The business thresholds the chain evaluates against.
#[derive(Debug, Clone, Copy)]
pub struct QualifyRules {
    pub min_sales: u64,
    pub require_green_reputation: bool,
}

/// A candidate that passed the whole chain. Name and link are no longer
/// optional, and the normalized name is the exact key the caller must claim
/// in the seen-names set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedSeller {
    pub name: String,
    pub normalized_name: String,
    pub link: String,
    pub sales_count: u64,
    pub mercado_lider: bool,
    pub green_reputation: bool,
    pub location: Option<String>,
}

/// Case- and whitespace-normalization applied to names before dedup.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Runs the ordered chain against a candidate.
///
/// # Errors
///
/// Returns the first failing [`RejectReason`], in chain order:
/// missing-data, duplicate-link, duplicate-name, disqualified-origin,
/// insufficient-sales, reputation-tier.
pub fn evaluate(
    candidate: &SellerCandidate,
    rules: QualifyRules,
    seen_links: &HashSet<String>,
    seen_names: &HashSet<String>,
) -> Result<ApprovedSeller, RejectReason> {
    let (Some(name), Some(link)) = (candidate.name.as_deref(), candidate.profile_link.as_deref())
    else {
        return Err(RejectReason::MissingData);
    };

    if seen_links.contains(link) {
        return Err(RejectReason::DuplicateLink);
    }

    let normalized_name = normalize_name(name);
    if seen_names.contains(&normalized_name) {
        return Err(RejectReason::DuplicateName);
    }

    if candidate.cross_border.is_some() {
        return Err(RejectReason::DisqualifiedOrigin);
    }

    if candidate.sales_count < rules.min_sales {
        return Err(RejectReason::InsufficientSales);
    }

    if rules.require_green_reputation && !candidate.green_reputation {
        return Err(RejectReason::ReputationTier);
    }

    Ok(ApprovedSeller {
        name: name.to_string(),
        normalized_name,
        link: link.to_string(),
        sales_count: candidate.sales_count,
        mercado_lider: candidate.mercado_lider,
        green_reputation: candidate.green_reputation,
        location: candidate.location.clone(),
    })
}
