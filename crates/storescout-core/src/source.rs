//! The consumed extraction boundary.
//!
//! The crawler never parses HTML itself; it drives a [`PageSource`] and
//! reacts to the typed results. The production implementation lives in
//! `storescout-scraper`; tests provide scripted sources.

use std::future::Future;

use thiserror::Error;

use crate::candidate::{SearchPage, SellerCandidate};

/// Per-request failure at the extraction boundary.
///
/// Always contained at the dispatcher: the request is logged and dropped,
/// crawl state is untouched, and nothing is retried.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },
}

/// Fetches and extracts marketplace pages.
///
/// Implementations must return zero-valued [`SellerCandidate`] fields when a
/// datum is absent from the page; "not found" is never an error here.
pub trait PageSource: Send + Sync {
    /// Fetch a search-result page and extract its product references.
    ///
    /// The returned [`SearchPage::final_url`] reflects redirects, which the
    /// initial-search handler uses to derive the pagination context.
    fn search_page(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<SearchPage, SourceError>> + Send;

    /// Fetch a product-detail page and extract its seller candidate.
    fn seller_page(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<SellerCandidate, SourceError>> + Send;
}
