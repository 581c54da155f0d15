//! Shared crawl-run state.
//!
//! One mutex owns the three dedup sets and every counter, so membership
//! check and insert are a single serialized read-modify-write. Lifecycle is
//! one crawl run: created empty, mutated only through these methods, and
//! reduced to a [`StateSnapshot`] for the final report.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use storescout_core::SellerCandidate;

use crate::qualify::{self, ApprovedSeller, QualifyRules, RejectReason};

#[derive(Debug, Default)]
struct StateInner {
    seen_products: HashSet<String>,
    seen_links: HashSet<String>,
    seen_names: HashSet<String>,
    saved: usize,
    sequence: u64,
    consecutive_empty_pages: u32,
    last_page_with_result: u32,
}

#[derive(Debug, Default)]
pub struct CrawlState {
    inner: Mutex<StateInner>,
}

/// Point-in-time view of the state for reporting.
#[derive(Debug, Clone, Copy)]
pub struct StateSnapshot {
    pub saved: usize,
    pub products_seen: usize,
    pub links_seen: usize,
    pub last_page_with_result: u32,
    pub consecutive_empty_pages: u32,
}

impl CrawlState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StateInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a product id as seen. Returns `true` when the id was new —
    /// the caller may then enqueue its detail request. Check and insert are
    /// one lock acquisition, so two workers can never both claim an id.
    pub fn mark_product_seen(&self, id: &str) -> bool {
        self.lock().seen_products.insert(id.to_string())
    }

    /// Runs the qualification chain and, on approval, claims the seller's
    /// link and normalized name in the seen-sets — atomically, under the
    /// same lock the chain read them through.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`RejectReason`] in chain order.
    pub fn qualify(
        &self,
        candidate: &SellerCandidate,
        rules: QualifyRules,
    ) -> Result<ApprovedSeller, RejectReason> {
        let mut inner = self.lock();
        let approved = qualify::evaluate(candidate, rules, &inner.seen_links, &inner.seen_names)?;
        inner.seen_links.insert(approved.link.clone());
        inner.seen_names.insert(approved.normalized_name.clone());
        Ok(approved)
    }

    /// Reserves the next record sequence number (1-based).
    ///
    /// Reserved before the upsert resolves; a conflicting or failed upsert
    /// leaves a gap, which is accepted — sequence numbers are advisory,
    /// `saved` is the exact count.
    pub fn reserve_sequence(&self) -> u64 {
        let mut inner = self.lock();
        inner.sequence += 1;
        inner.sequence
    }

    /// Records a confirmed novel persistence: increments `saved`, remembers
    /// the page it came from, and resets the empty-page streak.
    pub fn record_saved(&self, page: u32) -> usize {
        let mut inner = self.lock();
        inner.saved += 1;
        inner.last_page_with_result = page;
        inner.consecutive_empty_pages = 0;
        inner.saved
    }

    /// Records a zero-result paged search; returns the new streak length.
    pub fn record_empty_page(&self) -> u32 {
        let mut inner = self.lock();
        inner.consecutive_empty_pages += 1;
        inner.consecutive_empty_pages
    }

    /// Resets the empty-page streak after a paged search yielded products.
    pub fn reset_empty_pages(&self) {
        self.lock().consecutive_empty_pages = 0;
    }

    pub fn saved_count(&self) -> usize {
        self.lock().saved
    }

    pub fn consecutive_empty_pages(&self) -> u32 {
        self.lock().consecutive_empty_pages
    }

    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        let inner = self.lock();
        StateSnapshot {
            saved: inner.saved,
            products_seen: inner.seen_products.len(),
            links_seen: inner.seen_links.len(),
            last_page_with_result: inner.last_page_with_result,
            consecutive_empty_pages: inner.consecutive_empty_pages,
        }
    }
}
