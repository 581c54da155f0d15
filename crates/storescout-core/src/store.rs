//! The consumed persistence contract.

use std::future::Future;

use thiserror::Error;

use crate::record::StorefrontRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storefront store {op} failed: {reason}")]
    Backend { op: &'static str, reason: String },
}

/// Per-category row count, for the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Idempotent storefront persistence keyed by `seller_link`.
///
/// A unique-key conflict is not an error: `upsert` reports it as
/// `Ok(false)` and the stored row wins. Implementations must be safe to
/// call concurrently; for same-key races the uniqueness constraint of the
/// backing store, not application logic, is the source of truth.
pub trait StorefrontStore: Send + Sync {
    /// Insert or update by `seller_link`. Returns `true` when the record
    /// was newly created, `false` on a unique-key conflict.
    fn upsert(
        &self,
        record: &StorefrontRecord,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Count stored rows, optionally restricted to one category label.
    fn count(
        &self,
        category: Option<&str>,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;

    fn count_mercado_lider(&self) -> impl Future<Output = Result<i64, StoreError>> + Send;

    fn aggregate_by_category(
        &self,
    ) -> impl Future<Output = Result<Vec<CategoryCount>, StoreError>> + Send;
}
