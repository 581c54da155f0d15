//! Counters for sellers turned away by the qualification chain.

use std::sync::{Mutex, PoisonError};

use crate::qualify::RejectReason;

/// Per-reason rejection tallies, shared across workers.
#[derive(Debug, Default)]
pub struct FilterStats {
    counts: Mutex<[u64; RejectReason::ALL.len()]>,
}

impl FilterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, reason: RejectReason) {
        let mut counts = self
            .counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        counts[reason.index()] += 1;
    }

    /// Tallies in chain order, including zero entries.
    pub fn snapshot(&self) -> Vec<(RejectReason, u64)> {
        let counts = self
            .counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        RejectReason::ALL
            .iter()
            .map(|reason| (*reason, counts[reason.index()]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates_per_reason() {
        let stats = FilterStats::new();
        stats.record(RejectReason::MissingData);
        stats.record(RejectReason::InsufficientSales);
        stats.record(RejectReason::InsufficientSales);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.len(), RejectReason::ALL.len());
        assert_eq!(snapshot[0], (RejectReason::MissingData, 1));
        let low_sales = snapshot
            .iter()
            .find(|(reason, _)| *reason == RejectReason::InsufficientSales)
            .copied();
        assert_eq!(low_sales, Some((RejectReason::InsufficientSales, 2)));
        let total: u64 = snapshot.iter().map(|(_, count)| count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn snapshot_keeps_chain_order() {
        let stats = FilterStats::new();
        let order: Vec<RejectReason> =
            stats.snapshot().into_iter().map(|(reason, _)| reason).collect();
        assert_eq!(order, RejectReason::ALL.to_vec());
    }
}
