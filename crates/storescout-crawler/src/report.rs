//! End-of-crawl summary.

use crate::qualify::RejectReason;

/// Totals gathered once the frontier drains or a stop condition fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub saved: usize,
    pub products_seen: usize,
    pub links_seen: usize,
    pub last_page_with_result: u32,
    pub rejections: Vec<(RejectReason, u64)>,
}

impl CrawlReport {
    pub fn rejected_total(&self) -> u64 {
        self.rejections.iter().map(|(_, count)| *count).sum()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            saved = self.saved,
            products_seen = self.products_seen,
            sellers_rejected = self.rejected_total(),
            last_page_with_result = self.last_page_with_result,
            "crawl finished"
        );
        for (reason, count) in &self.rejections {
            if *count > 0 {
                tracing::info!(reason = %reason, count, "rejection tally");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_total_sums_all_reasons() {
        let report = CrawlReport {
            saved: 3,
            products_seen: 10,
            links_seen: 4,
            last_page_with_result: 2,
            rejections: vec![
                (RejectReason::MissingData, 2),
                (RejectReason::InsufficientSales, 5),
            ],
        };
        assert_eq!(report.rejected_total(), 7);
    }
}
