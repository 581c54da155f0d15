//! Crawl orchestration: frontier, request labels, qualification chain,
//! shared run state, and the worker-pool dispatcher.
//!
//! The crawler is generic over the two boundaries it drives — a
//! [`PageSource`](storescout_core::PageSource) for fetching and extraction
//! and a [`StorefrontStore`](storescout_core::StorefrontStore) for
//! persistence — so the whole pipeline runs against scripted fakes in tests.

pub mod delay;
pub mod dispatch;
pub mod frontier;
pub mod qualify;
pub mod report;
pub mod request;
pub mod state;
pub mod stats;

pub use dispatch::{CrawlError, Crawler};
pub use qualify::{ApprovedSeller, QualifyRules, RejectReason};
pub use report::CrawlReport;
pub use request::{seed_url, CrawlRequest, RequestLabel, SearchContext};
pub use state::{CrawlState, StateSnapshot};
pub use stats::FilterStats;
