//! The crawl orchestrator.
//!
//! Owns the worker pool and routes every frontier request through an
//! exhaustive label match. Per-request failures are contained here: the
//! request is logged and dropped, shared state stays consistent, and the
//! rest of the crawl continues.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use storescout_core::{
    regional_confidence, AppConfig, PageSource, ProductRef, SourceError, StoreError,
    StorefrontRecord, StorefrontStore, PLATFORM_TAG,
};

use crate::delay;
use crate::frontier::Frontier;
use crate::qualify::QualifyRules;
use crate::report::CrawlReport;
use crate::request::{self, CrawlRequest, RequestLabel};
use crate::state::CrawlState;
use crate::stats::FilterStats;

/// Failure of a single crawl request. Never escapes the dispatcher.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Crawler<S, P> {
    source: S,
    store: P,
    config: Arc<AppConfig>,
    state: CrawlState,
    stats: FilterStats,
    frontier: Frontier,
    cancel: CancellationToken,
}

impl<S, P> Crawler<S, P>
where
    S: PageSource + 'static,
    P: StorefrontStore + 'static,
{
    pub fn new(source: S, store: P, config: Arc<AppConfig>) -> Self {
        Self {
            source,
            store,
            config,
            state: CrawlState::new(),
            stats: FilterStats::new(),
            frontier: Frontier::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the crawl from outside (e.g. on SIGINT).
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the crawl to completion and returns the final report.
    ///
    /// Seeds the frontier with the initial search, spawns the worker pool,
    /// and waits for the frontier to drain or a stop condition to fire.
    pub async fn run(self) -> CrawlReport {
        let crawler = Arc::new(self);
        crawler.frontier.enqueue(CrawlRequest::initial(request::seed_url(
            &crawler.config.search_term,
        )));

        let mut workers = JoinSet::new();
        for worker_id in 0..crawler.config.max_concurrency.max(1) {
            let crawler = Arc::clone(&crawler);
            workers.spawn(async move { crawler.worker_loop(worker_id).await });
        }
        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                tracing::error!(error = %err, "crawl worker aborted");
            }
        }

        let report = crawler.report();
        report.log_summary();
        report
    }

    async fn worker_loop(&self, worker_id: usize) {
        tracing::debug!(worker_id, "worker started");
        while let Some(request) = self.frontier.next(&self.cancel).await {
            self.process(request).await;
            self.frontier.complete();
        }
        tracing::debug!(worker_id, "worker finished");
    }

    async fn process(&self, request: CrawlRequest) {
        delay::random_delay(
            self.config.delay_min_ms,
            self.config.delay_max_ms,
            &self.cancel,
        )
        .await;
        if self.stop_condition_reached() {
            return;
        }

        let outcome = match request.label {
            RequestLabel::InitialSearch => self.handle_initial(&request).await,
            RequestLabel::PagedSearch => self.handle_paged(&request).await,
            RequestLabel::ProductDetail => self.handle_product(&request).await,
        };
        if let Err(err) = outcome {
            tracing::warn!(
                url = %request.url,
                label = %request.label,
                error = %err,
                "request failed, dropping it"
            );
        }
    }

    /// Checks both stop conditions and, when one holds, cancels the run.
    fn stop_condition_reached(&self) -> bool {
        if self.cancel.is_cancelled() {
            return true;
        }
        let saved = self.state.saved_count();
        if saved >= self.config.target_stores {
            tracing::info!(saved, target = self.config.target_stores, "target reached");
            self.stop();
            return true;
        }
        let streak = self.state.consecutive_empty_pages();
        if streak >= self.config.empty_page_threshold {
            tracing::info!(streak, "result pages dried up, stopping");
            self.stop();
            return true;
        }
        false
    }

    fn stop(&self) {
        self.cancel.cancel();
        self.frontier.abort();
    }

    /// Landing page: derive the pagination context from the URL the
    /// marketplace redirected to, enqueue its products, and always generate
    /// the fixed page lookahead, even when this page was empty.
    async fn handle_initial(&self, req: &CrawlRequest) -> Result<(), CrawlError> {
        let page = self.source.search_page(&req.url).await?;
        let seed_slug = request::slugify(&self.config.search_term);
        let context = request::parse_search_context(&page.final_url, &seed_slug);
        tracing::info!(
            products = page.products.len(),
            category = %context.category,
            "initial search landed"
        );

        self.enqueue_unseen_products(&page.products, req.page);
        for paged in request::paged_requests(&context) {
            if self.cancel.is_cancelled() {
                break;
            }
            self.frontier.enqueue(paged);
        }
        Ok(())
    }

    async fn handle_paged(&self, req: &CrawlRequest) -> Result<(), CrawlError> {
        let page = self.source.search_page(&req.url).await?;
        if page.products.is_empty() {
            let streak = self.state.record_empty_page();
            tracing::warn!(url = %req.url, page = req.page, streak, "empty result page");
            return Ok(());
        }
        self.state.reset_empty_pages();
        tracing::debug!(products = page.products.len(), page = req.page, "result page parsed");
        self.enqueue_unseen_products(&page.products, req.page);
        Ok(())
    }

    async fn handle_product(&self, req: &CrawlRequest) -> Result<(), CrawlError> {
        let candidate = self.source.seller_page(&req.url).await?;
        let rules = QualifyRules {
            min_sales: self.config.min_sales,
            require_green_reputation: self.config.require_green_reputation,
        };

        let approved = match self.state.qualify(&candidate, rules) {
            Ok(approved) => approved,
            Err(reason) => {
                self.stats.record(reason);
                tracing::info!(url = %req.url, reason = %reason, "seller rejected");
                return Ok(());
            }
        };

        let sequence = self.state.reserve_sequence();
        let record = StorefrontRecord {
            sequence,
            origin_term: self.config.search_term.clone(),
            category: self.config.category_label.clone(),
            seller_name: approved.name,
            seller_link: approved.link,
            sales_estimate: approved.sales_count,
            mercado_lider: approved.mercado_lider,
            green_reputation: approved.green_reputation,
            regional_confidence: regional_confidence(approved.location.as_deref()),
            location: approved.location,
            platform: PLATFORM_TAG.to_string(),
            extracted_at: chrono::Utc::now(),
        };

        if self.store.upsert(&record).await? {
            let saved = self.state.record_saved(req.page);
            tracing::info!(seller = %record.seller_name, saved, "storefront saved");
        } else {
            tracing::warn!(seller = %record.seller_name, "storefront already persisted");
        }
        Ok(())
    }

    /// Claims each unseen product id and enqueues its detail request.
    /// Claim-then-enqueue ordering means an id can never be queued twice.
    fn enqueue_unseen_products(&self, products: &[ProductRef], page: u32) {
        for product in products {
            if self.cancel.is_cancelled() {
                return;
            }
            if self.state.mark_product_seen(&product.id) {
                self.frontier
                    .enqueue(CrawlRequest::product(product.url.clone(), page));
            }
        }
    }

    fn report(&self) -> CrawlReport {
        let snapshot = self.state.snapshot();
        CrawlReport {
            saved: snapshot.saved,
            products_seen: snapshot.products_seen,
            links_seen: snapshot.links_seen,
            last_page_with_result: snapshot.last_page_with_result,
            rejections: self.stats.snapshot(),
        }
    }
}
