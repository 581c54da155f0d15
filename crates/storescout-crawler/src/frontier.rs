//! Work queue shared by the crawl workers.
//!
//! Tracks both queued and in-flight requests so a worker blocked on
//! [`Frontier::next`] can tell "queue momentarily empty" apart from
//! "crawl finished": the frontier only drains once every outstanding
//! request has been completed and nothing new was enqueued.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::request::CrawlRequest;

#[derive(Debug, Default)]
pub struct Frontier {
    queue: Mutex<VecDeque<CrawlRequest>>,
    /// Queued plus in-flight requests.
    outstanding: AtomicUsize,
    aborted: AtomicBool,
    notify: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, request: CrawlRequest) {
        if self.aborted.load(Ordering::SeqCst) {
            return;
        }
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(request);
        self.notify.notify_waiters();
    }

    /// Waits for the next request, or `None` once the crawl is over.
    ///
    /// Returns `None` when the frontier was aborted, the token was
    /// cancelled, or every outstanding request has completed.
    pub async fn next(&self, cancel: &CancellationToken) -> Option<CrawlRequest> {
        loop {
            if self.aborted.load(Ordering::SeqCst) || cancel.is_cancelled() {
                return None;
            }
            // `enable` registers the waiter before the queue check; a
            // bare `Notified` only registers on first poll, which would
            // let a notification land unseen between the pop and the await.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if let Some(request) = self
                .queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
            {
                return Some(request);
            }
            if self.outstanding.load(Ordering::SeqCst) == 0 {
                return None;
            }
            tokio::select! {
                () = &mut notified => {}
                () = cancel.cancelled() => return None,
            }
        }
    }

    /// Marks one in-flight request as finished.
    pub fn complete(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.notify.notify_waiters();
        }
    }

    /// Stops the crawl: drops queued work and wakes blocked workers.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.notify.notify_waiters();
    }
}
