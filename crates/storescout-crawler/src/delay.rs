//! Randomized pacing between requests.

use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Sleeps for a random duration inside the configured window, waking
/// early if the crawl is cancelled. A zero-width window at zero skips
/// the sleep entirely (useful in tests).
pub async fn random_delay(min_ms: u64, max_ms: u64, cancel: &CancellationToken) {
    if max_ms == 0 {
        return;
    }
    // ThreadRng is not Send, so draw the duration before awaiting.
    let ms = rand::rng().random_range(min_ms..=max_ms);
    tokio::select! {
        () = tokio::time::sleep(Duration::from_millis(ms)) => {}
        () = cancel.cancelled() => {}
    }
}
