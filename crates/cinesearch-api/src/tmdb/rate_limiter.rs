//! Request pacing for the TMDB client.

use std::time::{Duration, Instant};

/// Default spacing between consecutive requests (25ms, ~40 req/s).
///
/// TMDB allows roughly 50 requests per second per IP. Each settled
/// search term costs one request, so the browser only approaches that
/// when the debounce interval is configured near zero or Enter is
/// mashed; this spacing keeps it under the limit even then.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Paces outgoing TMDB requests.
///
/// Tracks when the previous request was released and sleeps away any
/// remainder of the minimum interval before releasing the next one.
/// One pacer per client is enough; the event loop only ever has a
/// handful of fetches in flight.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum spacing between consecutive requests.
    min_interval: Duration,
    /// When the previous request was released.
    last_request: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a pacer with the given spacing.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Creates a pacer with the default spacing.
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits until the next request may be released.
    #[allow(clippy::arithmetic_side_effects)]
    pub async fn acquire(&mut self) {
        let now = Instant::now();

        if let Some(last) = self.last_request {
            let elapsed = now.duration_since(last);
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval.saturating_sub(elapsed)).await;
            }
        }

        self.last_request = Some(Instant::now());
    }
}
