//! Per-identifier sliding-window rate limiting.
//!
//! The limiter keeps a log of actual request timestamps per identifier and
//! trims entries older than the window before every admission decision. This
//! gives precise decisions at the cost of window-capped memory per
//! identifier, unlike a fixed-bucket counter.
//!
//! State is process-local: a restart resets every window to empty. That is a
//! known limitation of this single-instance design, not an accident.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Sliding-window rate limiter keyed by caller identifier.
///
/// The map is sharded, so callers with distinct identifiers do not contend
/// on a single lock; calls for the same identifier serialize on its entry,
/// which keeps the read-trim-append sequence atomic per identifier.
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum admitted requests per window
    limit: usize,

    /// Window length
    window: Duration,

    /// Identifier -> timestamps of admitted requests within the window
    windows: DashMap<String, Vec<Instant>>,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: DashMap::new(),
        }
    }

    /// Decide whether a request from `identifier` is admitted.
    ///
    /// Entries older than the window are dropped first; if the remaining
    /// count has reached the limit the request is rejected and NOT recorded,
    /// so rejected attempts never extend the caller's lockout.
    pub fn admit(&self, identifier: &str) -> bool {
        let now = Instant::now();

        // Entry guard holds the shard lock for this identifier only
        let mut timestamps = self.windows.entry(identifier.to_string()).or_default();

        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() >= self.limit {
            return false;
        }

        timestamps.push(now);
        true
    }

    /// Configured capacity, for client-visible messaging.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Configured window length in seconds, for client-visible messaging.
    pub fn window_secs(&self) -> u64 {
        self.window.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn admits_up_to_limit_and_rejects_next() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));

        for _ in 0..5 {
            assert!(limiter.admit("key1"));
        }
        assert!(!limiter.admit("key1"));
    }

    #[test]
    fn identifiers_do_not_interfere() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.admit("a"));
        assert!(!limiter.admit("a"));

        // Exhausting "a" must not affect "b"'s first call
        assert!(limiter.admit("b"));
    }

    #[test]
    fn window_slides() {
        let limiter = RateLimiter::new(2, Duration::from_millis(100));

        assert!(limiter.admit("k"));
        assert!(limiter.admit("k"));
        assert!(!limiter.admit("k"));

        sleep(Duration::from_millis(120));
        assert!(limiter.admit("k"));
    }

    #[test]
    fn rejected_attempt_is_not_recorded() {
        let limiter = RateLimiter::new(1, Duration::from_millis(200));

        assert!(limiter.admit("k"));

        // Rejected at ~100ms; if this were recorded it would block until ~300ms
        sleep(Duration::from_millis(100));
        assert!(!limiter.admit("k"));

        // At ~250ms only the original admission has expired
        sleep(Duration::from_millis(150));
        assert!(limiter.admit("k"));
    }

    #[test]
    fn reports_configured_limits() {
        let limiter = RateLimiter::new(100, Duration::from_secs(3600));

        assert_eq!(limiter.limit(), 100);
        assert_eq!(limiter.window_secs(), 3600);
    }
}
