//! Fixed-interval gate in front of CRM calls.

use std::time::Duration;

/// Default spacing between events' CRM phases: at most ~20 per second.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(50);

/// Delays the caller by a fixed interval on every call.
///
/// There is no burst allowance and no adaptive backoff. A zero interval
/// disables the delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    interval: Duration,
}

impl RateLimiter {
    /// Creates a limiter with the given interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Returns the configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for the configured interval.
    pub async fn throttle(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}
