//! Minimum-interval rate limiter shared by every geocoding call in the process

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum delay between consecutive calls.
///
/// The waiting caller holds the lock while it sleeps, so concurrent callers
/// queue in arrival order instead of bursting once the delay elapses.
#[derive(Debug)]
pub struct RateLimiter {
    min_delay: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_call: Mutex::new(None),
        }
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Wait until a call is permitted, then record it.
    ///
    /// # Returns
    /// How long this caller slept (zero when no wait was needed)
    pub async fn acquire(&self) -> Duration {
        let mut last_call = self.last_call.lock().await;
        let mut waited = Duration::ZERO;

        if let Some(previous) = *last_call {
            let ready_at = previous + self.min_delay;
            let now = Instant::now();
            if ready_at > now {
                waited = ready_at - now;
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last_call = Some(Instant::now());
        waited
    }
}
