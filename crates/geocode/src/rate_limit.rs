use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum gap between consecutive calls to [`RateLimiter::acquire`].
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval, last: Mutex::new(None) }
    }

    /// Waits until at least `min_interval` has passed since the previous call.
    /// The lock is held while sleeping so concurrent callers queue up.
    pub async fn acquire(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!(?wait, "rate limit: delaying geocode request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}
