//! Bounded polling for dynamically loaded content.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, trace};

/// How a wait ended. Both outcomes mean "carry on".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The condition held within the attempt budget
    Ready,
    /// The attempt budget ran out before the condition held
    TimedOut,
}

/// Polls a condition at a fixed interval until it holds or the attempt
/// budget (`timeout / interval`) is spent.
///
/// The wait is best-effort: it always resolves, so a stuck widget can delay
/// extraction by at most `timeout` but never stall it.
#[derive(Debug, Clone)]
pub struct AsyncWaiter {
    interval: Duration,
    timeout: Duration,
}

impl AsyncWaiter {
    /// Creates a waiter with the given poll interval and timeout.
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Maximum number of sleeps before giving up.
    pub fn max_attempts(&self) -> u128 {
        if self.interval.is_zero() {
            return 0;
        }
        self.timeout.as_millis() / self.interval.as_millis().max(1)
    }

    /// Waits until `condition` returns true or the budget is exhausted.
    pub async fn wait_until<F>(&self, mut condition: F) -> WaitOutcome
    where
        F: FnMut() -> bool,
    {
        let max_attempts = self.max_attempts();
        let mut attempt: u128 = 0;

        loop {
            if condition() {
                trace!("Condition met after {} attempts", attempt);
                return WaitOutcome::Ready;
            }
            if attempt >= max_attempts {
                debug!("Gave up waiting after {:?}, continuing anyway", self.timeout);
                return WaitOutcome::TimedOut;
            }
            attempt += 1;
            sleep(self.interval).await;
        }
    }
}

impl Default for AsyncWaiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(50), Duration::from_millis(5000))
    }
}
