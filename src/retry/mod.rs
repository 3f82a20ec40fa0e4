//! Pacing-aware bounded retries
//!
//! Fetch routines talking to a registry retry the same request a few times
//! before giving up: once more after a throttle response (honoring the
//! server's retry hint when it sends one) and once more after a transient
//! server error. [`RetryPolicy`] captures that loop with the limiter in
//! the middle, so every attempt, failed or not, is acquired and recorded
//! against quota.
//!
//! The policy knows nothing about HTTP. The caller classifies each
//! attempt's outcome as an [`Attempt`] and the policy decides whether to
//! pause and go again.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::RateLimiter;

#[cfg(test)]
mod tests;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_THROTTLE_FALLBACK: Duration = Duration::from_secs(20);
const DEFAULT_TRANSIENT_PAUSE: Duration = Duration::from_secs(5);

/// Outcome of one attempt, as classified by the caller.
#[derive(Debug)]
pub enum Attempt<T> {
    /// The attempt produced a result; stop retrying.
    Done(T),
    /// The remote throttled the attempt. Back off for `retry_after` when
    /// the server supplied a hint, otherwise for the policy's fallback.
    Throttled { retry_after: Option<Duration> },
    /// The attempt failed transiently (e.g. a server error); pause
    /// briefly and go again.
    Transient,
}

/// Bounded retry loop over a shared [`RateLimiter`].
///
/// # Example
///
/// ```
/// use callwindow::{Attempt, RateLimiter, RetryPolicy};
///
/// let limiter = RateLimiter::new();
/// let policy = RetryPolicy::default();
///
/// let result = policy.run(&limiter, |_attempt| Attempt::Done(42));
/// assert_eq!(result, Some(42));
/// assert_eq!(limiter.remaining(), limiter.ceiling() as usize - 1);
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    throttle_fallback: Duration,
    transient_pause: Duration,
}

impl Default for RetryPolicy {
    /// Three attempts, a 20-second throttle fallback and a 5-second pause
    /// after a transient failure.
    fn default() -> Self {
        RetryPolicy {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            throttle_fallback: DEFAULT_THROTTLE_FALLBACK,
            transient_pause: DEFAULT_TRANSIENT_PAUSE,
        }
    }
}

impl RetryPolicy {
    /// A policy with the given attempt cap and default pauses.
    pub fn new(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts,
            ..Self::default()
        }
    }

    /// Back-off used for a throttle outcome that carries no server hint.
    pub fn throttle_fallback(mut self, fallback: Duration) -> Self {
        self.throttle_fallback = fallback;
        self
    }

    /// Pause between attempts after a transient failure.
    pub fn transient_pause(mut self, pause: Duration) -> Self {
        self.transient_pause = pause;
        self
    }

    /// Run `op` until it completes or the attempt cap is reached.
    ///
    /// Each attempt is wrapped as `acquire` / op / `record`, so failed
    /// attempts count against quota like any other call. `op` receives the
    /// 1-based attempt number. Returns `None` once the cap is exhausted.
    pub fn run<T>(
        &self,
        limiter: &RateLimiter,
        mut op: impl FnMut(u32) -> Attempt<T>,
    ) -> Option<T> {
        for attempt in 1..=self.max_attempts {
            limiter.acquire();
            let outcome = op(attempt);
            limiter.record();
            match outcome {
                Attempt::Done(value) => return Some(value),
                Attempt::Throttled { retry_after } => {
                    let wait = retry_after.unwrap_or(self.throttle_fallback);
                    warn!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "throttled by remote, backing off"
                    );
                    thread::sleep(wait);
                }
                Attempt::Transient => {
                    debug!(attempt, "transient failure, pausing before retry");
                    thread::sleep(self.transient_pause);
                }
            }
        }
        None
    }
}
