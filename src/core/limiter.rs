//! Sliding-window admission control
//!
//! This module provides the main [`RateLimiter`] struct: a thread-safe
//! sliding-window limiter that paces outbound calls to a remote API.
//! One instance guards one quota; two independently rate-limited targets
//! are two instances.

use parking_lot::Mutex;
use std::env;
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

use super::ConfigError;
use super::window::CallWindow;

// Production defaults: 600 calls per 5 minutes with 50 held in reserve.
const DEFAULT_LIMIT: u32 = 600;
const DEFAULT_WINDOW_SECS: u64 = 300;
const DEFAULT_BUFFER: u32 = 50;

// Lower bound on the back-off sleep so a zero or negative computed wait
// cannot turn the admission loop into a tight spin.
const MIN_SLEEP: Duration = Duration::from_millis(10);

// Environment overrides consulted by `RateLimiterBuilder::from_env`.
const ENV_LIMIT: &str = "CALLWINDOW_LIMIT";
const ENV_WINDOW_SECS: &str = "CALLWINDOW_WINDOW_SECS";
const ENV_BUFFER: &str = "CALLWINDOW_BUFFER";

/// Thread-safe sliding-window rate limiter.
///
/// Ensures that no more than `limit - buffer` calls are recorded inside any
/// trailing window, across however many threads share the instance. Callers
/// wrap each outbound call as:
///
/// ```
/// use callwindow::RateLimiter;
///
/// let limiter = RateLimiter::new();
/// limiter.acquire();
/// // ... issue the HTTP call ...
/// limiter.record();
/// ```
///
/// The limiter knows nothing about HTTP or response bodies; it is purely a
/// call-pacing primitive. Share one instance across worker threads with
/// [`Arc`](std::sync::Arc).
///
/// # Example
///
/// ```
/// use callwindow::RateLimiter;
/// use std::time::Duration;
///
/// let limiter = RateLimiter::builder()
///     .limit(10)
///     .window(Duration::from_secs(60))
///     .buffer(2)
///     .build()?;
///
/// assert_eq!(limiter.remaining(), 8);
/// limiter.acquire();
/// limiter.record();
/// assert_eq!(limiter.remaining(), 7);
/// # Ok::<(), callwindow::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    pub(crate) inner: Mutex<CallWindow>,
    limit: u32,
    buffer: u32,
    window: Duration,
}

/// Builder for configuring a [`RateLimiter`]
///
/// # Example
///
/// ```
/// use callwindow::RateLimiter;
/// use std::time::Duration;
///
/// let limiter = RateLimiter::builder()
///     .limit(600)
///     .window(Duration::from_secs(300))
///     .buffer(50)
///     .build()
///     .unwrap();
/// ```
pub struct RateLimiterBuilder {
    limit: u32,
    window: Duration,
    buffer: u32,
}

impl RateLimiter {
    /// Create a limiter with the production defaults: 600 calls per
    /// 300-second window with a safety buffer of 50 (effective ceiling 550).
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_LIMIT, Duration::from_secs(DEFAULT_WINDOW_SECS), DEFAULT_BUFFER)
    }

    /// Create a builder for a custom limit, window, or buffer.
    pub fn builder() -> RateLimiterBuilder {
        RateLimiterBuilder {
            limit: DEFAULT_LIMIT,
            window: Duration::from_secs(DEFAULT_WINDOW_SECS),
            buffer: DEFAULT_BUFFER,
        }
    }

    // Callers must have validated limit/window/buffer already.
    fn from_parts(limit: u32, window: Duration, buffer: u32) -> Self {
        let ceiling = (limit - buffer) as usize;
        RateLimiter {
            inner: Mutex::new(CallWindow::new(window, ceiling)),
            limit,
            buffer,
            window,
        }
    }

    /// Block until one more call can be issued without exceeding the
    /// effective ceiling.
    ///
    /// The admitted slot is held as a reservation until the paired
    /// [`record`](Self::record) call, so concurrent callers cannot
    /// over-admit between the two steps. When the window is full the
    /// caller sleeps until the oldest retained timestamp ages out, then
    /// re-checks from scratch: concurrent callers may have pruned or
    /// recorded while this one slept, so a stale wait estimate is never
    /// trusted.
    ///
    /// There is no fairness guarantee between waiting threads and no
    /// timeout; callers needing a bounded wait must compose their own
    /// cancellation around this call.
    pub fn acquire(&self) {
        loop {
            let wait = self.inner.lock().admit(SystemTime::now());
            match wait {
                None => return,
                Some(wait) => {
                    let wait = wait.max(MIN_SLEEP);
                    debug!(wait_ms = wait.as_millis() as u64, "window full, backing off");
                    // Sleep outside the lock so other threads can prune
                    // and record while this one waits.
                    thread::sleep(wait);
                }
            }
        }
    }

    /// Non-blocking admission probe.
    ///
    /// Returns `true` and reserves a slot if a call could be issued right
    /// now; the reservation is released by the paired
    /// [`record`](Self::record). Returns `false` without side effects when
    /// the window is full.
    pub fn try_acquire(&self) -> bool {
        self.inner.lock().admit(SystemTime::now()).is_none()
    }

    /// Record one attempted outbound call.
    ///
    /// Must be called exactly once per attempt, whether the call succeeded
    /// or failed: registries rate-limit by request volume regardless of
    /// response status, so failed attempts still consume quota.
    pub fn record(&self) {
        self.inner.lock().record(SystemTime::now());
    }

    /// How many more calls can be issued right now.
    ///
    /// Counts retained timestamps only, not in-flight reservations. Batch
    /// callers use this to size a fan-out without overshooting quota, e.g.
    /// `min(limiter.remaining(), max_threads, work_left)`.
    pub fn remaining(&self) -> usize {
        self.inner.lock().remaining(SystemTime::now())
    }

    /// The configured per-window call limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The configured safety buffer (calls reserved, never consumed).
    pub fn buffer(&self) -> u32 {
        self.buffer
    }

    /// The trailing window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The effective ceiling actually enforced: `limit - buffer`.
    pub fn ceiling(&self) -> u32 {
        self.limit - self.buffer
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiterBuilder {
    /// Maximum calls per window.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Trailing window length.
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Safety margin subtracted from the limit.
    pub fn buffer(mut self, buffer: u32) -> Self {
        self.buffer = buffer;
        self
    }

    /// Apply environment overrides on top of the current settings.
    ///
    /// Reads `CALLWINDOW_LIMIT`, `CALLWINDOW_WINDOW_SECS` and
    /// `CALLWINDOW_BUFFER`. Unset variables leave the current value in
    /// place; unparsable values are ignored with a logged warning.
    pub fn from_env(mut self) -> Self {
        if let Some(limit) = read_env(ENV_LIMIT) {
            self.limit = limit;
        }
        if let Some(secs) = read_env(ENV_WINDOW_SECS) {
            self.window = Duration::from_secs(u64::from(secs));
        }
        if let Some(buffer) = read_env(ENV_BUFFER) {
            self.buffer = buffer;
        }
        self
    }

    /// Validate the configuration and build the limiter.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroLimit`] if the limit is zero
    /// - [`ConfigError::ZeroWindow`] if the window is zero
    /// - [`ConfigError::BufferTooLarge`] if the buffer is not strictly
    ///   below the limit
    pub fn build(self) -> Result<RateLimiter, ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if self.window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        if self.buffer >= self.limit {
            return Err(ConfigError::BufferTooLarge {
                buffer: self.buffer,
                limit: self.limit,
            });
        }
        Ok(RateLimiter::from_parts(self.limit, self.window, self.buffer))
    }
}

fn read_env(name: &str) -> Option<u32> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}
