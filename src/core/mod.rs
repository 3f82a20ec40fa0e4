//! Core components of the callwindow rate limiting library
//!
//! This module contains the fundamental building blocks:
//! - [`limiter`]: the thread-safe sliding-window rate limiter
//! - [`window`]: the pruned timestamp sequence behind it

pub mod limiter;
pub(crate) mod window;


pub use limiter::{RateLimiter, RateLimiterBuilder};

use std::error::Error;
use std::fmt;

/// Errors rejected at limiter construction
///
/// These are the only errors this crate ever surfaces: every runtime
/// operation is infallible by design, degrading locally (with a logged
/// warning) rather than failing.
///
/// # Example
///
/// ```
/// use callwindow::{ConfigError, RateLimiter};
///
/// let err = RateLimiter::builder().limit(10).buffer(10).build().unwrap_err();
/// assert_eq!(err, ConfigError::BufferTooLarge { buffer: 10, limit: 10 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The per-window call limit was zero
    ZeroLimit,
    /// The trailing window length was zero
    ZeroWindow,
    /// The safety buffer was not strictly below the limit
    BufferTooLarge { buffer: u32, limit: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroLimit => write!(f, "call limit must be positive"),
            ConfigError::ZeroWindow => write!(f, "window length must be positive"),
            ConfigError::BufferTooLarge { buffer, limit } => {
                write!(f, "buffer {buffer} must be below limit {limit}")
            }
        }
    }
}

impl Error for ConfigError {}
