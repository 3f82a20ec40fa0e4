//! # callwindow
//!
//! A thread-safe sliding-window rate limiter for pacing calls to remote
//! APIs, with optional persisted state.
//!
//! ## Overview
//!
//! callwindow gates outbound calls against a trailing window: no more than
//! `limit - buffer` calls are admitted inside any `window`-length interval,
//! no matter how many worker threads share the limiter. The buffer is a
//! safety margin held in reserve and never consumed, so a burst of workers
//! cannot graze the remote's true limit.
//!
//! ## Quick Start
//!
//! ```
//! use callwindow::RateLimiter;
//! use std::time::Duration;
//!
//! // 600 calls per 5 minutes, keeping 50 in reserve
//! let limiter = RateLimiter::builder()
//!     .limit(600)
//!     .window(Duration::from_secs(300))
//!     .buffer(50)
//!     .build()?;
//!
//! // Wrap every outbound call:
//! limiter.acquire();
//! // ... issue the request ...
//! limiter.record();
//! # Ok::<(), callwindow::ConfigError>(())
//! ```
//!
//! ## Sharing across threads
//!
//! One limiter instance guards one quota. Clone an [`Arc`](std::sync::Arc)
//! into each worker; two independently rate-limited targets are simply two
//! instances.
//!
//! ```
//! use callwindow::RateLimiter;
//! use std::sync::Arc;
//!
//! let limiter = Arc::new(RateLimiter::new());
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let limiter = Arc::clone(&limiter);
//!         std::thread::spawn(move || {
//!             limiter.acquire();
//!             // ... issue the request ...
//!             limiter.record();
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! ```
//!
//! ## Persistence
//!
//! A freshly started process has an empty window and would happily burst
//! past a quota the previous run already spent. [`RateLimiter::save`] and
//! [`RateLimiter::load`] carry the window across restarts through a small
//! JSON snapshot. Both are best-effort: a missing or corrupt snapshot
//! degrades to an empty window with a logged warning, never an error.
//!
//! ```no_run
//! use callwindow::RateLimiter;
//! use std::path::Path;
//!
//! let state = Path::new("logs/rate_limit.json");
//! let limiter = RateLimiter::new();
//! limiter.load(state);
//! // ... fetch ...
//! limiter.save(state);
//! ```
//!
//! ## Sizing a fan-out
//!
//! [`RateLimiter::remaining`] reports how many calls can be issued right
//! now, which batch callers use to size a worker pool without overshooting
//! quota:
//!
//! ```
//! use callwindow::RateLimiter;
//!
//! let limiter = RateLimiter::new();
//! let max_threads = 8;
//! let work_left = 100;
//! let workers = limiter.remaining().min(max_threads).min(work_left);
//! assert_eq!(workers, 8);
//! ```

pub mod core;
pub mod retry;

mod persist;

pub use crate::core::{ConfigError, RateLimiter, RateLimiterBuilder};
pub use crate::retry::{Attempt, RetryPolicy};
