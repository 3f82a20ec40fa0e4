use super::{Attempt, RetryPolicy};
use crate::RateLimiter;
use std::time::{Duration, Instant};

fn limiter() -> RateLimiter {
    RateLimiter::builder()
        .limit(100)
        .buffer(10)
        .window(Duration::from_secs(60))
        .build()
        .unwrap()
}

#[test]
fn stops_on_first_success() {
    let limiter = limiter();
    let result = RetryPolicy::default().run(&limiter, |_| Attempt::Done("ok"));

    assert_eq!(result, Some("ok"));
    assert_eq!(limiter.remaining(), 89);
}

#[test]
fn retries_transient_failure_then_succeeds() {
    let limiter = limiter();
    let policy = RetryPolicy::new(3).transient_pause(Duration::from_millis(10));

    let mut calls = 0;
    let result = policy.run(&limiter, |attempt| {
        calls += 1;
        if attempt < 2 {
            Attempt::Transient
        } else {
            Attempt::Done(attempt)
        }
    });

    assert_eq!(result, Some(2));
    assert_eq!(calls, 2);
    // Both attempts consumed quota
    assert_eq!(limiter.remaining(), 88);
}

#[test]
fn gives_up_after_max_attempts() {
    let limiter = limiter();
    let policy = RetryPolicy::new(2).transient_pause(Duration::from_millis(1));

    let mut calls = 0;
    let result: Option<()> = policy.run(&limiter, |_| {
        calls += 1;
        Attempt::Transient
    });

    assert_eq!(result, None);
    assert_eq!(calls, 2);
}

#[test]
fn throttle_honors_server_hint() {
    let limiter = limiter();
    let policy = RetryPolicy::new(2).throttle_fallback(Duration::from_secs(60));

    let start = Instant::now();
    let result = policy.run(&limiter, |attempt| {
        if attempt == 1 {
            Attempt::Throttled {
                retry_after: Some(Duration::from_millis(30)),
            }
        } else {
            Attempt::Done(())
        }
    });

    assert_eq!(result, Some(()));
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(30));
    // The 60s fallback was not used
    assert!(elapsed < Duration::from_secs(10));
}

#[test]
fn throttle_without_hint_uses_fallback() {
    let limiter = limiter();
    let policy = RetryPolicy::new(2).throttle_fallback(Duration::from_millis(20));

    let start = Instant::now();
    let result = policy.run(&limiter, |attempt| {
        if attempt == 1 {
            Attempt::Throttled { retry_after: None }
        } else {
            Attempt::Done(())
        }
    });

    assert_eq!(result, Some(()));
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn zero_attempts_never_runs_the_operation() {
    let limiter = limiter();
    let mut calls = 0;
    let result: Option<()> = RetryPolicy::new(0).run(&limiter, |_| {
        calls += 1;
        Attempt::Done(())
    });

    assert_eq!(result, None);
    assert_eq!(calls, 0);
    assert_eq!(limiter.remaining(), 90);
}
