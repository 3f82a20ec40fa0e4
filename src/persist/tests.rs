use crate::RateLimiter;
use std::time::Duration;

fn limiter(window: Duration) -> RateLimiter {
    RateLimiter::builder()
        .limit(10)
        .buffer(2)
        .window(window)
        .build()
        .unwrap()
}

#[test]
fn save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rate_limit.json");

    let first = limiter(Duration::from_secs(300));
    first.record();
    first.record();
    first.record();
    first.save(&path);

    let second = limiter(Duration::from_secs(300));
    assert_eq!(second.load(&path), 3);
    assert_eq!(second.remaining(), first.remaining());
}

#[test]
fn load_missing_file_is_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let fresh = limiter(Duration::from_secs(300));

    assert_eq!(fresh.load(&dir.path().join("nope.json")), 0);
    assert_eq!(fresh.remaining(), 8);
}

#[test]
fn load_corrupt_file_is_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rate_limit.json");
    std::fs::write(&path, b"{not json").unwrap();

    let fresh = limiter(Duration::from_secs(300));
    assert_eq!(fresh.load(&path), 0);
    assert_eq!(fresh.remaining(), 8);
}

#[test]
fn load_ignores_unusable_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rate_limit.json");
    std::fs::write(&path, b"[-5.0, 0.0]").unwrap();

    let fresh = limiter(Duration::from_secs(300));
    assert_eq!(fresh.load(&path), 0);
    assert_eq!(fresh.remaining(), 8);
}

#[test]
fn load_ignores_overflowing_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rate_limit.json");
    // Finite and non-negative, but too large for a Duration
    std::fs::write(&path, b"[1e300]").unwrap();

    let fresh = limiter(Duration::from_secs(300));
    assert_eq!(fresh.load(&path), 0);
    assert_eq!(fresh.remaining(), 8);
}

#[test]
fn save_prunes_aged_out_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rate_limit.json");

    let short = limiter(Duration::from_millis(50));
    short.record();
    std::thread::sleep(Duration::from_millis(100));
    short.save(&path);

    let stamps: Vec<f64> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert!(stamps.is_empty());
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("rate_limit.json");

    let l = limiter(Duration::from_secs(300));
    l.record();
    l.save(&path);

    let stamps: Vec<f64> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(stamps.len(), 1);
}
