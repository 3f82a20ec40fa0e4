use callwindow::RateLimiter;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

fn bench_record(c: &mut Criterion) {
    // Short window so pruning keeps the deque small at bench throughput
    let limiter = RateLimiter::builder()
        .limit(10_000)
        .buffer(100)
        .window(Duration::from_millis(10))
        .build()
        .unwrap();

    c.bench_function("record", |b| {
        b.iter(|| {
            black_box(&limiter).record();
        })
    });
}

fn bench_remaining(c: &mut Criterion) {
    let limiter = RateLimiter::builder()
        .limit(10_000)
        .buffer(100)
        .window(Duration::from_millis(10))
        .build()
        .unwrap();
    for _ in 0..1_000 {
        limiter.record();
    }

    c.bench_function("remaining", |b| {
        b.iter(|| black_box(limiter.remaining()))
    });
}

fn bench_try_acquire_contended(c: &mut Criterion) {
    // Ceiling of 1: after the first success every probe is a rejection
    let limiter = RateLimiter::builder()
        .limit(2)
        .buffer(1)
        .window(Duration::from_secs(60))
        .build()
        .unwrap();
    limiter.record();

    c.bench_function("try_acquire_contended", |b| {
        b.iter(|| black_box(limiter.try_acquire()))
    });
}

criterion_group!(
    benches,
    bench_record,
    bench_remaining,
    bench_try_acquire_contended
);
criterion_main!(benches);
