// Copyright (c) The Damper Project Authors.
// Licensed under the MIT License.

//! Integration tests for the adaptive throttle using only public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use damper::{AdaptiveThrottle, CircuitBreaker, Rejected, ThrottleOptions};
use tick::ClockControl;

/// A throttle over a short window (10 x 100ms) so tests can expire it quickly.
fn throttle(control: &ClockControl) -> AdaptiveThrottle {
    AdaptiveThrottle::with_options(
        &control.to_clock(),
        ThrottleOptions::default()
            .with_buckets(10)
            .with_bucket_duration(Duration::from_millis(100)),
    )
}

fn mark_success(throttle: &AdaptiveThrottle, count: usize) {
    for _ in 0..count {
        throttle.mark_success();
    }
}

fn mark_failed(throttle: &AdaptiveThrottle, count: usize) {
    for _ in 0..count {
        throttle.mark_failed();
    }
}

/// With the default sampler a single check is probabilistic, so batch checks
/// and count the rejections instead of asserting on one draw.
fn rejections(throttle: &AdaptiveThrottle, checks: usize) -> usize {
    (0..checks).filter(|_| throttle.allow() == Err(Rejected)).count()
}

#[test]
fn healthy_traffic_admits_throughout() {
    let control = ClockControl::new();
    let throttle = throttle(&control);

    mark_success(&throttle, 80);
    assert_eq!(throttle.allow(), Ok(()));
    mark_success(&throttle, 120);

    // 200 samples at 100% success: the check is deterministic.
    assert_eq!(rejections(&throttle, 100), 0);
}

#[test]
fn sustained_failures_engage_the_throttle() {
    let control = ClockControl::new();
    let throttle = throttle(&control);

    mark_success(&throttle, 100);
    assert_eq!(throttle.allow(), Ok(()));

    // Drop probability is ~0.98 here; the chance of zero rejections across
    // 200 independent checks is about 10^-340.
    mark_failed(&throttle, 10_000);
    assert!(rejections(&throttle, 200) > 0);
}

#[test]
fn fresh_successes_disengage_the_throttle() {
    let control = ClockControl::new();
    let throttle = throttle(&control);

    mark_success(&throttle, 100);
    mark_failed(&throttle, 10_000);
    assert!(rejections(&throttle, 200) > 0);

    // Enough successes push the observed rate back above the target; the
    // check turns deterministic again with no time passing.
    mark_success(&throttle, 10_000);
    assert_eq!(rejections(&throttle, 100), 0);
}

#[test]
fn window_expiry_disengages_the_throttle() {
    let control = ClockControl::new();
    let throttle = throttle(&control);

    mark_failed(&throttle, 10_000);
    assert!(rejections(&throttle, 200) > 0);

    // Advance past the full window span without any new activity; the
    // failures rotate out and the empty window admits deterministically.
    control.advance(Duration::from_secs(2));
    assert_eq!(rejections(&throttle, 100), 0);
}

#[test]
fn few_failures_never_reject() {
    let control = ClockControl::new();
    let throttle = throttle(&control);

    // One below the default ignore-requests floor of 100.
    mark_failed(&throttle, 99);
    assert_eq!(rejections(&throttle, 1_000), 0);
}

#[test]
fn instances_are_independent() {
    let control = ClockControl::new();
    let degraded = throttle(&control);
    let healthy = throttle(&control);

    mark_failed(&degraded, 10_000);
    assert!(rejections(&degraded, 200) > 0);

    // The other instance saw no traffic and keeps admitting.
    assert_eq!(rejections(&healthy, 100), 0);
}

#[test]
fn rejection_is_the_sentinel_error() {
    let control = ClockControl::new();
    let throttle = throttle(&control);

    mark_failed(&throttle, 10_000);
    let rejected = (0..200)
        .find_map(|_| throttle.allow().err())
        .expect("sustained failures should reject");

    assert_eq!(rejected, Rejected);
    assert_eq!(rejected.to_string(), "request not currently allowed");
}

#[test]
fn concurrent_callers_share_one_instance() {
    const THREADS: usize = 8;
    const REQUESTS_PER_THREAD: usize = 2_000;

    let control = ClockControl::new();
    let throttle = Arc::new(throttle(&control));
    let admitted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let throttle = Arc::clone(&throttle);
            let admitted = Arc::clone(&admitted);
            std::thread::spawn(move || {
                for i in 0..REQUESTS_PER_THREAD {
                    if throttle.allow().is_ok() {
                        admitted.fetch_add(1, Ordering::Relaxed);
                        // Half the workers report failures to push the
                        // throttle into its probabilistic regime mid-run.
                        if worker % 2 == 0 && i % 4 != 0 {
                            throttle.mark_failed();
                        } else {
                            throttle.mark_success();
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    // The throttle never fully cuts off traffic.
    assert!(admitted.load(Ordering::Relaxed) > 0);
}

#[test]
fn works_behind_the_trait() {
    let control = ClockControl::new();
    let throttle: Box<dyn CircuitBreaker> = Box::new(throttle(&control));

    throttle.mark_success();
    throttle.mark_failed();
    assert_eq!(throttle.allow(), Ok(()));
}
