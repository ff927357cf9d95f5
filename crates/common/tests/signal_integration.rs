//! Integration tests for the local wake-up signal
//!
//! Exercises the signal the way a blocking producer does: park for a bounded
//! slice, re-check, and park again until the deadline runs out.

#![cfg(feature = "runtime")]

use std::sync::Arc;
use std::time::{Duration, Instant};

use proxyq_common::{Deadline, Signal, WakeReason};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn sliced_waits_respect_overall_deadline() {
    let signal = Signal::new();
    let deadline = Deadline::after(Duration::from_millis(120));
    let started = Instant::now();
    let mut slices = 0;

    while !deadline.is_expired() {
        let reason = signal.wait_for(deadline.slice(Duration::from_millis(50)), None).await;
        assert_eq!(reason, WakeReason::Elapsed);
        slices += 1;
    }

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(120));
    assert!(elapsed < Duration::from_millis(500), "overshot deadline: {elapsed:?}");
    assert!(slices >= 3);
}

#[tokio::test]
async fn notify_waiters_wakes_every_parked_task() {
    let signal = Arc::new(Signal::new());
    let mut waiters = Vec::new();
    for _ in 0..4 {
        let signal = Arc::clone(&signal);
        waiters.push(tokio::spawn(async move {
            signal.wait_for(Duration::from_secs(5), None).await
        }));
    }

    tokio::time::sleep(Duration::from_millis(30)).await;
    signal.notify_waiters();

    for waiter in waiters {
        assert_eq!(waiter.await.unwrap(), WakeReason::Notified);
    }
}

#[tokio::test]
async fn cancelling_mid_wait_returns_promptly() {
    let signal = Arc::new(Signal::new());
    let token = CancellationToken::new();
    let waiter = {
        let signal = Arc::clone(&signal);
        let token = token.clone();
        tokio::spawn(async move { signal.wait_for(Duration::from_secs(10), Some(&token)).await })
    };

    let started = Instant::now();
    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    assert_eq!(waiter.await.unwrap(), WakeReason::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(1));
}
