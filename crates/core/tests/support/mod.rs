//! Shared test helpers for `proxyq-core` integration tests.
//!
//! A recording in-memory store stands in for the remote list so queue
//! behaviour can be asserted without a server.

#![allow(dead_code)]

pub mod store;

use std::sync::Arc;
use std::time::Duration;

use proxyq_core::RemoteQueue;
pub use store::RecordingStore;

/// Queue over a fresh recording store with a short poll interval.
pub fn queue(max_capacity: i64) -> (Arc<RecordingStore>, RemoteQueue) {
    let store = Arc::new(RecordingStore::default());
    let queue = RemoteQueue::new(store.clone(), "test:queue", max_capacity)
        .unwrap()
        .with_poll_interval(Duration::from_millis(20));
    (store, queue)
}
