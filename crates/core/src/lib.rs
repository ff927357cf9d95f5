//! # proxyq Core
//!
//! Queue logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The [`ListStore`] port the remote list adapters implement
//! - [`RemoteQueue`], a bounded blocking FIFO/LIFO queue over that port
//! - [`ProxyPool`], which hands proxy endpoints out through the queue
//!
//! ## Architecture Principles
//! - Only depends on `proxyq-common` and `proxyq-domain`
//! - No network or storage code
//! - All external dependencies via traits

pub mod pool;
pub mod queue;

pub use pool::{ProxyDisposition, ProxyPool};
pub use queue::{
    ListStore, QueueError, QueueMetrics, QueueMetricsSnapshot, RemoteQueue, StoreError,
    StoreResult, StoreWait,
};
