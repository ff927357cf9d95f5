//! Remote-backed bounded queue
//!
//! - [`ledger`]: size and fullness, always read from the store
//! - [`coordinator`]: local wake-ups for producers waiting on capacity
//! - [`remote_queue`]: put/get over a [`ListStore`], pop end chosen by
//!   [`OrderingPolicy`](proxyq_domain::OrderingPolicy)

pub mod coordinator;
pub mod errors;
pub mod ledger;
pub mod metrics;
pub mod ports;
pub mod remote_queue;

pub use coordinator::WaitCoordinator;
pub use errors::QueueError;
pub use ledger::CapacityLedger;
pub use metrics::{QueueMetrics, QueueMetricsSnapshot};
pub use ports::{ListStore, StoreError, StoreResult, StoreWait};
pub use remote_queue::RemoteQueue;
