//! Port interface for the remote list store

use std::time::Duration;

use async_trait::async_trait;
use proxyq_domain::ListEnd;
use thiserror::Error;

/// Failure talking to the remote list store.
///
/// Always propagated to the caller; the queue never retries or swallows it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("store command {command} failed: {message}")]
    Command { command: &'static str, message: String },

    #[error("unexpected store response: {0}")]
    Protocol(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// How long a pop may wait on the store for an element to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreWait {
    /// Return immediately.
    Poll,
    /// Wait at most this long. A zero duration behaves like [`Self::Poll`].
    For(Duration),
    /// Wait until an element arrives.
    Indefinitely,
}

/// Remote, shared list keyed by name.
///
/// Implementations must make each operation atomic on the remote side, and
/// `pop` must never remove an element it does not return.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Append `item` at the tail; returns the new list length.
    async fn append(&self, key: &str, item: &str) -> StoreResult<u64>;

    /// Remove and return one element from `end`, waiting per `wait`.
    ///
    /// `Ok(None)` means nothing was available within the wait.
    async fn pop(&self, key: &str, end: ListEnd, wait: StoreWait) -> StoreResult<Option<String>>;

    /// Current element count (0 for a missing key).
    async fn length(&self, key: &str) -> StoreResult<u64>;
}
