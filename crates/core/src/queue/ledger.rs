//! Size and fullness reads against the remote list

use proxyq_domain::Capacity;

use super::errors::QueueError;
use super::ports::ListStore;

/// Borrowed view answering size questions for one queue.
///
/// Every call is a fresh `length` round trip; nothing is cached, so answers
/// may be stale by the time the caller acts on them.
#[derive(Clone, Copy)]
pub struct CapacityLedger<'a> {
    store: &'a dyn ListStore,
    key: &'a str,
    capacity: Capacity,
}

impl<'a> CapacityLedger<'a> {
    pub fn new(store: &'a dyn ListStore, key: &'a str, capacity: Capacity) -> Self {
        Self { store, key, capacity }
    }

    /// Current remote list length.
    ///
    /// # Errors
    /// Returns [`QueueError::StoreUnavailable`] if the store cannot answer.
    pub async fn size(&self) -> Result<u64, QueueError> {
        Ok(self.store.length(self.key).await?)
    }

    /// # Errors
    /// Returns [`QueueError::StoreUnavailable`] if the store cannot answer.
    pub async fn is_empty(&self) -> Result<bool, QueueError> {
        Ok(self.size().await? == 0)
    }

    /// `true` when bounded and the remote size has reached the bound.
    ///
    /// An unbounded queue answers without touching the store.
    ///
    /// # Errors
    /// Returns [`QueueError::StoreUnavailable`] if the store cannot answer.
    pub async fn is_full(&self) -> Result<bool, QueueError> {
        if !self.capacity.is_bounded() {
            return Ok(false);
        }
        Ok(self.capacity.is_reached_by(self.size().await?))
    }

    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }
}
