//! Bounded blocking queue over a remote list

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use proxyq_common::time::Deadline;
use proxyq_common::WakeReason;
use proxyq_domain::constants::DEFAULT_POLL_INTERVAL_MS;
use proxyq_domain::{BlockMode, Capacity, OrderingPolicy, QueueConfig, QueueName};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::coordinator::WaitCoordinator;
use super::errors::QueueError;
use super::ledger::CapacityLedger;
use super::metrics::QueueMetrics;
use super::ports::{ListStore, StoreWait};

/// Handle to a named queue stored in a remote list.
///
/// The handle owns no items. Any number of handles, in this process or
/// others, may point at the same name; they share contents but each has its
/// own local wait signal. Share one handle per process through an `Arc` so
/// that local consumers can wake local producers.
pub struct RemoteQueue {
    store: Arc<dyn ListStore>,
    name: QueueName,
    capacity: Capacity,
    ordering: OrderingPolicy,
    coordinator: WaitCoordinator,
    metrics: QueueMetrics,
}

impl RemoteQueue {
    /// FIFO queue named `name` holding at most `max_capacity` items
    /// (`<= 0` for unbounded).
    ///
    /// # Errors
    /// Returns [`QueueError::InvalidArgument`] if `name` is blank.
    pub fn new(
        store: Arc<dyn ListStore>,
        name: impl Into<String>,
        max_capacity: i64,
    ) -> Result<Self, QueueError> {
        Ok(Self {
            store,
            name: QueueName::new(name)?,
            capacity: Capacity::from_max(max_capacity),
            ordering: OrderingPolicy::Fifo,
            coordinator: WaitCoordinator::new(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)),
            metrics: QueueMetrics::new(),
        })
    }

    /// # Errors
    /// Returns [`QueueError::InvalidArgument`] if `name` is blank.
    pub fn fifo(
        store: Arc<dyn ListStore>,
        name: impl Into<String>,
        max_capacity: i64,
    ) -> Result<Self, QueueError> {
        Self::new(store, name, max_capacity)
    }

    /// # Errors
    /// Returns [`QueueError::InvalidArgument`] if `name` is blank.
    pub fn lifo(
        store: Arc<dyn ListStore>,
        name: impl Into<String>,
        max_capacity: i64,
    ) -> Result<Self, QueueError> {
        Ok(Self::new(store, name, max_capacity)?.with_ordering(OrderingPolicy::Lifo))
    }

    /// Queue described by a loaded [`QueueConfig`].
    ///
    /// # Errors
    /// Returns [`QueueError::InvalidArgument`] if the configured name is blank.
    pub fn from_config(store: Arc<dyn ListStore>, config: &QueueConfig) -> Result<Self, QueueError> {
        Ok(Self::new(store, config.name.clone(), config.max_capacity)?
            .with_ordering(config.ordering)
            .with_poll_interval(Duration::from_millis(config.poll_interval_ms)))
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    /// Upper bound on one local wait slice of a blocked `put`.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.coordinator = WaitCoordinator::new(poll_interval);
        self
    }

    pub fn name(&self) -> &QueueName {
        &self.name
    }

    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub const fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    pub const fn poll_interval(&self) -> Duration {
        self.coordinator.poll_interval()
    }

    pub fn metrics(&self) -> &QueueMetrics {
        &self.metrics
    }

    fn ledger(&self) -> CapacityLedger<'_> {
        CapacityLedger::new(self.store.as_ref(), self.name.as_str(), self.capacity)
    }

    /// Number of items in the remote list right now.
    ///
    /// # Errors
    /// Returns [`QueueError::StoreUnavailable`] if the store cannot answer.
    pub async fn size(&self) -> Result<u64, QueueError> {
        self.ledger().size().await
    }

    /// # Errors
    /// Returns [`QueueError::StoreUnavailable`] if the store cannot answer.
    pub async fn is_empty(&self) -> Result<bool, QueueError> {
        self.ledger().is_empty().await
    }

    /// # Errors
    /// Returns [`QueueError::StoreUnavailable`] if the store cannot answer.
    pub async fn is_full(&self) -> Result<bool, QueueError> {
        self.ledger().is_full().await
    }

    /// Append `item` at the tail.
    ///
    /// # Errors
    /// - [`QueueError::Full`] for a non-blocking put into a full queue
    /// - [`QueueError::Timeout`] if space did not appear before the timeout
    /// - [`QueueError::StoreUnavailable`] if the store fails
    pub async fn put(&self, item: &str, mode: BlockMode) -> Result<(), QueueError> {
        self.put_inner(item, mode, None).await
    }

    /// [`put`](Self::put) that gives up with [`QueueError::Cancelled`] when
    /// `cancel` fires. A cancelled put has not written anything.
    ///
    /// # Errors
    /// As [`put`](Self::put), plus [`QueueError::Cancelled`].
    pub async fn put_cancellable(
        &self,
        item: &str,
        mode: BlockMode,
        cancel: &CancellationToken,
    ) -> Result<(), QueueError> {
        self.put_inner(item, mode, Some(cancel)).await
    }

    /// Remove one item from the end selected by the ordering policy.
    ///
    /// # Errors
    /// - [`QueueError::Empty`] for a non-blocking get on an empty queue
    /// - [`QueueError::Timeout`] if nothing arrived before the timeout
    /// - [`QueueError::StoreUnavailable`] if the store fails
    pub async fn get(&self, mode: BlockMode) -> Result<String, QueueError> {
        self.get_inner(mode, None).await
    }

    /// [`get`](Self::get) that gives up with [`QueueError::Cancelled`] when
    /// `cancel` fires. A cancelled get has not removed anything.
    ///
    /// While waiting, the store is polled in slices of at most the poll
    /// interval, so cancellation is observed within one slice.
    ///
    /// # Errors
    /// As [`get`](Self::get), plus [`QueueError::Cancelled`].
    pub async fn get_cancellable(
        &self,
        mode: BlockMode,
        cancel: &CancellationToken,
    ) -> Result<String, QueueError> {
        self.get_inner(mode, Some(cancel)).await
    }

    /// `put` taking the classic `(block, timeout_secs)` pair.
    ///
    /// The arguments are validated before the store is touched.
    ///
    /// # Errors
    /// [`QueueError::InvalidArgument`] for a negative or NaN timeout, else
    /// as [`put`](Self::put).
    pub async fn put_with_flags(
        &self,
        item: &str,
        block: bool,
        timeout_secs: Option<f64>,
    ) -> Result<(), QueueError> {
        let mode = BlockMode::from_flags(block, timeout_secs)?;
        self.put(item, mode).await
    }

    /// `get` taking the classic `(block, timeout_secs)` pair.
    ///
    /// # Errors
    /// [`QueueError::InvalidArgument`] for a negative or NaN timeout, else
    /// as [`get`](Self::get).
    pub async fn get_with_flags(
        &self,
        block: bool,
        timeout_secs: Option<f64>,
    ) -> Result<String, QueueError> {
        let mode = BlockMode::from_flags(block, timeout_secs)?;
        self.get(mode).await
    }

    #[instrument(skip(self, item, cancel), fields(queue = %self.name))]
    async fn put_inner(
        &self,
        item: &str,
        mode: BlockMode,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), QueueError> {
        let started = Instant::now();
        let deadline = match mode {
            BlockMode::NonBlocking => {
                self.check_cancelled(cancel, "put")?;
                if self.ledger().is_full().await? {
                    self.metrics.record_full();
                    debug!(capacity = %self.capacity, "put rejected, queue full");
                    return Err(QueueError::Full { capacity: self.capacity.limit().unwrap_or(0) });
                }
                return self.append(item).await;
            }
            BlockMode::Blocking => Deadline::never(),
            BlockMode::Timeout(timeout) => Deadline::after(timeout),
        };

        loop {
            self.check_cancelled(cancel, "put")?;
            let space_freed = self.coordinator.listen();
            if !self.ledger().is_full().await? {
                return self.append(item).await;
            }
            if deadline.is_expired() {
                self.metrics.record_timeout();
                debug!(waited = ?started.elapsed(), "put timed out");
                return Err(QueueError::Timeout { operation: "put", waited: started.elapsed() });
            }

            self.metrics.record_wait_slice();
            let woke = self.coordinator.wait_for_space(space_freed, &deadline, cancel).await;
            if woke == WakeReason::Cancelled {
                return Err(self.cancelled("put"));
            }
        }
    }

    async fn append(&self, item: &str) -> Result<(), QueueError> {
        let len = self.store.append(self.name.as_str(), item).await?;
        self.metrics.record_put();
        debug!(queue = %self.name, len, "item appended");
        Ok(())
    }

    #[instrument(skip(self, cancel), fields(queue = %self.name, ordering = %self.ordering))]
    async fn get_inner(
        &self,
        mode: BlockMode,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, QueueError> {
        let started = Instant::now();
        let end = self.ordering.pop_end();
        let deadline = match mode {
            BlockMode::NonBlocking => {
                self.check_cancelled(cancel, "get")?;
                // A pop that loses a race to another consumer is still "empty".
                return match self.store.pop(self.name.as_str(), end, StoreWait::Poll).await? {
                    Some(item) => Ok(self.popped(item)),
                    None => {
                        self.metrics.record_empty();
                        Err(QueueError::Empty)
                    }
                };
            }
            BlockMode::Blocking => Deadline::never(),
            BlockMode::Timeout(timeout) => Deadline::after(timeout),
        };

        loop {
            self.check_cancelled(cancel, "get")?;
            let wait = self.store_wait(&deadline, cancel.is_some());
            if let Some(item) = self.store.pop(self.name.as_str(), end, wait).await? {
                return Ok(self.popped(item));
            }
            if deadline.is_expired() {
                self.metrics.record_timeout();
                debug!(waited = ?started.elapsed(), "get timed out");
                return Err(QueueError::Timeout { operation: "get", waited: started.elapsed() });
            }
        }
    }

    /// Remote wait for the next pop attempt.
    ///
    /// Cancellable calls wait in poll-interval slices; the in-flight pop is
    /// never abandoned, so an item is either returned or left in the list.
    fn store_wait(&self, deadline: &Deadline, sliced: bool) -> StoreWait {
        match (deadline.remaining(), sliced) {
            (None, false) => StoreWait::Indefinitely,
            (None, true) => StoreWait::For(self.coordinator.poll_interval()),
            (Some(left), _) if left.is_zero() => StoreWait::Poll,
            (Some(left), false) => StoreWait::For(left),
            (Some(left), true) => StoreWait::For(left.min(self.coordinator.poll_interval())),
        }
    }

    fn popped(&self, item: String) -> String {
        self.metrics.record_get();
        self.coordinator.notify_space_freed();
        debug!(queue = %self.name, end = %self.ordering.pop_end(), "item popped");
        item
    }

    fn check_cancelled(
        &self,
        cancel: Option<&CancellationToken>,
        operation: &'static str,
    ) -> Result<(), QueueError> {
        match cancel {
            Some(token) if token.is_cancelled() => Err(self.cancelled(operation)),
            _ => Ok(()),
        }
    }

    fn cancelled(&self, operation: &'static str) -> QueueError {
        self.metrics.record_cancellation();
        debug!(queue = %self.name, operation, "operation cancelled");
        QueueError::Cancelled { operation }
    }
}

impl fmt::Debug for RemoteQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteQueue")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("ordering", &self.ordering)
            .field("poll_interval", &self.coordinator.poll_interval())
            .finish_non_exhaustive()
    }
}
