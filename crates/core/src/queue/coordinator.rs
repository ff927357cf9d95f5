//! Local wait coordination for producers blocked on capacity
//!
//! Only tasks sharing one queue handle can wake each other. A release made
//! by another process is observed on the next re-poll, so the poll interval
//! bounds how stale a waiting producer's view can get.

use std::time::Duration;

use proxyq_common::time::Deadline;
use proxyq_common::{Listener, Signal, WakeReason};
use tokio_util::sync::CancellationToken;

/// Shortest allowed poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug)]
pub struct WaitCoordinator {
    signal: Signal,
    poll_interval: Duration,
}

impl WaitCoordinator {
    /// Coordinator re-polling at most every `poll_interval`.
    ///
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it so a waiting
    /// producer never spins.
    #[must_use]
    pub fn new(poll_interval: Duration) -> Self {
        Self { signal: Signal::new(), poll_interval: poll_interval.max(MIN_POLL_INTERVAL) }
    }

    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Register interest in freed space. Call before the capacity check
    /// so a local `get` completing during that check still wakes the caller.
    pub fn listen(&self) -> Listener<'_> {
        self.signal.listen()
    }

    /// Park for one slice: until a local consumer frees space (since
    /// `listener` was taken), the slice elapses, or `cancel` fires.
    ///
    /// The slice never runs past `deadline`. Callers must re-check the remote
    /// size after every return.
    pub async fn wait_for_space(
        &self,
        listener: Listener<'_>,
        deadline: &Deadline,
        cancel: Option<&CancellationToken>,
    ) -> WakeReason {
        listener.wait_for(deadline.slice(self.poll_interval), cancel).await
    }

    /// Announce that a local `get` removed an item.
    pub fn notify_space_freed(&self) {
        self.signal.notify_waiters();
    }
}
