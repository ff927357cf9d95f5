//! Local wake-up signal with bounded waits
//!
//! A [`Signal`] lets tasks in one process park until either another local
//! task announces a state change, a wait slice elapses, or the caller's
//! [`CancellationToken`] fires. It never observes changes made by other
//! processes; callers must re-check the authoritative state after every wake,
//! whatever the [`WakeReason`].

use std::pin::Pin;
use std::time::Duration;

use tokio::sync::futures::Notified;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Why a call to [`Signal::wait_for`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    /// Another local task called [`Signal::notify_waiters`].
    Notified,
    /// The wait slice elapsed without a local notification.
    Elapsed,
    /// The caller's cancellation token fired.
    Cancelled,
}

/// Broadcast wake-up signal shared by the tasks of a single handle.
#[derive(Debug, Default)]
pub struct Signal {
    notify: Notify,
}

impl Signal {
    /// Create a new signal with no waiters.
    #[must_use]
    pub fn new() -> Self {
        Self { notify: Notify::new() }
    }

    /// Wake every task parked in [`wait_for`](Self::wait_for) and every
    /// outstanding [`Listener`].
    ///
    /// Listeners registered afterwards are not affected.
    pub fn notify_waiters(&self) {
        self.notify.notify_waiters();
    }

    /// Register for the next notification without waiting yet.
    ///
    /// Take the listener *before* re-checking the state it guards: a
    /// notification sent between the check and the wait is then kept.
    pub fn listen(&self) -> Listener<'_> {
        let mut notified = Box::pin(self.notify.notified());
        notified.as_mut().enable();
        Listener { notified }
    }

    /// Park for at most `slice`.
    ///
    /// Shorthand for `self.listen().wait_for(slice, cancel)`; only sees
    /// notifications sent after the call.
    pub async fn wait_for(
        &self,
        slice: Duration,
        cancel: Option<&CancellationToken>,
    ) -> WakeReason {
        self.listen().wait_for(slice, cancel).await
    }
}

/// A registration for the next [`Signal::notify_waiters`] call.
#[derive(Debug)]
pub struct Listener<'a> {
    notified: Pin<Box<Notified<'a>>>,
}

impl Listener<'_> {
    /// Park for at most `slice`, unless a notification already arrived
    /// since [`Signal::listen`].
    ///
    /// A zero `slice` still yields to the runtime once and reports
    /// [`WakeReason::Elapsed`] when nothing else is ready. Cancellation takes
    /// priority when several events are ready at once.
    pub async fn wait_for(
        mut self,
        slice: Duration,
        cancel: Option<&CancellationToken>,
    ) -> WakeReason {
        let reason = tokio::select! {
            biased;
            () = cancelled(cancel) => WakeReason::Cancelled,
            () = self.notified.as_mut() => WakeReason::Notified,
            () = tokio::time::sleep(slice) => WakeReason::Elapsed,
        };
        trace!(?reason, ?slice, "signal wait finished");
        reason
    }
}

/// Resolves when `token` fires; never resolves without a token.
pub async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending::<()>().await,
    }
}
