//! Absolute deadlines for bounded waits
//!
//! A [`Deadline`] is fixed once at the start of an operation and then queried
//! on every loop iteration, so repeated waits never extend the overall budget.

use std::time::{Duration, Instant};

/// Point in time after which a waiting operation must give up.
///
/// `Deadline::never()` models an indefinite wait. Timeouts too large to be
/// represented as an [`Instant`] are treated the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Deadline `timeout` from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self { at: Instant::now().checked_add(timeout) }
    }

    /// Deadline that never expires.
    #[must_use]
    pub const fn never() -> Self {
        Self { at: None }
    }

    /// Returns `true` if this deadline can expire.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.at.is_some()
    }

    /// Time left before expiry, or `None` for an unbounded deadline.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.at.map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Returns `true` once no time remains.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// Length of the next wait: the smaller of `max_slice` and the time left.
    ///
    /// Returns [`Duration::ZERO`] only when the deadline has expired.
    #[must_use]
    pub fn slice(&self, max_slice: Duration) -> Duration {
        match self.remaining() {
            Some(left) => left.min(max_slice),
            None => max_slice,
        }
    }
}
