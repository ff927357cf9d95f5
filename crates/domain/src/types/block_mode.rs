//! Per-call blocking policy for queue operations

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ProxyQError, Result};

/// How `put`/`get` behave when they cannot complete immediately.
///
/// Supplied on every call; a queue has no persistent mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockMode {
    /// Fail at once with an empty/full error.
    NonBlocking,
    /// Wait until the operation can complete.
    #[default]
    Blocking,
    /// Wait at most the given duration, then fail with a timeout.
    Timeout(Duration),
}

impl BlockMode {
    /// Timeout mode from fractional seconds.
    ///
    /// Infinite timeouts (or ones too large for a [`Duration`]) become
    /// [`BlockMode::Blocking`].
    ///
    /// # Errors
    /// Returns [`ProxyQError::InvalidInput`] if `secs` is negative or NaN.
    pub fn timeout_secs(secs: f64) -> Result<Self> {
        if secs.is_nan() || secs < 0.0 {
            return Err(ProxyQError::InvalidInput(format!(
                "timeout must be a non-negative number, got {secs}"
            )));
        }
        Ok(Duration::try_from_secs_f64(secs).map_or(Self::Blocking, Self::Timeout))
    }

    /// Map the classic `(block, timeout)` pair onto a mode.
    ///
    /// `block = false` ignores the timeout entirely.
    ///
    /// # Errors
    /// Returns [`ProxyQError::InvalidInput`] for a negative or NaN timeout
    /// when blocking.
    pub fn from_flags(block: bool, timeout_secs: Option<f64>) -> Result<Self> {
        match (block, timeout_secs) {
            (false, _) => Ok(Self::NonBlocking),
            (true, None) => Ok(Self::Blocking),
            (true, Some(secs)) => Self::timeout_secs(secs),
        }
    }

    /// Returns `true` for modes that may suspend the caller.
    #[must_use]
    pub const fn may_block(&self) -> bool {
        !matches!(self, Self::NonBlocking)
    }

    /// The timeout, if this mode has one.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        match self {
            Self::Timeout(timeout) => Some(*timeout),
            _ => None,
        }
    }
}
