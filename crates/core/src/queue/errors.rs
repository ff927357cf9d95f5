use std::time::Duration;

use proxyq_common::error::{CommonError, ErrorSeverity};
use proxyq_common::{impl_error_classification, impl_error_conversion};
use proxyq_domain::ProxyQError;
use thiserror::Error;

use super::ports::StoreError;

/// Queue operation errors
///
/// `Empty`, `Full` and `Timeout` are expected outcomes of non-blocking and
/// bounded calls, not faults; callers branch on them.
#[derive(Debug, Error)]
pub enum QueueError {
    // Common errors handled by CommonError (Serialization, Config, Validation)
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("queue is empty")]
    Empty,

    #[error("queue is full (capacity {capacity})")]
    Full { capacity: u64 },

    #[error("{operation} timed out after {waited:?}")]
    Timeout { operation: &'static str, waited: Duration },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("{operation} cancelled")]
    Cancelled { operation: &'static str },
}

impl QueueError {
    /// Returns `true` for the outcomes a non-blocking or bounded call is
    /// expected to produce when the queue cannot serve it right now.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Empty | Self::Full { .. } | Self::Timeout { .. })
    }
}

impl From<ProxyQError> for QueueError {
    fn from(err: ProxyQError) -> Self {
        match err {
            ProxyQError::InvalidInput(message) => Self::InvalidArgument(message),
            ProxyQError::Serialization(message) => {
                Self::Common(CommonError::serialization_format("json", message))
            }
            ProxyQError::Config(message) => Self::Common(CommonError::config(message)),
        }
    }
}

// Auto-convert std types via CommonError
impl_error_conversion!(QueueError, Common);

impl_error_classification!(QueueError, Common,
    Self::Empty => {
        retryable: true,
        severity: ErrorSeverity::Info,
        critical: false,
    },
    Self::Full { .. } => {
        retryable: true,
        severity: ErrorSeverity::Info,
        critical: false,
        retry_after: Some(Duration::from_millis(100)),
    },
    Self::Timeout { .. } => {
        retryable: true,
        severity: ErrorSeverity::Warning,
        critical: false,
    },
    Self::InvalidArgument(_) => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::StoreUnavailable(_) => {
        retryable: true,
        severity: ErrorSeverity::Error,
        critical: false,
        retry_after: Some(Duration::from_secs(1)),
    },
    Self::Cancelled { .. } => {
        retryable: false,
        severity: ErrorSeverity::Info,
        critical: false,
    },
);
