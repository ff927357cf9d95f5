//! Common error types and classification shared by every proxyq crate
//!
//! The error handling system is built on three pieces:
//!
//! 1. **`CommonError`**: cross-cutting failures (configuration and
//!    serialization) that more than one layer needs to report.
//!
//! 2. **`ErrorClassification` trait**: a standard interface that tells callers
//!    whether a failure is worth retrying and how loudly to report it. The
//!    queue itself never retries; classification exists so that the request
//!    pipeline sitting above it can make that decision.
//!
//! 3. **`ErrorSeverity` enum**: a unified severity scale for logging.
//!
//! ## Composition
//!
//! Module-specific errors compose with `CommonError` rather than duplicating
//! its variants:
//!
//! ```rust,ignore
//! #[derive(Debug, thiserror::Error)]
//! pub enum PoolError {
//!     #[error("no standby proxies configured")]
//!     NoStandby,
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//!
//! impl_error_classification!(PoolError, Common,
//!     Self::NoStandby => {
//!         retryable: false,
//!         severity: ErrorSeverity::Warning,
//!         critical: false,
//!     }
//! );
//! ```
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Empty queue, full queue |
//! | **Warning** | Degraded but operational | Timeouts, cancellations |
//! | **Error** | Failure requiring attention | Store unreachable, bad config |
//! | **Critical** | Invariant violated | Internal errors |

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Failures that more than one layer needs to report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization or deserialization errors
    #[error("Serialization error ({format}): {message}")]
    Serialization { message: String, format: String },
}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl CommonError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a serialization error with format information
    pub fn serialization_format<S: Into<String>, F: Into<String>>(format: F, message: S) -> Self {
        Self::Serialization { message: message.into(), format: format.into() }
    }
}

/// Error classification trait for consistent error handling across modules
///
/// Lets the layer that owns retry policy decide what to do with a failure
/// without matching on every concrete error type.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient conditions that may succeed if the
    /// operation is attempted again, such as a full queue or a dropped
    /// connection.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

// Standard conversions from common error types
impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_format("JSON", err.to_string())
    }
}

/// Utility macro for creating error conversions from std types
///
/// Generates `From<serde_json::Error>` for a module-specific error enum that
/// embeds `CommonError` in the given variant. `From<CommonError>` itself is
/// expected to come from `#[from]` on that variant.
///
/// ```rust,ignore
/// #[derive(Debug, thiserror::Error)]
/// pub enum MyError {
///     #[error(transparent)]
///     Common(#[from] CommonError),
/// }
///
/// impl_error_conversion!(MyError, Common);
/// ```
#[macro_export]
macro_rules! impl_error_conversion {
    ($error_type:ty, $variant:ident) => {
        impl From<serde_json::Error> for $error_type {
            fn from(err: serde_json::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }
    };
}

/// Macro to implement ErrorClassification by delegating to CommonError
///
/// Module-specific variants list their classification inline; the embedded
/// `CommonError` variant delegates.
///
/// ```rust,ignore
/// impl_error_classification!(MyError, Common,
///     Self::Specific(_) => {
///         retryable: false,
///         severity: ErrorSeverity::Error,
///         critical: false,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_error_classification {
    (
        $error_type:ty,
        $common_variant:ident
        $(,
            $variant:pat => {
                retryable: $retryable:expr,
                severity: $severity:expr,
                critical: $critical:expr
                $(, retry_after: $retry_after:expr)?
                $(,)?
            }
        )*
        $(,)?
    ) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn is_retryable(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_retryable(e),
                    $(
                        $variant => $retryable,
                    )*
                }
            }

            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::severity(e),
                    $(
                        $variant => $severity,
                    )*
                }
            }

            fn is_critical(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_critical(e),
                    $(
                        $variant => $critical,
                    )*
                }
            }

            fn retry_after(&self) -> Option<std::time::Duration> {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::retry_after(e),
                    $(
                        $(
                            $variant => $retry_after,
                        )?
                    )*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    //! Unit tests for error handling functionality

    use super::*;

    #[test]
    fn test_error_config_display() {
        let err = CommonError::config("missing store url");
        assert_eq!(err.to_string(), "Configuration error: missing store url");
        assert!(!err.is_retryable());
        assert!(!err.is_critical());
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_serde_json_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let err = CommonError::from(parse_err);
        assert!(matches!(err, CommonError::Serialization { ref format, .. } if format == "JSON"));
        assert!(err.to_string().starts_with("Serialization error (JSON): "));
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }
}
