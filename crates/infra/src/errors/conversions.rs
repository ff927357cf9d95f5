//! Conversions from external infrastructure errors into port errors.

#[cfg(feature = "redis")]
use proxyq_core::StoreError;
#[cfg(feature = "redis")]
use redis::{ErrorKind, RedisError};

/// Map a client library error onto [`StoreError`], tagged with the command
/// that produced it.
#[cfg(feature = "redis")]
pub trait IntoStoreError {
    fn into_store_error(self, command: &'static str) -> StoreError;
}

/* -------------------------------------------------------------------------- */
/* redis::RedisError → StoreError */
/* -------------------------------------------------------------------------- */

#[cfg(feature = "redis")]
impl IntoStoreError for RedisError {
    fn into_store_error(self, command: &'static str) -> StoreError {
        if self.is_connection_refusal()
            || self.is_connection_dropped()
            || self.is_io_error()
            || self.is_timeout()
        {
            return StoreError::Connection(format!("{command}: {self}"));
        }

        match self.kind() {
            ErrorKind::TypeError => StoreError::Protocol(format!("{command}: {self}")),
            ErrorKind::AuthenticationFailed | ErrorKind::InvalidClientConfig => {
                StoreError::Connection(format!("{command}: {self}"))
            }
            _ => StoreError::Command { command, message: self.to_string() },
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
