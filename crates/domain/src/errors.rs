//! Error types used throughout the domain layer

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main domain error type for proxyq
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ProxyQError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for domain operations
pub type Result<T> = std::result::Result<T, ProxyQError>;
