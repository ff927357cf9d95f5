//! # proxyq Domain
//!
//! Business domain types for the remote-backed proxy queue.
//!
//! This crate contains:
//! - Proxy resource representation (`ProxyEndpoint`)
//! - Queue vocabulary (`BlockMode`, `OrderingPolicy`, `Capacity`, `QueueName`)
//! - Configuration structures
//! - Domain error types and Result definitions
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other proxyq crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
