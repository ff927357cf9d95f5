//! # proxyq Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Redis list store (feature `redis`, on by default)
//! - In-memory list store
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements traits defined in `proxyq-core`
//! - Contains all "impure" code (network I/O, environment, files)

pub mod config;
pub mod errors;
pub mod store;

// Re-export commonly used items
pub use store::{open, InMemoryListStore};
#[cfg(feature = "redis")]
pub use store::RedisListStore;
