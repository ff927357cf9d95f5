//! Error conversions for infrastructure adapters

pub mod conversions;

#[cfg(feature = "redis")]
pub use conversions::IntoStoreError;
