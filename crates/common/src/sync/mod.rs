//! Synchronization primitives for waiting on state that lives elsewhere
//!
//! ## Submodules
//!
//! - **`signal`**: a local wake-up signal combined with a bounded wait slice
//!   and optional cooperative cancellation. Used where the authoritative state
//!   is remote and a local notification can only ever be a hint.

pub mod signal;

pub use signal::{cancelled, Listener, Signal, WakeReason};
