//! Time utilities
//!
//! - **[`deadline`]**: absolute deadlines with remaining-time slicing for
//!   bounded waits

pub mod deadline;

// Re-export commonly used items
pub use deadline::Deadline;
