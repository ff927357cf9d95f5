//! Domain types and models

pub mod block_mode;
pub mod proxy;
pub mod queue;

pub use block_mode::BlockMode;
pub use proxy::ProxyEndpoint;
pub use queue::{Capacity, ListEnd, OrderingPolicy, QueueName};
