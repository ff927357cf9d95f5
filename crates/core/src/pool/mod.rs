//! Proxy pool built on the remote queue

pub mod service;

pub use service::{ProxyDisposition, ProxyPool};
