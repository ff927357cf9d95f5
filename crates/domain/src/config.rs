//! Configuration structures

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_MAX_CAPACITY, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_PROXY_RETRY_TIMES, DEFAULT_QUEUE_NAME, DEFAULT_STORE_URL,
    RECOMMENDED_MAX_ACQUIRE_TIMEOUT_SECS,
};
use crate::{BlockMode, OrderingPolicy, ProxyEndpoint, ProxyQError, QueueName, Result};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub queue: QueueConfig,
    #[serde(default)]
    pub acquire: AcquireConfig,
    #[serde(default)]
    pub pool: PoolConfig,
}

/// Remote list store connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

/// Queue identity, bound and ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub name: String,
    /// `<= 0` means unbounded.
    pub max_capacity: i64,
    #[serde(default)]
    pub ordering: OrderingPolicy,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Default blocking behaviour for `acquire`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcquireConfig {
    #[serde(default)]
    pub block: bool,
    #[serde(default)]
    pub timeout_secs: Option<f64>,
}

/// Proxy pool behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// `host:port[:user:pass]` entries used when the queue has nothing to give.
    #[serde(default)]
    pub standby: Vec<String>,
    #[serde(default = "default_proxy_retry_times")]
    pub max_proxy_retries: u32,
}

const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

const fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

const fn default_proxy_retry_times() -> u32 {
    DEFAULT_PROXY_RETRY_TIMES
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { url: DEFAULT_STORE_URL.to_string(), connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_QUEUE_NAME.to_string(),
            max_capacity: DEFAULT_MAX_CAPACITY,
            ordering: OrderingPolicy::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { standby: Vec::new(), max_proxy_retries: DEFAULT_PROXY_RETRY_TIMES }
    }
}

impl QueueConfig {
    /// Validated queue key.
    ///
    /// # Errors
    /// Returns [`ProxyQError::InvalidInput`] for a blank name.
    pub fn queue_name(&self) -> Result<QueueName> {
        QueueName::new(self.name.clone())
    }
}

impl AcquireConfig {
    /// Blocking mode used by `acquire` when the caller does not pick one.
    ///
    /// # Errors
    /// Returns [`ProxyQError::InvalidInput`] for a negative or NaN timeout.
    pub fn mode(&self) -> Result<BlockMode> {
        BlockMode::from_flags(self.block, self.timeout_secs)
    }
}

impl PoolConfig {
    /// Parse the standby list.
    ///
    /// # Errors
    /// Returns [`ProxyQError::InvalidInput`] naming the first malformed entry.
    pub fn standby_proxies(&self) -> Result<Vec<ProxyEndpoint>> {
        self.standby.iter().map(|entry| entry.parse()).collect()
    }
}

impl Config {
    /// Reject configurations the queue cannot run with.
    ///
    /// # Errors
    /// Returns [`ProxyQError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.store.url.trim().is_empty() {
            return Err(ProxyQError::Config("store.url must not be empty".to_string()));
        }
        if self.queue.poll_interval_ms == 0 {
            return Err(ProxyQError::Config("queue.poll_interval_ms must be non-zero".to_string()));
        }
        self.queue.queue_name().map_err(|e| ProxyQError::Config(format!("queue.name: {e}")))?;
        self.acquire.mode().map_err(|e| ProxyQError::Config(format!("acquire: {e}")))?;
        self.pool.standby_proxies().map_err(|e| ProxyQError::Config(format!("pool.standby: {e}")))?;
        Ok(())
    }

    /// Settings that are legal but probably unintended.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.pool.standby.is_empty() {
            warnings.push(
                "pool.standby is empty; acquire_or_standby fails when the queue is empty"
                    .to_string(),
            );
        }
        if self.acquire.block {
            match self.acquire.timeout_secs {
                None => warnings.push(
                    "acquire blocks without a timeout; workers stall while the queue is empty"
                        .to_string(),
                ),
                Some(secs) if secs > RECOMMENDED_MAX_ACQUIRE_TIMEOUT_SECS => warnings.push(format!(
                    "acquire.timeout_secs = {secs} exceeds {RECOMMENDED_MAX_ACQUIRE_TIMEOUT_SECS}s; \
                     workers stall while the queue is empty"
                )),
                Some(_) => {}
            }
        }
        warnings
    }
}
