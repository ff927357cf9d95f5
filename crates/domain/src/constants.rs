//! Domain constants
//!
//! Defaults shared by configuration loading, the queue and the CLI.

/// Default key of the remote list holding the proxy pool.
pub const DEFAULT_QUEUE_NAME: &str = "proxyq:proxies";

/// Default maximum number of proxies held by the queue.
pub const DEFAULT_MAX_CAPACITY: i64 = 10;

/// Default upper bound on a single local wait slice while a producer waits
/// for capacity. Other processes cannot wake a local waiter, so this is also
/// the worst-case delay before a cross-process release is observed.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default number of failed uses a proxy survives before it is retired.
pub const DEFAULT_PROXY_RETRY_TIMES: u32 = 3;

/// Blocking acquire timeouts above this stall request concurrency; the
/// configuration loader warns when it is exceeded.
pub const RECOMMENDED_MAX_ACQUIRE_TIMEOUT_SECS: f64 = 0.5;

/// Default remote store endpoint.
pub const DEFAULT_STORE_URL: &str = "redis://127.0.0.1:6379";

/// Default connection timeout for the remote store.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Scheme used when rendering a proxy as a transport URL.
pub const PROXY_URL_SCHEME: &str = "http";
