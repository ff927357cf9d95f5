//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! The loaded configuration is validated, and legal-but-suspicious settings
//! are logged as warnings.
//!
//! ## Environment Variables
//! - `PROXYQ_STORE_URL`: Store URL (`redis://...` or `memory://`) - required
//! - `PROXYQ_QUEUE_NAME`: Key of the remote list - required
//! - `PROXYQ_QUEUE_MAX_CAPACITY`: Maximum items, `<= 0` for unbounded - required
//! - `PROXYQ_STORE_CONNECT_TIMEOUT_MS`: Connect timeout (default 5000)
//! - `PROXYQ_QUEUE_ORDERING`: `fifo` or `lifo` (default `fifo`)
//! - `PROXYQ_QUEUE_POLL_INTERVAL_MS`: Producer re-poll interval (default 100)
//! - `PROXYQ_ACQUIRE_BLOCK`: Whether acquire blocks (true/false, default false)
//! - `PROXYQ_ACQUIRE_TIMEOUT_SECS`: Blocking acquire timeout in seconds
//! - `PROXYQ_STANDBY_PROXIES`: Comma separated `host:port[:user:pass]` list
//! - `PROXYQ_PROXY_RETRY_TIMES`: Failed uses before a proxy is retired
//!   (default 3)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./proxyq.json` or `./proxyq.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use proxyq_domain::constants::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PROXY_RETRY_TIMES,
};
use proxyq_domain::{
    AcquireConfig, Config, PoolConfig, ProxyQError, QueueConfig, Result, StoreConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ProxyQError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
/// - The loaded configuration fails validation
pub fn load() -> Result<Config> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };
    checked(config)
}

/// Validate `config` and log its warnings.
///
/// # Errors
/// Returns `ProxyQError::Config` if validation fails.
pub fn checked(config: Config) -> Result<Config> {
    config.validate()?;
    for warning in config.warnings() {
        tracing::warn!("{warning}");
    }
    Ok(config)
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing.
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `ProxyQError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let url = env_var("PROXYQ_STORE_URL")?;
    let name = env_var("PROXYQ_QUEUE_NAME")?;
    let max_capacity = env_parse::<i64>("PROXYQ_QUEUE_MAX_CAPACITY", "max capacity")?;

    let connect_timeout_ms =
        env_parse_or("PROXYQ_STORE_CONNECT_TIMEOUT_MS", "connect timeout", DEFAULT_CONNECT_TIMEOUT_MS)?;
    let ordering = env_parse_or("PROXYQ_QUEUE_ORDERING", "ordering", Default::default())?;
    let poll_interval_ms =
        env_parse_or("PROXYQ_QUEUE_POLL_INTERVAL_MS", "poll interval", DEFAULT_POLL_INTERVAL_MS)?;

    let block = env_bool("PROXYQ_ACQUIRE_BLOCK", false);
    let timeout_secs = std::env::var("PROXYQ_ACQUIRE_TIMEOUT_SECS")
        .ok()
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .map_err(|e| ProxyQError::Config(format!("Invalid acquire timeout: {}", e)))
        })
        .transpose()?;

    let standby = std::env::var("PROXYQ_STANDBY_PROXIES")
        .map(|s| {
            s.split(',').map(str::trim).filter(|e| !e.is_empty()).map(String::from).collect()
        })
        .unwrap_or_default();
    let max_proxy_retries =
        env_parse_or("PROXYQ_PROXY_RETRY_TIMES", "proxy retry times", DEFAULT_PROXY_RETRY_TIMES)?;

    Ok(Config {
        store: StoreConfig { url, connect_timeout_ms },
        queue: QueueConfig { name, max_capacity, ordering, poll_interval_ms },
        acquire: AcquireConfig { block, timeout_secs },
        pool: PoolConfig { standby, max_proxy_retries },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `ProxyQError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ProxyQError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ProxyQError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ProxyQError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `ProxyQError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ProxyQError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ProxyQError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ProxyQError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./proxyq.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("proxyq.json"),
        dir.join("proxyq.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `ProxyQError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        ProxyQError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse a required environment variable.
fn env_parse<T>(key: &str, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key).and_then(|s| {
        s.trim().parse::<T>().map_err(|e| ProxyQError::Config(format!("Invalid {what}: {e}")))
    })
}

/// Parse an optional environment variable, falling back to `default` when
/// unset. A set-but-malformed value is an error.
fn env_parse_or<T>(key: &str, what: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(_) => env_parse(key, what),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Returns
/// The parsed boolean value, or `default` if not set.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
