//! Proxy endpoint resource shared through the queue

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::constants::PROXY_URL_SCHEME;
use crate::{ProxyQError, Result};

/// A proxy endpoint handed out to workers.
///
/// Travels through the queue as JSON; `retry_count` survives a round trip so
/// a worker that re-queues a flaky proxy carries its history with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
    /// `user:pass`, if the proxy requires authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    #[serde(default)]
    pub retry_count: u32,
}

impl ProxyEndpoint {
    /// Create an endpoint without credentials.
    ///
    /// # Errors
    /// Returns [`ProxyQError::InvalidInput`] if `host` is blank.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ProxyQError::InvalidInput("proxy host must not be empty".to_string()));
        }
        Ok(Self { host, port, credentials: None, retry_count: 0 })
    }

    /// Attach `user:pass` credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    /// `host:port`
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL suitable for an HTTP client's proxy setting.
    #[must_use]
    pub fn proxy_url(&self) -> String {
        format!("{PROXY_URL_SCHEME}://{}", self.address())
    }

    /// Value for the `Proxy-Authorization` header.
    ///
    /// Always a `Basic` scheme; the token is empty when there are no
    /// credentials.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let token = self.credentials.as_deref().map(|c| STANDARD.encode(c)).unwrap_or_default();
        format!("Basic {token}")
    }

    /// Count one more failed use of this proxy and return the new total.
    pub fn record_retry(&mut self) -> u32 {
        self.retry_count = self.retry_count.saturating_add(1);
        self.retry_count
    }

    /// Encode for transport through the queue.
    ///
    /// # Errors
    /// Returns [`ProxyQError::Serialization`] if encoding fails.
    pub fn to_item(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProxyQError::Serialization(e.to_string()))
    }

    /// Decode an item popped from the queue.
    ///
    /// # Errors
    /// Returns [`ProxyQError::Serialization`] if the item is not a valid
    /// endpoint document.
    pub fn from_item(item: &str) -> Result<Self> {
        serde_json::from_str(item).map_err(|e| ProxyQError::Serialization(e.to_string()))
    }
}

/// Parses `host:port` or `host:port:user:pass`.
///
/// The password may itself contain `:`.
impl FromStr for ProxyEndpoint {
    type Err = ProxyQError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut parts = s.splitn(4, ':');
        let invalid = || ProxyQError::InvalidInput(format!("invalid proxy '{s}', expected host:port[:user:pass]"));

        let host = parts.next().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
        let port = parts.next().and_then(|p| p.parse::<u16>().ok()).ok_or_else(invalid)?;
        let endpoint = Self::new(host, port)?;

        match (parts.next(), parts.next()) {
            (None, None) => Ok(endpoint),
            (Some(user), Some(pass)) if !user.is_empty() => {
                Ok(endpoint.with_credentials(format!("{user}:{pass}")))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
