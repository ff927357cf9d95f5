//! [`ListStore`] adapters
//!
//! | URL scheme | Adapter |
//! |---|---|
//! | `redis://`, `rediss://`, `redis+unix://` | [`RedisListStore`] (feature `redis`) |
//! | `memory://` | [`InMemoryListStore`] |

use std::sync::Arc;

use proxyq_core::{ListStore, StoreError, StoreResult};
use proxyq_domain::StoreConfig;

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis_list;

pub use memory::InMemoryListStore;
#[cfg(feature = "redis")]
pub use redis_list::RedisListStore;

/// Open the store named by `config.url`.
///
/// # Errors
/// Returns [`StoreError::Connection`] for an unsupported scheme or a failed
/// connection.
pub async fn open(config: &StoreConfig) -> StoreResult<Arc<dyn ListStore>> {
    let scheme = config.url.split_once("://").map_or("", |(scheme, _)| scheme);
    match scheme {
        "memory" => {
            tracing::warn!("using in-memory store; contents are not shared between processes");
            Ok(Arc::new(InMemoryListStore::new()))
        }
        #[cfg(feature = "redis")]
        "redis" | "rediss" | "redis+unix" | "unix" => {
            Ok(Arc::new(RedisListStore::connect(config).await?))
        }
        other => Err(StoreError::Connection(format!(
            "unsupported store scheme '{other}' in {}",
            config.url
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> StoreConfig {
        StoreConfig { url: url.to_string(), ..StoreConfig::default() }
    }

    #[tokio::test]
    async fn memory_scheme_opens_in_memory_store() {
        let store = open(&config("memory://")).await.unwrap();
        assert_eq!(store.append("k", "v").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_scheme_is_rejected() {
        let err = open(&config("postgres://localhost")).await.err().unwrap();
        assert!(matches!(err, StoreError::Connection(msg) if msg.contains("postgres")));
    }
}
