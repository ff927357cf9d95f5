//! Redis list store
//!
//! Non-blocking commands (`RPUSH`, `LPOP`/`RPOP`, `LLEN`) share one
//! auto-reconnecting [`ConnectionManager`]. Blocking pops (`BLPOP`/`BRPOP`)
//! park the connection they run on, so each one checks out a dedicated
//! connection from a small idle stack and returns it afterwards. At most
//! [`MAX_BLOCKING_CONNECTIONS`] blocking pops run at once; further pops wait
//! for a slot, and that wait counts against their timeout.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use proxyq_core::{ListStore, StoreError, StoreResult, StoreWait};
use proxyq_domain::{ListEnd, StoreConfig};
use redis::aio::{ConnectionManager, MultiplexedConnection};
use redis::Client;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, info};

use crate::errors::IntoStoreError;

/// Smallest blocking timeout sent to the server. Redis reads a timeout of 0
/// as "forever", so sub-millisecond waits are rounded up.
const MIN_BLOCKING_TIMEOUT: Duration = Duration::from_millis(1);

/// Idle blocking connections kept for reuse.
const MAX_IDLE_BLOCKING_CONNECTIONS: usize = 8;

/// Blocking pops allowed in flight per store, and so dedicated connections
/// open at once. A pop that cannot get a slot before its timeout falls back
/// to a single non-blocking pop.
pub const MAX_BLOCKING_CONNECTIONS: usize = 32;

/// Bounds concurrent blocking pops.
#[derive(Debug)]
struct BlockingSlots {
    permits: Semaphore,
}

impl BlockingSlots {
    fn new(limit: usize) -> Self {
        Self { permits: Semaphore::new(limit) }
    }

    /// Wait for a slot for at most `timeout` (`None` waits forever).
    ///
    /// Returns the slot and the part of `timeout` left for the pop itself,
    /// or `None` if no slot freed up in time.
    async fn enter(
        &self,
        timeout: Option<Duration>,
    ) -> StoreResult<Option<(SemaphorePermit<'_>, Option<Duration>)>> {
        let Some(timeout) = timeout else {
            return Ok(Some((self.acquire().await?, None)));
        };
        let started = tokio::time::Instant::now();
        match tokio::time::timeout(timeout, self.acquire()).await {
            Ok(permit) => Ok(Some((permit?, Some(timeout.saturating_sub(started.elapsed()))))),
            Err(_) => Ok(None),
        }
    }

    async fn acquire(&self) -> StoreResult<SemaphorePermit<'_>> {
        self.permits
            .acquire()
            .await
            .map_err(|_| StoreError::Connection("blocking connection slots closed".to_string()))
    }
}

/// [`ListStore`] backed by Redis lists.
pub struct RedisListStore {
    client: Client,
    manager: ConnectionManager,
    idle_blocking: Mutex<Vec<MultiplexedConnection>>,
    blocking_slots: BlockingSlots,
    connect_timeout: Duration,
}

impl RedisListStore {
    /// Connect using a [`StoreConfig`].
    ///
    /// # Errors
    /// Returns [`StoreError::Connection`] if the URL is invalid or the server
    /// cannot be reached within the connect timeout.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        Self::connect_url(&config.url, Duration::from_millis(config.connect_timeout_ms)).await
    }

    /// # Errors
    /// Returns [`StoreError::Connection`] if the URL is invalid or the server
    /// cannot be reached within `connect_timeout`.
    pub async fn connect_url(url: &str, connect_timeout: Duration) -> StoreResult<Self> {
        let client = Client::open(url).map_err(|e| e.into_store_error("CONNECT"))?;
        let manager = tokio::time::timeout(connect_timeout, ConnectionManager::new(client.clone()))
            .await
            .map_err(|_| connect_timed_out(connect_timeout))?
            .map_err(|e| e.into_store_error("CONNECT"))?;

        info!(addr = %client.get_connection_info().addr, "connected to redis");
        Ok(Self {
            client,
            manager,
            idle_blocking: Mutex::new(Vec::new()),
            blocking_slots: BlockingSlots::new(MAX_BLOCKING_CONNECTIONS),
            connect_timeout,
        })
    }

    async fn checkout_blocking(&self) -> StoreResult<MultiplexedConnection> {
        if let Some(conn) = self.idle_blocking.lock().pop() {
            return Ok(conn);
        }
        debug!("opening blocking redis connection");
        tokio::time::timeout(self.connect_timeout, self.client.get_multiplexed_async_connection())
            .await
            .map_err(|_| connect_timed_out(self.connect_timeout))?
            .map_err(|e| e.into_store_error("CONNECT"))
    }

    fn checkin_blocking(&self, conn: MultiplexedConnection) {
        let mut idle = self.idle_blocking.lock();
        if idle.len() < MAX_IDLE_BLOCKING_CONNECTIONS {
            idle.push(conn);
        }
    }

    async fn pop_now(&self, key: &str, end: ListEnd) -> StoreResult<Option<String>> {
        let command = match end {
            ListEnd::Head => "LPOP",
            ListEnd::Tail => "RPOP",
        };
        let mut conn = self.manager.clone();
        let item: Option<String> = redis::cmd(command)
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| e.into_store_error(command))?;
        Ok(item)
    }

    async fn pop_blocking(
        &self,
        key: &str,
        end: ListEnd,
        timeout: Option<Duration>,
    ) -> StoreResult<Option<String>> {
        let command = match end {
            ListEnd::Head => "BLPOP",
            ListEnd::Tail => "BRPOP",
        };
        let Some((_slot, timeout)) = self.blocking_slots.enter(timeout).await? else {
            debug!(key, "no blocking connection slot before timeout");
            return self.pop_now(key, end).await;
        };
        if timeout.is_some_and(|left| left.is_zero()) {
            return self.pop_now(key, end).await;
        }

        let mut cmd = redis::cmd(command);
        cmd.arg(key).arg(blocking_timeout_arg(timeout));

        let mut conn = self.checkout_blocking().await?;
        let reply: redis::RedisResult<Option<(String, String)>> = cmd.query_async(&mut conn).await;
        match reply {
            Ok(popped) => {
                self.checkin_blocking(conn);
                Ok(popped.map(|(_key, item)| item))
            }
            // Drop the connection: it may be in an unknown state.
            Err(err) => Err(err.into_store_error(command)),
        }
    }
}

/// Timeout argument for `BLPOP`/`BRPOP`, in fractional seconds.
///
/// `None` waits forever (`0`).
fn blocking_timeout_arg(timeout: Option<Duration>) -> f64 {
    match timeout {
        Some(timeout) => timeout.max(MIN_BLOCKING_TIMEOUT).as_secs_f64(),
        None => 0.0,
    }
}

fn connect_timed_out(timeout: Duration) -> StoreError {
    StoreError::Connection(format!("timed out after {timeout:?} connecting to redis"))
}

#[async_trait]
impl ListStore for RedisListStore {
    async fn append(&self, key: &str, item: &str) -> StoreResult<u64> {
        let mut conn = self.manager.clone();
        let len: u64 = redis::cmd("RPUSH")
            .arg(key)
            .arg(item)
            .query_async(&mut conn)
            .await
            .map_err(|e| e.into_store_error("RPUSH"))?;
        Ok(len)
    }

    async fn pop(&self, key: &str, end: ListEnd, wait: StoreWait) -> StoreResult<Option<String>> {
        match wait {
            StoreWait::Poll => self.pop_now(key, end).await,
            StoreWait::For(limit) if limit.is_zero() => self.pop_now(key, end).await,
            StoreWait::For(limit) => self.pop_blocking(key, end, Some(limit)).await,
            StoreWait::Indefinitely => self.pop_blocking(key, end, None).await,
        }
    }

    async fn length(&self, key: &str) -> StoreResult<u64> {
        let mut conn = self.manager.clone();
        let len: u64 = redis::cmd("LLEN")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| e.into_store_error("LLEN"))?;
        Ok(len)
    }
}

impl fmt::Debug for RedisListStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisListStore")
            .field("addr", &self.client.get_connection_info().addr)
            .field("idle_blocking", &self.idle_blocking.lock().len())
            .field("blocking_slots_free", &self.blocking_slots.permits.available_permits())
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indefinite_wait_is_zero_seconds() {
        assert_eq!(blocking_timeout_arg(None), 0.0);
    }

    #[test]
    fn fractional_timeouts_are_preserved() {
        assert!((blocking_timeout_arg(Some(Duration::from_millis(500))) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn sub_millisecond_timeouts_never_become_forever() {
        let arg = blocking_timeout_arg(Some(Duration::from_micros(10)));
        assert!(arg > 0.0);
        assert!((arg - 0.001).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn blocking_slots_cap_concurrent_pops() {
        let slots = BlockingSlots::new(1);
        let held = slots.enter(None).await.unwrap();
        assert!(held.is_some());

        let started = std::time::Instant::now();
        let second = slots.enter(Some(Duration::from_millis(50))).await.unwrap();
        assert!(second.is_none());
        assert!(started.elapsed() >= Duration::from_millis(50));

        drop(held);
        let (_slot, left) = slots.enter(Some(Duration::from_secs(1))).await.unwrap().unwrap();
        assert!(left.unwrap() > Duration::from_millis(900));
    }

    #[tokio::test]
    async fn waiting_for_a_slot_uses_up_the_timeout() {
        let slots = BlockingSlots::new(1);
        let held = slots.permits.try_acquire().unwrap();
        let release = async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            drop(held);
        };

        let (entered, ()) = tokio::join!(slots.enter(Some(Duration::from_secs(1))), release);
        let (_slot, left) = entered.unwrap().unwrap();
        assert!(left.unwrap() <= Duration::from_millis(900));
    }

    #[tokio::test]
    async fn invalid_url_is_a_connection_error() {
        let err = RedisListStore::connect_url("not a url", Duration::from_millis(100)).await.unwrap_err();
        assert!(matches!(err, StoreError::Connection(_)));
    }
}
