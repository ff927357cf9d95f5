//! Proxy pool service - hands out and takes back proxy endpoints

use std::sync::Arc;

use proxyq_domain::{AcquireConfig, BlockMode, PoolConfig, ProxyEndpoint};
use rand::seq::SliceRandom;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::queue::{QueueError, RemoteQueue};

/// What [`ProxyPool::retire_or_requeue`] did with a proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyDisposition {
    /// Put back into the queue with its retry count bumped.
    Requeued { retry_count: u32 },
    /// Dropped after exceeding the retry limit.
    Retired { retry_count: u32 },
}

/// Proxy pool shared by the workers of one process
pub struct ProxyPool {
    queue: Arc<RemoteQueue>,
    standby: Vec<ProxyEndpoint>,
    max_proxy_retries: u32,
    acquire_mode: BlockMode,
}

impl ProxyPool {
    /// Create a pool over `queue`.
    ///
    /// # Errors
    /// Returns [`QueueError::InvalidArgument`] for a malformed standby entry
    /// or a negative acquire timeout.
    pub fn new(
        queue: Arc<RemoteQueue>,
        pool: &PoolConfig,
        acquire: &AcquireConfig,
    ) -> Result<Self, QueueError> {
        let standby = pool.standby_proxies()?;
        if standby.is_empty() {
            warn!(queue = %queue.name(), "no standby proxies configured");
        }
        Ok(Self {
            queue,
            standby,
            max_proxy_retries: pool.max_proxy_retries,
            acquire_mode: acquire.mode()?,
        })
    }

    pub fn queue(&self) -> &Arc<RemoteQueue> {
        &self.queue
    }

    /// Blocking mode configured for callers that do not choose one.
    pub const fn acquire_mode(&self) -> BlockMode {
        self.acquire_mode
    }

    pub fn standby(&self) -> &[ProxyEndpoint] {
        &self.standby
    }

    /// Take a proxy from the queue.
    ///
    /// # Errors
    /// [`QueueError::Empty`] or [`QueueError::Timeout`] when no proxy is
    /// available; a store or decoding failure otherwise.
    pub async fn acquire(&self, mode: BlockMode) -> Result<ProxyEndpoint, QueueError> {
        let item = self.queue.get(mode).await?;
        Self::decode(&item)
    }

    /// [`acquire`](Self::acquire) that stops when `cancel` fires.
    ///
    /// # Errors
    /// As [`acquire`](Self::acquire), plus [`QueueError::Cancelled`].
    pub async fn acquire_cancellable(
        &self,
        mode: BlockMode,
        cancel: &CancellationToken,
    ) -> Result<ProxyEndpoint, QueueError> {
        let item = self.queue.get_cancellable(mode, cancel).await?;
        Self::decode(&item)
    }

    /// Return a proxy to the queue.
    ///
    /// # Errors
    /// [`QueueError::Full`] for a non-blocking release into a full queue,
    /// [`QueueError::Timeout`] for a timed one; a store failure otherwise.
    pub async fn release(&self, proxy: &ProxyEndpoint, mode: BlockMode) -> Result<(), QueueError> {
        let item = proxy.to_item()?;
        self.queue.put(&item, mode).await
    }

    /// Take a proxy from the queue, or a random standby proxy when the queue
    /// has none to give.
    ///
    /// # Errors
    /// [`QueueError::Empty`]/[`QueueError::Timeout`] when the queue is
    /// exhausted and no standby proxies are configured; any other queue
    /// error is returned unchanged.
    #[instrument(skip(self), fields(queue = %self.queue.name()))]
    pub async fn acquire_or_standby(&self, mode: BlockMode) -> Result<ProxyEndpoint, QueueError> {
        match self.acquire(mode).await {
            Err(err @ (QueueError::Empty | QueueError::Timeout { .. })) => {
                let Some(proxy) = self.standby.choose(&mut rand::thread_rng()) else {
                    return Err(err);
                };
                debug!(proxy = %proxy, reason = %err, "falling back to standby proxy");
                Ok(proxy.clone())
            }
            other => other,
        }
    }

    /// Record a failed use of `proxy`, then either put it back (non-blocking)
    /// or drop it once it has failed more than the configured number of times.
    ///
    /// # Errors
    /// [`QueueError::Full`] if the proxy should be requeued but the queue is
    /// full; a store failure otherwise.
    #[instrument(skip(self, proxy), fields(proxy = %proxy))]
    pub async fn retire_or_requeue(
        &self,
        mut proxy: ProxyEndpoint,
    ) -> Result<ProxyDisposition, QueueError> {
        let retry_count = proxy.record_retry();
        if retry_count > self.max_proxy_retries {
            warn!(retry_count, max = self.max_proxy_retries, "retiring proxy");
            return Ok(ProxyDisposition::Retired { retry_count });
        }
        self.release(&proxy, BlockMode::NonBlocking).await?;
        debug!(retry_count, "proxy requeued");
        Ok(ProxyDisposition::Requeued { retry_count })
    }

    fn decode(item: &str) -> Result<ProxyEndpoint, QueueError> {
        ProxyEndpoint::from_item(item).map_err(|err| {
            warn!(error = %err, "dropping undecodable queue item");
            QueueError::from(err)
        })
    }
}
