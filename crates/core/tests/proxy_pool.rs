//! Proxy pool acquire/release/standby/retry behaviour.

mod support;

use std::sync::Arc;
use std::time::Duration;

use proxyq_core::{ProxyDisposition, ProxyPool, QueueError, RemoteQueue};
use proxyq_domain::{AcquireConfig, BlockMode, PoolConfig, ProxyEndpoint};
use support::RecordingStore;

const KEY: &str = "test:queue";

fn pool_with(max_capacity: i64, pool: &PoolConfig) -> (Arc<RecordingStore>, ProxyPool) {
    let (store, queue) = support::queue(max_capacity);
    let pool = ProxyPool::new(Arc::new(queue), pool, &AcquireConfig::default()).unwrap();
    (store, pool)
}

fn proxy(raw: &str) -> ProxyEndpoint {
    raw.parse().unwrap()
}

/// Validates the collaborator round trip: release then acquire.
#[tokio::test]
async fn release_then_acquire_round_trips_endpoint() {
    let (store, pool) = pool_with(10, &PoolConfig::default());
    let original = proxy("10.0.0.1:8080:alice:secret");

    pool.release(&original, BlockMode::NonBlocking).await.unwrap();
    assert_eq!(store.contents(KEY).len(), 1);

    let acquired = pool.acquire(BlockMode::NonBlocking).await.unwrap();
    assert_eq!(acquired, original);
    assert_eq!(acquired.authorization_header(), original.authorization_header());
}

/// Validates that release into a full pool reports `Full`.
#[tokio::test]
async fn release_into_full_pool_is_rejected() {
    let (_store, pool) = pool_with(1, &PoolConfig::default());
    pool.release(&proxy("a:1"), BlockMode::NonBlocking).await.unwrap();
    let err = pool.release(&proxy("b:2"), BlockMode::NonBlocking).await.unwrap_err();
    assert!(matches!(err, QueueError::Full { capacity: 1 }));
}

/// Validates that acquire on an empty pool reports `Empty` or `Timeout`.
#[tokio::test]
async fn acquire_on_empty_pool() {
    let (_store, pool) = pool_with(1, &PoolConfig::default());
    assert!(matches!(pool.acquire(BlockMode::NonBlocking).await, Err(QueueError::Empty)));
    assert!(matches!(
        pool.acquire(BlockMode::Timeout(Duration::from_millis(30))).await,
        Err(QueueError::Timeout { .. })
    ));
}

/// Validates the standby fallback when the queue is exhausted.
#[tokio::test]
async fn acquire_or_standby_falls_back_to_standby() {
    let config = PoolConfig {
        standby: vec!["192.168.1.1:3128".into(), "192.168.1.2:3128".into()],
        ..PoolConfig::default()
    };
    let (_store, pool) = pool_with(5, &config);

    let fallback = pool.acquire_or_standby(BlockMode::NonBlocking).await.unwrap();
    assert!(pool.standby().contains(&fallback));
}

/// Validates that queued proxies are preferred over standby ones.
#[tokio::test]
async fn acquire_or_standby_prefers_queue() {
    let config = PoolConfig { standby: vec!["192.168.1.1:3128".into()], ..PoolConfig::default() };
    let (_store, pool) = pool_with(5, &config);
    pool.release(&proxy("10.0.0.9:80"), BlockMode::NonBlocking).await.unwrap();

    assert_eq!(pool.acquire_or_standby(BlockMode::NonBlocking).await.unwrap(), proxy("10.0.0.9:80"));
}

/// Validates that without standby proxies the queue error is returned.
#[tokio::test]
async fn acquire_or_standby_without_standby_reports_empty() {
    let (_store, pool) = pool_with(5, &PoolConfig::default());
    assert!(matches!(pool.acquire_or_standby(BlockMode::NonBlocking).await, Err(QueueError::Empty)));
}

/// Validates that store failures are not masked by the standby fallback.
#[tokio::test]
async fn acquire_or_standby_propagates_store_failures() {
    let config = PoolConfig { standby: vec!["192.168.1.1:3128".into()], ..PoolConfig::default() };
    let (store, pool) = pool_with(5, &config);
    store.set_unavailable(true);
    assert!(matches!(
        pool.acquire_or_standby(BlockMode::NonBlocking).await,
        Err(QueueError::StoreUnavailable(_))
    ));
}

/// Validates the retry budget: requeue while within it, retire beyond it.
#[tokio::test]
async fn retire_or_requeue_honours_retry_budget() {
    let config = PoolConfig { max_proxy_retries: 2, ..PoolConfig::default() };
    let (store, pool) = pool_with(5, &config);

    let mut current = proxy("10.0.0.1:8080");
    for expected in 1..=2 {
        let disposition = pool.retire_or_requeue(current).await.unwrap();
        assert_eq!(disposition, ProxyDisposition::Requeued { retry_count: expected });
        current = pool.acquire(BlockMode::NonBlocking).await.unwrap();
        assert_eq!(current.retry_count, expected);
    }

    let disposition = pool.retire_or_requeue(current).await.unwrap();
    assert_eq!(disposition, ProxyDisposition::Retired { retry_count: 3 });
    assert!(store.contents(KEY).is_empty());
}

/// Validates that undecodable items surface as serialization errors.
#[tokio::test]
async fn garbage_items_are_reported() {
    let (store, pool) = pool_with(5, &PoolConfig::default());
    store.seed(KEY, &["not-a-proxy"]);
    assert!(matches!(pool.acquire(BlockMode::NonBlocking).await, Err(QueueError::Common(_))));
}

/// Validates the configured default acquire mode and config validation.
#[tokio::test]
async fn acquire_mode_comes_from_config() {
    let store = Arc::new(RecordingStore::default());
    let queue = Arc::new(RemoteQueue::new(store, KEY, 1).unwrap());

    let acquire = AcquireConfig { block: true, timeout_secs: Some(0.2) };
    let pool = ProxyPool::new(Arc::clone(&queue), &PoolConfig::default(), &acquire).unwrap();
    assert_eq!(pool.acquire_mode(), BlockMode::Timeout(Duration::from_millis(200)));

    let bad = AcquireConfig { block: true, timeout_secs: Some(-1.0) };
    assert!(matches!(
        ProxyPool::new(Arc::clone(&queue), &PoolConfig::default(), &bad),
        Err(QueueError::InvalidArgument(_))
    ));

    let bad_standby = PoolConfig { standby: vec!["oops".into()], ..PoolConfig::default() };
    assert!(ProxyPool::new(queue, &bad_standby, &AcquireConfig::default()).is_err());
}
