//! Integration tests for queue-facing domain types
//!
//! Covers the item format written into the remote list and a fully populated
//! configuration document, the two shapes other processes share with us.

use std::time::Duration;

use proxyq_domain::{
    BlockMode, Capacity, Config, ListEnd, OrderingPolicy, ProxyEndpoint, ProxyQError, QueueName,
};

// ============================================================================
// Queue item format
// ============================================================================

/// Validates the JSON document a producer writes for a proxy
///
/// Scenario: another worker reads the raw list item and expects named fields
#[test]
fn test_proxy_item_document_shape() {
    let proxy: ProxyEndpoint = "10.0.0.1:8080:alice:s3:cret".parse().unwrap();
    let item = proxy.to_item().unwrap();

    let doc: serde_json::Value = serde_json::from_str(&item).unwrap();
    assert_eq!(doc["host"], "10.0.0.1");
    assert_eq!(doc["port"], 8080);
    assert_eq!(doc["credentials"], "alice:s3:cret");
    assert_eq!(doc["retry_count"], 0);
}

/// Validates that items written without optional fields still decode
///
/// Scenario: a minimal producer pushes only host and port
#[test]
fn test_minimal_item_decodes_with_defaults() {
    let proxy = ProxyEndpoint::from_item(r#"{"host":"proxy.internal","port":3128}"#).unwrap();
    assert_eq!(proxy.address(), "proxy.internal:3128");
    assert_eq!(proxy.credentials, None);
    assert_eq!(proxy.retry_count, 0);
    assert_eq!(proxy.proxy_url(), "http://proxy.internal:3128");
}

/// Validates that retry counts survive a trip through the list
///
/// Scenario: a worker bumps the count before handing the proxy back
#[test]
fn test_retry_count_travels_with_item() {
    let mut proxy = ProxyEndpoint::new("10.0.0.2", 80).unwrap();
    proxy.record_retry();
    proxy.record_retry();

    let decoded = ProxyEndpoint::from_item(&proxy.to_item().unwrap()).unwrap();
    assert_eq!(decoded.retry_count, 2);
    assert_eq!(decoded, proxy);
}

/// Validates that foreign items are rejected rather than misread
#[test]
fn test_foreign_items_are_serialization_errors() {
    for raw in ["10.0.0.1:8080", "", r#"{"host":"x"}"#, r#"{"host":"x","port":70000}"#] {
        assert!(
            matches!(ProxyEndpoint::from_item(raw), Err(ProxyQError::Serialization(_))),
            "accepted {raw:?}"
        );
    }
}

// ============================================================================
// Queue shape
// ============================================================================

/// Validates the pop end chosen by each ordering policy
///
/// Scenario: pushes always land at the tail, so FIFO pops the head and LIFO
/// pops the tail
#[test]
fn test_ordering_policies_against_push_end() {
    assert_eq!(ListEnd::PUSH, ListEnd::Tail);
    assert_ne!(OrderingPolicy::Fifo.pop_end(), ListEnd::PUSH);
    assert_eq!(OrderingPolicy::Lifo.pop_end(), ListEnd::PUSH);
}

/// Validates the fullness rule at and around the bound
#[test]
fn test_capacity_fullness_boundaries() {
    let two = Capacity::from_max(2);
    assert!(!two.is_reached_by(1));
    assert!(two.is_reached_by(2));
    assert!(two.is_reached_by(5));

    for max in [0, -1, i64::MIN] {
        let unbounded = Capacity::from_max(max);
        assert!(!unbounded.is_bounded());
        assert!(!unbounded.is_reached_by(u64::MAX));
    }
}

/// Validates blocking flags the way callers pass them
#[test]
fn test_block_mode_from_caller_flags() {
    assert_eq!(BlockMode::from_flags(false, Some(3.0)).unwrap(), BlockMode::NonBlocking);
    assert_eq!(BlockMode::from_flags(true, None).unwrap(), BlockMode::Blocking);
    assert_eq!(
        BlockMode::from_flags(true, Some(0.5)).unwrap().timeout(),
        Some(Duration::from_millis(500))
    );
    assert!(matches!(
        BlockMode::from_flags(true, Some(-0.1)),
        Err(ProxyQError::InvalidInput(_))
    ));
}

/// Validates queue name rules
#[test]
fn test_queue_names() {
    assert_eq!(QueueName::new("crawler:proxies").unwrap().as_str(), "crawler:proxies");
    assert!(QueueName::new("").is_err());
    assert!(QueueName::new("   ").is_err());
}

// ============================================================================
// Configuration document
// ============================================================================

/// Validates a fully populated TOML configuration
///
/// Scenario: operator deploys a LIFO pool with standby proxies and a short
/// blocking acquire
#[test]
fn test_full_config_document() {
    let config: Config = toml::from_str(
        r#"
[store]
url = "redis://cache:6379/2"
connect_timeout_ms = 750

[queue]
name = "crawler:proxies"
max_capacity = 50
ordering = "lifo"
poll_interval_ms = 25

[acquire]
block = true
timeout_secs = 0.3

[pool]
standby = ["192.168.1.10:3128", "192.168.1.11:3128:bob:pw"]
max_proxy_retries = 5
"#,
    )
    .unwrap();

    config.validate().unwrap();
    assert!(config.warnings().is_empty());

    assert_eq!(config.store.connect_timeout_ms, 750);
    assert_eq!(config.queue.queue_name().unwrap().as_str(), "crawler:proxies");
    assert_eq!(config.queue.ordering, OrderingPolicy::Lifo);
    assert_eq!(config.acquire.mode().unwrap(), BlockMode::Timeout(Duration::from_millis(300)));

    let standby = config.pool.standby_proxies().unwrap();
    assert_eq!(standby.len(), 2);
    assert_eq!(standby[1].credentials.as_deref(), Some("bob:pw"));
    assert_eq!(config.pool.max_proxy_retries, 5);
}

/// Validates that an unknown ordering is rejected when the document loads
#[test]
fn test_unknown_ordering_is_rejected() {
    let parsed = toml::from_str::<Config>(
        r#"
[store]
url = "memory://"

[queue]
name = "q"
max_capacity = 1
ordering = "random"
"#,
    );
    assert!(parsed.is_err());
}
