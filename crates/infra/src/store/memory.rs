//! In-process list store
//!
//! Useful for tests, local development (`memory://` store URLs) and single
//! process deployments. Clones share the same lists.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use proxyq_core::{ListStore, StoreResult, StoreWait};
use proxyq_domain::ListEnd;
use tokio::sync::Notify;
use tracing::trace;

#[derive(Debug, Default)]
struct Shared {
    lists: Mutex<HashMap<String, VecDeque<String>>>,
    appended: Notify,
}

/// [`ListStore`] kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryListStore {
    shared: Arc<Shared>,
}

impl InMemoryListStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn try_pop(&self, key: &str, end: ListEnd) -> Option<String> {
        let mut lists = self.shared.lists.lock();
        let list = lists.get_mut(key)?;
        let item = match end {
            ListEnd::Head => list.pop_front(),
            ListEnd::Tail => list.pop_back(),
        };
        if list.is_empty() {
            lists.remove(key);
        }
        item
    }

    /// Pop, waiting for appends; the pop and the emptiness check happen under
    /// one lock so a dropped wait never loses an element.
    async fn pop_waiting(&self, key: &str, end: ListEnd) -> String {
        loop {
            let appended = self.shared.appended.notified();
            tokio::pin!(appended);
            appended.as_mut().enable();
            if let Some(item) = self.try_pop(key, end) {
                return item;
            }
            appended.await;
        }
    }
}

#[async_trait]
impl ListStore for InMemoryListStore {
    async fn append(&self, key: &str, item: &str) -> StoreResult<u64> {
        let len = {
            let mut lists = self.shared.lists.lock();
            let list = lists.entry(key.to_string()).or_default();
            list.push_back(item.to_string());
            list.len() as u64
        };
        self.shared.appended.notify_waiters();
        trace!(key, len, "memory append");
        Ok(len)
    }

    async fn pop(&self, key: &str, end: ListEnd, wait: StoreWait) -> StoreResult<Option<String>> {
        Ok(match wait {
            StoreWait::Poll => self.try_pop(key, end),
            StoreWait::For(limit) if limit.is_zero() => self.try_pop(key, end),
            StoreWait::For(limit) => {
                tokio::time::timeout(limit, self.pop_waiting(key, end)).await.ok()
            }
            StoreWait::Indefinitely => Some(self.pop_waiting(key, end).await),
        })
    }

    async fn length(&self, key: &str) -> StoreResult<u64> {
        Ok(self.shared.lists.lock().get(key).map_or(0, |list| list.len() as u64))
    }
}
