//! Recording in-memory `ListStore` for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use proxyq_core::{ListStore, StoreError, StoreResult, StoreWait};
use proxyq_domain::ListEnd;
use tokio::sync::Notify;

/// One call observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Append { key: String, item: String },
    Pop { key: String, end: ListEnd, wait: StoreWait },
    Length { key: String },
}

/// In-memory list store that records every call and can be switched off to
/// simulate an unreachable server.
#[derive(Debug, Default)]
pub struct RecordingStore {
    lists: Mutex<HashMap<String, VecDeque<String>>>,
    calls: Mutex<Vec<StoreCall>>,
    appended: Notify,
    unavailable: AtomicBool,
}

impl RecordingStore {
    /// Seed `key` with `items` (head first) without recording calls.
    pub fn seed(&self, key: &str, items: &[&str]) {
        self.lists
            .lock()
            .entry(key.to_string())
            .or_default()
            .extend(items.iter().map(|item| (*item).to_string()));
    }

    pub fn contents(&self, key: &str) -> Vec<String> {
        self.lists.lock().get(key).map(|list| list.iter().cloned().collect()).unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn appends(&self) -> usize {
        self.calls().iter().filter(|call| matches!(call, StoreCall::Append { .. })).count()
    }

    pub fn pops(&self) -> Vec<(ListEnd, StoreWait)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Pop { end, wait, .. } => Some((end, wait)),
                _ => None,
            })
            .collect()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self, command: &'static str) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Command { command, message: "connection reset".to_string() });
        }
        Ok(())
    }

    fn try_pop(&self, key: &str, end: ListEnd) -> Option<String> {
        let mut lists = self.lists.lock();
        let list = lists.get_mut(key)?;
        match end {
            ListEnd::Head => list.pop_front(),
            ListEnd::Tail => list.pop_back(),
        }
    }

    async fn pop_waiting(&self, key: &str, end: ListEnd, limit: Option<Duration>) -> Option<String> {
        let wait = async {
            loop {
                let appended = self.appended.notified();
                tokio::pin!(appended);
                appended.as_mut().enable();
                if let Some(item) = self.try_pop(key, end) {
                    return item;
                }
                appended.await;
            }
        };
        match limit {
            Some(limit) => tokio::time::timeout(limit, wait).await.ok(),
            None => Some(wait.await),
        }
    }
}

#[async_trait]
impl ListStore for RecordingStore {
    async fn append(&self, key: &str, item: &str) -> StoreResult<u64> {
        self.calls.lock().push(StoreCall::Append { key: key.to_string(), item: item.to_string() });
        self.check_available("RPUSH")?;
        let len = {
            let mut lists = self.lists.lock();
            let list = lists.entry(key.to_string()).or_default();
            list.push_back(item.to_string());
            list.len() as u64
        };
        self.appended.notify_waiters();
        Ok(len)
    }

    async fn pop(&self, key: &str, end: ListEnd, wait: StoreWait) -> StoreResult<Option<String>> {
        self.calls.lock().push(StoreCall::Pop { key: key.to_string(), end, wait });
        self.check_available("POP")?;
        Ok(match wait {
            StoreWait::Poll => self.try_pop(key, end),
            StoreWait::For(limit) if limit.is_zero() => self.try_pop(key, end),
            StoreWait::For(limit) => self.pop_waiting(key, end, Some(limit)).await,
            StoreWait::Indefinitely => self.pop_waiting(key, end, None).await,
        })
    }

    async fn length(&self, key: &str) -> StoreResult<u64> {
        self.calls.lock().push(StoreCall::Length { key: key.to_string() });
        self.check_available("LLEN")?;
        Ok(self.lists.lock().get(key).map_or(0, |list| list.len() as u64))
    }
}
