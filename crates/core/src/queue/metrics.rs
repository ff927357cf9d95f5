use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde::{Deserialize, Serialize};

/// Per-handle queue counters
///
/// Counts what this handle observed; other processes sharing the remote
/// list keep their own.
#[derive(Debug, Default)]
pub struct QueueMetrics {
    pub total_puts: AtomicU64,
    pub total_gets: AtomicU64,
    pub full_rejections: AtomicU64,
    pub empty_rejections: AtomicU64,
    pub timeouts: AtomicU64,
    pub cancellations: AtomicU64,
    pub wait_slices: AtomicU64,
}

impl QueueMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_put(&self) {
        self.total_puts.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_get(&self) {
        self.total_gets.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_full(&self) {
        self.full_rejections.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_empty(&self) {
        self.empty_rejections.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_cancellation(&self) {
        self.cancellations.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Record one local wait slice spent by a blocked producer
    pub fn record_wait_slice(&self) {
        self.wait_slices.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Get a snapshot of metrics
    pub fn snapshot(&self) -> QueueMetricsSnapshot {
        QueueMetricsSnapshot {
            total_puts: self.total_puts.load(AtomicOrdering::Relaxed),
            total_gets: self.total_gets.load(AtomicOrdering::Relaxed),
            full_rejections: self.full_rejections.load(AtomicOrdering::Relaxed),
            empty_rejections: self.empty_rejections.load(AtomicOrdering::Relaxed),
            timeouts: self.timeouts.load(AtomicOrdering::Relaxed),
            cancellations: self.cancellations.load(AtomicOrdering::Relaxed),
            wait_slices: self.wait_slices.load(AtomicOrdering::Relaxed),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        for counter in [
            &self.total_puts,
            &self.total_gets,
            &self.full_rejections,
            &self.empty_rejections,
            &self.timeouts,
            &self.cancellations,
            &self.wait_slices,
        ] {
            counter.store(0, AtomicOrdering::Relaxed);
        }
    }
}

/// Immutable metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMetricsSnapshot {
    pub total_puts: u64,
    pub total_gets: u64,
    pub full_rejections: u64,
    pub empty_rejections: u64,
    pub timeouts: u64,
    pub cancellations: u64,
    pub wait_slices: u64,
}
