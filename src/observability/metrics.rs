//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Hierarchy operation counters.
///
/// Relaxed ordering throughout; counters are independent of each other.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    promotions: AtomicU64,
    demotions: AtomicU64,
    role_removals: AtomicU64,
    transfers: AtomicU64,
    /// Nodes moved by transfers, cascaded or direct
    subordinates_moved: AtomicU64,
    /// Mutations rejected by validation, lookup, or cycle checks
    mutations_rejected: AtomicU64,
    /// Mutations aborted by the store
    mutations_failed: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_promotions(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_demotions(&self) {
        self.demotions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_role_removals(&self) {
        self.role_removals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_transfers(&self) {
        self.transfers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_subordinates_moved(&self, count: u64) {
        self.subordinates_moved.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.mutations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.mutations_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            promotions: self.promotions.load(Ordering::Relaxed),
            demotions: self.demotions.load(Ordering::Relaxed),
            role_removals: self.role_removals.load(Ordering::Relaxed),
            transfers: self.transfers.load(Ordering::Relaxed),
            subordinates_moved: self.subordinates_moved.load(Ordering::Relaxed),
            mutations_rejected: self.mutations_rejected.load(Ordering::Relaxed),
            mutations_failed: self.mutations_failed.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub promotions: u64,
    pub demotions: u64,
    pub role_removals: u64,
    pub transfers: u64,
    pub subordinates_moved: u64,
    pub mutations_rejected: u64,
    pub mutations_failed: u64,
}
