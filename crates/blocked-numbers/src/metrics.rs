//! Operational counters for the blocked number store
//!
//! ## Usage
//!
//! ```ignore
//! let snapshot = service.metrics().snapshot();
//! println!("{}", serde_json::to_string_pretty(&snapshot)?);
//! ```

use crate::ports::inbound::MatchTier;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for store operations
///
/// Thread-safe counters, updated without taking the store lock.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Records inserted
    pub inserts: AtomicU64,
    /// Inserts rejected by validation or uniqueness
    pub inserts_rejected: AtomicU64,
    /// Rows removed by deletes
    pub rows_deleted: AtomicU64,
    /// Membership checks performed
    pub lookups: AtomicU64,
    /// Hits on the exact original-number tier
    pub hits_original: AtomicU64,
    /// Hits on the E.164 tier
    pub hits_e164: AtomicU64,
    /// Hits on the stripped-digits tier
    pub hits_stripped: AtomicU64,
    /// Membership checks that failed on storage errors
    pub lookup_errors: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_insert_rejected(&self) {
        self.inserts_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deleted(&self, rows: usize) {
        self.rows_deleted.fetch_add(rows as u64, Ordering::Relaxed);
    }

    /// Record a membership check and, if it hit, the tier that matched.
    pub fn record_lookup(&self, tier: Option<MatchTier>) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let counter = match tier {
            Some(MatchTier::OriginalNumber) => &self.hits_original,
            Some(MatchTier::E164Number) => &self.hits_e164,
            Some(MatchTier::StrippedNumber) => &self.hits_stripped,
            None => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup_error(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.lookup_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let hits_original = self.hits_original.load(Ordering::Relaxed);
        let hits_e164 = self.hits_e164.load(Ordering::Relaxed);
        let hits_stripped = self.hits_stripped.load(Ordering::Relaxed);

        MetricsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            inserts_rejected: self.inserts_rejected.load(Ordering::Relaxed),
            rows_deleted: self.rows_deleted.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            hits: hits_original + hits_e164 + hits_stripped,
            hits_original,
            hits_e164,
            hits_stripped,
            lookup_errors: self.lookup_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`Metrics`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub inserts: u64,
    pub inserts_rejected: u64,
    pub rows_deleted: u64,
    pub lookups: u64,
    pub hits: u64,
    pub hits_original: u64,
    pub hits_e164: u64,
    pub hits_stripped: u64,
    pub lookup_errors: u64,
}

impl MetricsSnapshot {
    /// Fraction of lookups that found a match
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}
