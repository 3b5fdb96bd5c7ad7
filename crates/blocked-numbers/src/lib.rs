//! # Blocked Number Store
//!
//! Persistent set of blocked phone numbers (or other sender addresses) with
//! punctuation- and country-aware membership testing.
//!
//! ## Architecture
//!
//! ```text
//! Collaborator ──paths, field maps──→ BlocklistProvider
//!                                          │
//!                                          ↓
//! Screening code ──MembershipCheck──→ BlocklistService ──→ KeyValueStore
//!                                          │   [one RwLock, atomic batches]
//!                                          ↓
//!                                  ChangePublisher (blocklist-bus)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Unique Originals | No two records share an `original_number` |
//! | 2 | Derived Fields | `id` and `stripped_number` are never caller-supplied |
//! | 3 | Monotonic Ids | Ids increase and are never reused |
//! | 4 | No Updates | Records are only inserted or deleted |
//! | 5 | Atomic Writes | A record and its index entries are written together |
//! | 6 | Notify After Commit | Observers hear about a change only once it is visible |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Records, normalization, country rules, filters, config
//! - `ports/` - Inbound capabilities and outbound storage/encoding traits
//! - `adapters/` - Key-value stores, file lock, bincode, country detectors
//! - `service/` - Record store and match engine
//! - `provider` - Loosely typed resource surface
//!
//! ## Usage
//!
//! ```ignore
//! use blocked_numbers::{BlocklistService, FixedCountryDetector, MembershipCheck};
//! use blocklist_bus::ChangeNotifier;
//!
//! let service = BlocklistService::in_memory(
//!     Arc::new(FixedCountryDetector::new("US")),
//!     Arc::new(ChangeNotifier::new()),
//! );
//! service.insert(NewBlockedNumber::new("+1-500-454-1111"))?;
//! assert!(service.is_blocked("500-454 1111"));
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod provider;
pub mod service;

// Re-export key types for convenience
pub use adapters::{
    BincodeRecordSerializer, EnvCountryDetector, FileBackedKVStore, FixedCountryDetector,
    InMemoryKVStore, NoCountryDetector, StoreLock,
};
pub use domain::{
    BlockedNumber, BlocklistConfig, Column, ConfigError, FilterError, NewBlockedNumber, Predicate,
    RecordId, RecordType, ResourceRef, StorageBackend, Value,
};
pub use error::{BlocklistError, ErrorKind, KVStoreError, Result};
pub use metrics::{Metrics, MetricsSnapshot};
pub use ports::inbound::{
    BlockedNumberReader, BlockedNumberWriter, DeleteTarget, MatchResult, MatchTier,
    MembershipCheck, RecordCursor,
};
pub use ports::outbound::{CountryDetector, KeyValueStore, RecordSerializer};
pub use provider::{BlocklistProvider, FieldValue, FieldValues};
pub use service::{BlocklistDependencies, BlocklistService, Normalizer};
