//! # Blocklist Service
//!
//! The record store and match engine behind every public operation.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `BlockedNumberWriter` and `BlockedNumberReader` (`store`)
//! 2. Implements `MembershipCheck` with the tiered matcher (`matcher`)
//! 3. Keeps every write inside one atomic batch under the write lock
//! 4. Notifies observers after the lock is released
//! 5. Uses dependency injection for persistence, encoding, country
//!    detection and change notification

mod keys;
mod matcher;
mod normalizer;
mod store;

pub use normalizer::Normalizer;

use crate::adapters::{BincodeRecordSerializer, FileBackedKVStore, InMemoryKVStore};
use crate::domain::config::{BlocklistConfig, StorageBackend};
use crate::domain::record::BlockedNumber;
use crate::error::{BlocklistError, Result};
use crate::metrics::Metrics;
use crate::ports::outbound::{CountryDetector, KeyValueStore, RecordSerializer};
use blocklist_bus::ChangePublisher;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// The blocked number store.
///
/// All operations are synchronous. Share it across threads behind an `Arc`.
pub struct BlocklistService {
    /// Key-value store, guarded for consistent snapshots.
    pub(crate) kv_store: RwLock<Box<dyn KeyValueStore>>,
    /// Record encoding.
    pub(crate) serializer: Arc<dyn RecordSerializer>,
    /// Country-aware normalizer.
    pub(crate) normalizer: Normalizer,
    /// Change notification port.
    pub(crate) publisher: Arc<dyn ChangePublisher>,
    /// Operation counters.
    pub(crate) metrics: Metrics,
}

/// Dependencies for BlocklistService
pub struct BlocklistDependencies {
    pub kv_store: Box<dyn KeyValueStore>,
    pub serializer: Arc<dyn RecordSerializer>,
    pub country_detector: Arc<dyn CountryDetector>,
    pub publisher: Arc<dyn ChangePublisher>,
}

impl BlocklistDependencies {
    /// In-memory store with bincode encoding.
    pub fn in_memory(
        country_detector: Arc<dyn CountryDetector>,
        publisher: Arc<dyn ChangePublisher>,
    ) -> Self {
        Self {
            kv_store: Box::new(InMemoryKVStore::new()),
            serializer: Arc::new(BincodeRecordSerializer),
            country_detector,
            publisher,
        }
    }
}

impl BlocklistService {
    /// Create a service from explicit dependencies.
    ///
    /// # Errors
    ///
    /// `BlocklistError::Config` if `config` fails validation. The storage
    /// backend named in `config` is ignored here; `deps.kv_store` is used.
    pub fn new(deps: BlocklistDependencies, config: &BlocklistConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            kv_store: RwLock::new(deps.kv_store),
            serializer: deps.serializer,
            normalizer: Normalizer::new(deps.country_detector)
                .with_fallback_country(config.fallback_country_iso.clone()),
            publisher: deps.publisher,
            metrics: Metrics::new(),
        })
    }

    /// In-memory service with default configuration.
    pub fn in_memory(
        country_detector: Arc<dyn CountryDetector>,
        publisher: Arc<dyn ChangePublisher>,
    ) -> Self {
        Self {
            kv_store: RwLock::new(Box::new(InMemoryKVStore::new())),
            serializer: Arc::new(BincodeRecordSerializer),
            normalizer: Normalizer::new(country_detector),
            publisher,
            metrics: Metrics::new(),
        }
    }

    /// Create a service on the storage backend named in `config`.
    ///
    /// # Errors
    ///
    /// - `Config` if validation fails
    /// - `Storage` if the store file is locked, unreadable or corrupt
    pub fn open(
        config: &BlocklistConfig,
        country_detector: Arc<dyn CountryDetector>,
        publisher: Arc<dyn ChangePublisher>,
    ) -> Result<Self> {
        config.validate()?;

        let kv_store: Box<dyn KeyValueStore> = match &config.storage {
            StorageBackend::InMemory => Box::new(InMemoryKVStore::new()),
            StorageBackend::File { path } => Box::new(FileBackedKVStore::open(path)?),
        };

        info!(storage = ?config.storage, "Blocklist store opened");

        Self::new(
            BlocklistDependencies {
                kv_store,
                serializer: Arc::new(BincodeRecordSerializer),
                country_detector,
                publisher,
            },
            config,
        )
    }

    /// Operation counters.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// The normalizer used for inserts and lookups.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub(crate) fn decode(&self, bytes: &[u8]) -> Result<BlockedNumber> {
        self.serializer
            .deserialize(bytes)
            .map_err(BlocklistError::Serialization)
    }

    pub(crate) fn encode(&self, record: &BlockedNumber) -> Result<Vec<u8>> {
        self.serializer
            .serialize(record)
            .map_err(BlocklistError::Serialization)
    }

    /// Tell observers the record set changed. Call only after the write
    /// lock has been released.
    pub(crate) fn notify_changed(&self) {
        let receivers = self.publisher.notify_changed();
        tracing::debug!(receivers, "Observers notified");
    }
}
