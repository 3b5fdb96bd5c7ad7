//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the store requires from its host: persistence, record
//! encoding and the current-country capability. Change notification goes
//! through [`blocklist_bus::ChangePublisher`].

use crate::domain::record::BlockedNumber;
use crate::error::KVStoreError;

/// Key/value pairs returned by a prefix scan, in key order.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Abstract interface for key-value persistence.
///
/// Production: `FileBackedKVStore`
/// Testing: `InMemoryKVStore`
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either all operations in the batch are applied, or none are.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// All entries whose key starts with `prefix`, ordered by key.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

/// Abstract interface for record encoding.
pub trait RecordSerializer: Send + Sync {
    /// Serialize a record to bytes.
    fn serialize(&self, record: &BlockedNumber) -> Result<Vec<u8>, String>;

    /// Deserialize bytes to a record.
    fn deserialize(&self, data: &[u8]) -> Result<BlockedNumber, String>;
}

/// Reports the region the device is currently in.
///
/// Injected into the store at construction; the store never looks the
/// country up on its own.
pub trait CountryDetector: Send + Sync {
    /// ISO 3166-1 alpha-2 code, or `None` when unavailable.
    fn current_country_iso(&self) -> Option<String>;
}
