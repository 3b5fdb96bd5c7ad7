//! # Adapters Module
//!
//! Concrete implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `storage`: in-memory and file-backed key-value stores
//! - `lock`: exclusive lock guarding a store file
//! - `serializer`: bincode record encoding
//! - `country`: country detector implementations

pub mod country;
pub mod lock;
pub mod serializer;
pub mod storage;

pub use country::{EnvCountryDetector, FixedCountryDetector, NoCountryDetector};
pub use lock::StoreLock;
pub use serializer::BincodeRecordSerializer;
pub use storage::{FileBackedKVStore, InMemoryKVStore};
