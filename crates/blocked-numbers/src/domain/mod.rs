//! Domain layer for the blocked number store
//!
//! Pure logic with no I/O: records, normalization, country rules, row
//! filters, resource references and configuration.

pub mod config;
pub mod country;
pub mod filter;
pub mod normalizer;
pub mod record;
pub mod resource;

pub use config::{BlocklistConfig, ConfigError, StorageBackend, DEFAULT_NOTIFICATION_CAPACITY};
pub use country::CountryInfo;
pub use filter::{
    CompareOp, FilterError, Operand, Predicate, Value, MAX_FILTER_DEPTH, MAX_FILTER_TERMS,
};
pub use normalizer::{e164_index_key, normalize, strip, to_e164, NormalizedNumber};
pub use record::{BlockedNumber, Column, NewBlockedNumber, RecordId};
pub use resource::{RecordType, ResourceRef, CONTENT_TYPE_DIR, CONTENT_TYPE_ITEM};
