//! Error types for the blocked number store

use crate::domain::config::ConfigError;
use crate::domain::filter::FilterError;
use thiserror::Error;

/// Errors from store operations.
///
/// Every error is reported synchronously and leaves no partial state behind.
#[derive(Debug, Error)]
pub enum BlocklistError {
    /// Missing or malformed input, or a field the caller may not supply.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A uniqueness rule rejected the write.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Selection text rejected by the filter parser.
    #[error("Malformed selection: {0}")]
    Backend(#[from] FilterError),

    #[error("{0}")]
    Unsupported(String),

    #[error("Storage error: {0}")]
    Storage(#[from] KVStoreError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Category of a [`BlocklistError`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    ConstraintViolation,
    Backend,
    Unsupported,
    Storage,
    Serialization,
    Config,
}

impl BlocklistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlocklistError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            BlocklistError::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            BlocklistError::Backend(_) => ErrorKind::Backend,
            BlocklistError::Unsupported(_) => ErrorKind::Unsupported,
            BlocklistError::Storage(_) => ErrorKind::Storage,
            BlocklistError::Serialization(_) => ErrorKind::Serialization,
            BlocklistError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        BlocklistError::InvalidArgument(message.into())
    }
}

/// Key-value store errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },

    /// Another process holds the store's lock file.
    #[error("Store already in use ({path})")]
    Locked { path: String },
}

impl From<std::io::Error> for KVStoreError {
    fn from(err: std::io::Error) -> Self {
        KVStoreError::IOError {
            message: err.to_string(),
        }
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, BlocklistError>;
