//! Ports layer - trait definitions for hexagonal architecture

pub mod inbound;
pub mod outbound;

pub use inbound::{
    BlockedNumberReader, BlockedNumberWriter, DeleteTarget, MatchResult, MatchTier,
    MembershipCheck, RecordCursor,
};
pub use outbound::{BatchOperation, CountryDetector, KeyValueStore, RecordSerializer, ScanResult};
