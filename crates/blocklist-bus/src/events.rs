//! # Change Events
//!
//! The single event kind that flows through the bus, plus observer identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event delivered to observers of the blocked number collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeEvent {
    /// At least one record was inserted or deleted.
    RecordsChanged,
}

/// Identity of a registered observer, used for explicit unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObserverId(pub u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}
