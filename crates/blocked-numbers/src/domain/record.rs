//! Blocked number record and its columns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// System-assigned record identifier.
///
/// Allocated in increasing order and never reused within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Raw numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the blocklist.
///
/// Records are immutable once stored: they are only ever created or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedNumber {
    /// Unique id assigned on insert.
    pub id: RecordId,
    /// Exact text the caller asked to block.
    pub original_number: String,
    /// E.164 form, supplied by the caller or derived on insert.
    pub e164_number: Option<String>,
    /// Digits of `original_number`, derived on insert.
    pub stripped_number: String,
}

/// Input for a typed insert.
///
/// There is no way to supply an id or a stripped number here; both are
/// always computed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlockedNumber {
    /// Text to block. Must be non-empty.
    pub original_number: String,
    /// Optional E.164 value stored verbatim instead of the derived one.
    pub e164_override: Option<String>,
}

impl NewBlockedNumber {
    pub fn new(original_number: impl Into<String>) -> Self {
        Self {
            original_number: original_number.into(),
            e164_override: None,
        }
    }

    /// Builder-style method to supply an explicit E.164 value.
    pub fn with_e164(mut self, e164: impl Into<String>) -> Self {
        self.e164_override = Some(e164.into());
        self
    }
}

/// Columns of the blocklist table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    OriginalNumber,
    E164Number,
    StrippedNumber,
}

impl Column {
    /// Every column, in table order.
    pub const ALL: [Column; 4] = [
        Column::Id,
        Column::OriginalNumber,
        Column::E164Number,
        Column::StrippedNumber,
    ];

    /// Column name as used in field maps and filter expressions.
    pub fn name(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::OriginalNumber => "original_number",
            Column::E164Number => "e164_number",
            Column::StrippedNumber => "stripped_number",
        }
    }

    /// Look up a column by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL
            .into_iter()
            .find(|column| column.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
