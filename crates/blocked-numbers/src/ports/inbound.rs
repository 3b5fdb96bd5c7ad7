//! Inbound Ports (Driving Ports)
//!
//! The API collaborators use. Write access and read access are separate
//! capabilities, and neither has an update operation: records are created
//! and deleted, never modified.

use crate::domain::filter::Predicate;
use crate::domain::record::{BlockedNumber, NewBlockedNumber, RecordId};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Which rows a delete removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// One record by id. Never combined with a filter.
    Id(RecordId),
    /// Every record.
    All,
    /// Rows for which the predicate is true.
    Matching(Predicate),
}

/// Index tier that produced a positive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchTier {
    /// Query text equals a stored `original_number` exactly.
    OriginalNumber,
    /// Query's E.164 form equals a stored E.164 value.
    E164Number,
    /// Query's digits equal a stored stripped number.
    StrippedNumber,
}

/// Result of a membership check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the query is blocked
    pub blocked: bool,
    /// Which tier matched (if any)
    pub matched_tier: Option<MatchTier>,
}

impl MatchResult {
    pub fn miss() -> Self {
        Self {
            blocked: false,
            matched_tier: None,
        }
    }

    pub fn hit(tier: MatchTier) -> Self {
        Self {
            blocked: true,
            matched_tier: Some(tier),
        }
    }
}

/// Rows returned by a query.
///
/// Materialised when the query runs, so later writes do not affect it.
/// Ordered by id and consumed once.
#[derive(Debug)]
pub struct RecordCursor {
    rows: std::vec::IntoIter<BlockedNumber>,
}

impl RecordCursor {
    pub fn new(rows: Vec<BlockedNumber>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }

    /// Rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Iterator for RecordCursor {
    type Item = BlockedNumber;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for RecordCursor {}

/// Write capability.
pub trait BlockedNumberWriter: Send + Sync {
    /// Store a new record and return its id.
    ///
    /// Fails with `InvalidArgument` for an empty number and
    /// `ConstraintViolation` when the number is already blocked.
    fn insert(&self, new: NewBlockedNumber) -> Result<RecordId>;

    /// Delete rows, returning how many were removed.
    fn delete(&self, target: DeleteTarget) -> Result<usize>;
}

/// Read capability.
pub trait BlockedNumberReader: Send + Sync {
    fn get(&self, id: RecordId) -> Result<Option<BlockedNumber>>;

    /// Rows matching `filter` (all rows when `None`), ordered by id.
    fn query(&self, filter: Option<&Predicate>) -> Result<RecordCursor>;

    fn count(&self) -> Result<usize>;
}

/// Narrow membership capability for screening code.
pub trait MembershipCheck: Send + Sync {
    /// Whether `number` is blocked in any of its recognised forms.
    ///
    /// Never fails: storage problems are logged and reported as not blocked.
    fn is_blocked(&self, number: &str) -> bool;
}
