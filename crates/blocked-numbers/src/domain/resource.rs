//! Resource references for the collaborator-facing surface.
//!
//! The table is addressed as `blocked` (the whole collection) or
//! `blocked/<id>` (one record). A leading `/` is accepted.

use super::record::RecordId;
use std::fmt;

/// Path segment naming the blocklist collection.
pub const COLLECTION_PATH: &str = "blocked";

/// Content type of a collection reference.
pub const CONTENT_TYPE_DIR: &str = "vnd.blocklist.dir/blocked_number";

/// Content type of an item reference.
pub const CONTENT_TYPE_ITEM: &str = "vnd.blocklist.item/blocked_number";

/// Shape of the data a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Collection,
    Item,
}

impl RecordType {
    pub fn content_type(&self) -> &'static str {
        match self {
            RecordType::Collection => CONTENT_TYPE_DIR,
            RecordType::Item => CONTENT_TYPE_ITEM,
        }
    }
}

/// A parsed resource reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRef {
    Collection,
    Item(RecordId),
}

impl ResourceRef {
    /// Parse a path. Returns `None` for anything unrecognised.
    ///
    /// Item ids must fit in a non-negative `i64`, the range of the `id`
    /// column as seen by selections.
    pub fn parse(path: &str) -> Option<ResourceRef> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let mut segments = path.split('/');

        if segments.next()? != COLLECTION_PATH {
            return None;
        }

        let resource = match segments.next() {
            None => ResourceRef::Collection,
            Some(id) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => {
                let id: i64 = id.parse().ok()?;
                ResourceRef::Item(RecordId(u64::try_from(id).ok()?))
            }
            Some(_) => return None,
        };

        segments.next().is_none().then_some(resource)
    }

    /// Reference to one record.
    pub fn item(id: RecordId) -> ResourceRef {
        ResourceRef::Item(id)
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            ResourceRef::Collection => RecordType::Collection,
            ResourceRef::Item(_) => RecordType::Item,
        }
    }

    /// Record id for item references.
    pub fn id(&self) -> Option<RecordId> {
        match self {
            ResourceRef::Collection => None,
            ResourceRef::Item(id) => Some(*id),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRef::Collection => f.write_str(COLLECTION_PATH),
            ResourceRef::Item(id) => write!(f, "{COLLECTION_PATH}/{id}"),
        }
    }
}
