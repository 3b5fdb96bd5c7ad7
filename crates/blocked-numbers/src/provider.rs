//! # Resource Provider
//!
//! The loosely typed surface collaborators use: paths, field maps and
//! selection text. Everything is validated here and handed to the typed
//! service.
//!
//! | Path | Record type |
//! |------|-------------|
//! | `blocked` | collection |
//! | `blocked/<id>` | item |

use crate::domain::filter::Predicate;
use crate::domain::record::{Column, NewBlockedNumber, RecordId};
use crate::domain::resource::{RecordType, ResourceRef};
use crate::error::{BlocklistError, Result};
use crate::ports::inbound::{
    BlockedNumberReader, BlockedNumberWriter, DeleteTarget, MembershipCheck, RecordCursor,
};
use crate::service::BlocklistService;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// A value in a field map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
}

impl FieldValue {
    /// Text form, with integers rendered in decimal. `None` for null.
    fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Integer(n) => Some(n.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

/// Column name to value map supplied on insert.
///
/// A key present with [`FieldValue::Null`] is still present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<String, FieldValue>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn put_null(&mut self, column: impl Into<String>) {
        self.values.insert(column.into(), FieldValue::Null);
    }

    /// Builder-style [`put`](Self::put).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.put(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values.get(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Map of typed columns, rejecting names outside the table.
    fn resolve(&self) -> Result<HashMap<Column, &FieldValue>> {
        self.values
            .iter()
            .map(|(name, value)| {
                Column::from_name(name)
                    .map(|column| (column, value))
                    .ok_or_else(|| BlocklistError::invalid(format!("unknown column '{name}'")))
            })
            .collect()
    }
}

/// Collaborator-facing provider over a shared [`BlocklistService`].
#[derive(Clone)]
pub struct BlocklistProvider {
    service: Arc<BlocklistService>,
}

impl BlocklistProvider {
    pub fn new(service: Arc<BlocklistService>) -> Self {
        Self { service }
    }

    /// The typed service behind this provider.
    pub fn service(&self) -> &Arc<BlocklistService> {
        &self.service
    }

    /// Record type of `path`, or `None` if the path is not recognised.
    pub fn record_type(&self, path: &str) -> Option<RecordType> {
        ResourceRef::parse(path).map(|resource| resource.record_type())
    }

    /// Insert a row from a field map into the collection.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an item path, a supplied `id` or
    /// `stripped_number`, an unknown column or a missing `original_number`.
    /// `ConstraintViolation` if the number is already blocked.
    pub fn insert(&self, path: &str, values: &FieldValues) -> Result<ResourceRef> {
        if resolve_path(path)? != ResourceRef::Collection {
            return Err(BlocklistError::invalid(format!(
                "cannot insert into item reference '{path}'"
            )));
        }

        let new = new_record(values)?;
        let id = self.service.insert(new)?;
        Ok(ResourceRef::item(id))
    }

    /// Delete rows addressed by `path` and an optional selection.
    ///
    /// Item references are unconditional: combining one with a selection is
    /// an error. A blank selection counts as none.
    pub fn delete(&self, path: &str, selection: Option<&str>, args: &[&str]) -> Result<usize> {
        let selection = non_blank(selection);

        let target = match resolve_path(path)? {
            ResourceRef::Item(id) => {
                if selection.is_some() {
                    return Err(BlocklistError::invalid(format!(
                        "selection must be null when deleting '{path}'"
                    )));
                }
                DeleteTarget::Id(id)
            }
            ResourceRef::Collection => match selection {
                None => DeleteTarget::All,
                Some(text) => DeleteTarget::Matching(parse_selection(text, args)?),
            },
        };

        self.service.delete(target)
    }

    /// Rows addressed by `path`, narrowed by an optional selection.
    pub fn query(&self, path: &str, selection: Option<&str>, args: &[&str]) -> Result<RecordCursor> {
        let resource = resolve_path(path)?;
        let filter = non_blank(selection)
            .map(|text| parse_selection(text, args))
            .transpose()?;

        let filter = match resource {
            ResourceRef::Collection => filter,
            ResourceRef::Item(id) => {
                let by_id = id_predicate(id);
                Some(match filter {
                    Some(predicate) => by_id.and(predicate),
                    None => by_id,
                })
            }
        };

        self.service.query(filter.as_ref())
    }

    /// Records are immutable; this always fails.
    pub fn update(
        &self,
        path: &str,
        _values: &FieldValues,
        _selection: Option<&str>,
        _args: &[&str],
    ) -> Result<usize> {
        debug!(path, "Update rejected");
        Err(BlocklistError::Unsupported("Update is not supported".to_string()))
    }

    pub fn is_blocked(&self, number: &str) -> bool {
        self.service.is_blocked(number)
    }
}

fn resolve_path(path: &str) -> Result<ResourceRef> {
    ResourceRef::parse(path)
        .ok_or_else(|| BlocklistError::invalid(format!("unrecognised resource '{path}'")))
}

fn non_blank(selection: Option<&str>) -> Option<&str> {
    selection.filter(|text| !text.trim().is_empty())
}

fn parse_selection(selection: &str, args: &[&str]) -> Result<Predicate> {
    Predicate::parse(selection, args).map_err(|e| {
        warn!(error = %e, selection, "Selection rejected");
        BlocklistError::Backend(e)
    })
}

fn id_predicate(id: RecordId) -> Predicate {
    match i64::try_from(id.value()) {
        Ok(value) => Predicate::eq(Column::Id, value),
        Err(_) => Predicate::eq(Column::Id, id.to_string()),
    }
}

fn new_record(values: &FieldValues) -> Result<NewBlockedNumber> {
    let columns = values.resolve()?;

    for derived in [Column::Id, Column::StrippedNumber] {
        if columns.contains_key(&derived) {
            return Err(BlocklistError::invalid(format!(
                "{derived} is assigned by the store and cannot be supplied"
            )));
        }
    }

    let original = columns
        .get(&Column::OriginalNumber)
        .and_then(|value| value.as_text())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| BlocklistError::invalid("original_number is required"))?;

    let new = NewBlockedNumber::new(original);
    let e164 = columns
        .get(&Column::E164Number)
        .and_then(|value| value.as_text())
        .filter(|text| !text.is_empty());

    Ok(match e164 {
        Some(e164) => new.with_e164(e164),
        None => new,
    })
}
