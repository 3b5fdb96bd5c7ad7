//! Record store operations: insert, delete, get, query, count.

use super::keys::{self, KeyPrefix};
use super::BlocklistService;
use crate::domain::filter::Predicate;
use crate::domain::normalizer::{e164_index_key, strip};
use crate::domain::record::{BlockedNumber, NewBlockedNumber, RecordId};
use crate::error::{BlocklistError, Result};
use crate::ports::inbound::{BlockedNumberReader, BlockedNumberWriter, DeleteTarget, RecordCursor};
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use tracing::{debug, info};

impl BlocklistService {
    /// Index entries a record owns, besides its data and uniqueness keys.
    fn index_keys(record: &BlockedNumber) -> Vec<Vec<u8>> {
        let mut index = Vec::with_capacity(2);

        if let Some(e164) = &record.e164_number {
            let key = e164_index_key(e164);
            if !key.is_empty() {
                index.push(KeyPrefix::E164.index_key(&key, record.id));
            }
        }

        if !record.stripped_number.is_empty() {
            index.push(KeyPrefix::Stripped.index_key(&record.stripped_number, record.id));
        }

        index
    }

    fn delete_ops(record: &BlockedNumber) -> Vec<BatchOperation> {
        let mut ops = vec![
            BatchOperation::delete(KeyPrefix::record_key(record.id)),
            BatchOperation::delete(KeyPrefix::original_key(&record.original_number)),
        ];
        ops.extend(Self::index_keys(record).into_iter().map(BatchOperation::delete));
        ops
    }

    fn next_id(store: &dyn KeyValueStore) -> Result<RecordId> {
        match store.get(&KeyPrefix::next_id_key())? {
            Some(bytes) => Ok(keys::decode_id(&bytes)?),
            None => Ok(RecordId(1)),
        }
    }

    /// Every stored record, ordered by id.
    pub(crate) fn scan_records(&self, store: &dyn KeyValueStore) -> Result<Vec<BlockedNumber>> {
        store
            .prefix_scan(KeyPrefix::Record.as_bytes())?
            .iter()
            .map(|(_, value)| self.decode(value))
            .collect()
    }

    fn load(&self, store: &dyn KeyValueStore, id: RecordId) -> Result<Option<BlockedNumber>> {
        store
            .get(&KeyPrefix::record_key(id))?
            .map(|bytes| self.decode(&bytes))
            .transpose()
    }

    fn build_record(&self, new: NewBlockedNumber) -> Result<BlockedNumber> {
        if new.original_number.is_empty() {
            return Err(BlocklistError::invalid("original_number is required"));
        }

        let e164_number = match new.e164_override.filter(|e164| !e164.is_empty()) {
            Some(e164) => Some(e164),
            None => self.normalizer.normalize(&new.original_number).e164,
        };

        Ok(BlockedNumber {
            id: RecordId(0),
            stripped_number: strip(&new.original_number),
            original_number: new.original_number,
            e164_number,
        })
    }

    /// Validation, derivation and the batch write all happen under one
    /// write guard.
    fn insert_locked(&self, new: NewBlockedNumber) -> Result<RecordId> {
        let mut store = self.kv_store.write();
        let mut record = self.build_record(new)?;

        let original_key = KeyPrefix::original_key(&record.original_number);
        if store.exists(&original_key)? {
            return Err(BlocklistError::ConstraintViolation(format!(
                "original_number '{}' is already blocked",
                record.original_number
            )));
        }

        let id = Self::next_id(store.as_ref())?;
        let next = RecordId(id.value() + 1);
        record.id = id;

        let mut ops = vec![
            BatchOperation::put(KeyPrefix::record_key(id), self.encode(&record)?),
            BatchOperation::put(original_key, keys::encode_id(id)),
            BatchOperation::put(KeyPrefix::next_id_key(), keys::encode_id(next)),
        ];
        ops.extend(
            Self::index_keys(&record)
                .into_iter()
                .map(|key| BatchOperation::put(key, Vec::new())),
        );

        store.atomic_batch_write(ops)?;
        Ok(id)
    }

    fn delete_locked(&self, target: &DeleteTarget) -> Result<usize> {
        let mut store = self.kv_store.write();

        let victims = match target {
            DeleteTarget::Id(id) => self.load(store.as_ref(), *id)?.into_iter().collect(),
            DeleteTarget::All => self.scan_records(store.as_ref())?,
            DeleteTarget::Matching(predicate) => {
                let mut rows = self.scan_records(store.as_ref())?;
                rows.retain(|row| predicate.matches(row));
                rows
            }
        };

        if victims.is_empty() {
            return Ok(0);
        }

        let ops = victims.iter().flat_map(Self::delete_ops).collect();
        store.atomic_batch_write(ops)?;
        Ok(victims.len())
    }
}

impl BlockedNumberWriter for BlocklistService {
    fn insert(&self, new: NewBlockedNumber) -> Result<RecordId> {
        match self.insert_locked(new) {
            Ok(id) => {
                self.metrics.record_insert();
                info!(id = %id, "Blocked number inserted");
                self.notify_changed();
                Ok(id)
            }
            Err(e) => {
                self.metrics.record_insert_rejected();
                debug!(error = %e, "Insert rejected");
                Err(e)
            }
        }
    }

    fn delete(&self, target: DeleteTarget) -> Result<usize> {
        let rows = self.delete_locked(&target)?;

        if rows > 0 {
            self.metrics.record_deleted(rows);
            info!(rows, target = ?target, "Blocked numbers deleted");
            self.notify_changed();
        } else {
            debug!(target = ?target, "Delete matched no rows");
        }

        Ok(rows)
    }
}

impl BlockedNumberReader for BlocklistService {
    fn get(&self, id: RecordId) -> Result<Option<BlockedNumber>> {
        let store = self.kv_store.read();
        self.load(store.as_ref(), id)
    }

    fn query(&self, filter: Option<&Predicate>) -> Result<RecordCursor> {
        let store = self.kv_store.read();
        let mut rows = self.scan_records(store.as_ref())?;
        drop(store);

        if let Some(predicate) = filter {
            rows.retain(|row| predicate.matches(row));
        }

        debug!(rows = rows.len(), "Query materialised");
        Ok(RecordCursor::new(rows))
    }

    fn count(&self) -> Result<usize> {
        let store = self.kv_store.read();
        Ok(store.prefix_scan(KeyPrefix::Record.as_bytes())?.len())
    }
}
