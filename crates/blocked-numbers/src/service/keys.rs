//! Key layout on the key-value port.
//!
//! | Key | Value |
//! |-----|-------|
//! | `r/{id:020}` | encoded record |
//! | `o/{original_number}` | id, u64 big-endian |
//! | `e/{e164 key}\0{id:020}` | empty |
//! | `s/{stripped}\0{id:020}` | empty |
//! | `m/next_id` | next id, u64 big-endian |
//!
//! Ids are zero-padded so a prefix scan over `r/` returns records in id
//! order. The NUL separator keeps index lookups exact: `e/+1555\0` never
//! matches an entry for `+15551`.

use crate::domain::record::RecordId;
use crate::error::KVStoreError;

/// Key namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyPrefix {
    /// Record data
    Record,
    /// Uniqueness index on `original_number`
    Original,
    /// E.164 comparison index
    E164,
    /// Stripped digits index
    Stripped,
    /// Store metadata
    Meta,
}

const INDEX_SEPARATOR: u8 = 0;

impl KeyPrefix {
    pub(crate) fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Record => b"r/",
            KeyPrefix::Original => b"o/",
            KeyPrefix::E164 => b"e/",
            KeyPrefix::Stripped => b"s/",
            KeyPrefix::Meta => b"m/",
        }
    }

    fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix);
        key
    }

    pub(crate) fn record_key(id: RecordId) -> Vec<u8> {
        KeyPrefix::Record.key(format!("{:020}", id.value()).as_bytes())
    }

    pub(crate) fn original_key(original: &str) -> Vec<u8> {
        KeyPrefix::Original.key(original.as_bytes())
    }

    pub(crate) fn next_id_key() -> Vec<u8> {
        KeyPrefix::Meta.key(b"next_id")
    }

    /// Prefix shared by every index entry for `value`.
    pub(crate) fn index_prefix(&self, value: &str) -> Vec<u8> {
        let mut key = self.key(value.as_bytes());
        key.push(INDEX_SEPARATOR);
        key
    }

    /// Index entry linking `value` to `id`.
    pub(crate) fn index_key(&self, value: &str, id: RecordId) -> Vec<u8> {
        let mut key = self.index_prefix(value);
        key.extend_from_slice(format!("{:020}", id.value()).as_bytes());
        key
    }
}

pub(crate) fn encode_id(id: RecordId) -> Vec<u8> {
    id.value().to_be_bytes().to_vec()
}

pub(crate) fn decode_id(bytes: &[u8]) -> Result<RecordId, KVStoreError> {
    let raw: [u8; 8] = bytes
        .try_into()
        .map_err(|_| KVStoreError::CorruptionError {
            message: format!("expected 8-byte id, found {} bytes", bytes.len()),
        })?;
    Ok(RecordId(u64::from_be_bytes(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keys_sort_by_id() {
        let low = KeyPrefix::record_key(RecordId(9));
        let high = KeyPrefix::record_key(RecordId(10));
        assert!(low < high);
        assert_eq!(low, b"r/00000000000000000009".to_vec());
    }

    #[test]
    fn test_index_prefix_is_exact() {
        let entry = KeyPrefix::E164.index_key("+15551", RecordId(1));
        assert!(!entry.starts_with(&KeyPrefix::E164.index_prefix("+1555")));
        assert!(entry.starts_with(&KeyPrefix::E164.index_prefix("+15551")));
    }

    #[test]
    fn test_id_encoding() {
        let bytes = encode_id(RecordId(258));
        assert_eq!(decode_id(&bytes).unwrap(), RecordId(258));
        assert!(decode_id(&[1, 2, 3]).is_err());
    }
}
