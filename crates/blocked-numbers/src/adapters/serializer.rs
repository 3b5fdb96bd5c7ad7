use crate::domain::record::BlockedNumber;
use crate::ports::outbound::RecordSerializer;

/// Default record serializer using bincode.
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeRecordSerializer;

impl RecordSerializer for BincodeRecordSerializer {
    fn serialize(&self, record: &BlockedNumber) -> Result<Vec<u8>, String> {
        bincode::serialize(record).map_err(|e| e.to_string())
    }

    fn deserialize(&self, data: &[u8]) -> Result<BlockedNumber, String> {
        bincode::deserialize(data).map_err(|e| e.to_string())
    }
}
