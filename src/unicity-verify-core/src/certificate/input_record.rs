//! Input record: a shard's certified state for one round.

use unicity_crypto::Hash;

use super::{
    encode_optional_hash, read_optional_hash, read_tagged_array, read_u32, INPUT_RECORD_TAG,
};
use crate::cbor::{
    encode_array, encode_byte_string, encode_tagged, encode_uint, read_byte_string,
    read_unsigned_integer, CborDecode, CborEncode,
};
use crate::error::{DecodeError, EncodingError};

const FIELDS: usize = 10;

/// State summary a shard submits to the root chain for certification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// Record format version.
    pub version: u32,
    /// Shard round number.
    pub round_number: u64,
    /// Shard epoch.
    pub epoch: u64,
    /// State hash before the round.
    pub previous_hash: Option<Hash>,
    /// State hash after the round.
    pub hash: Option<Hash>,
    /// Hash of the block produced in the round.
    pub block_hash: Option<Hash>,
    /// Aggregated balance commitment, kept as the raw bytes the shard
    /// committed.
    pub summary_value: Vec<u8>,
    /// Round timestamp.
    pub timestamp: u64,
    /// Sum of fees earned in the round.
    pub sum_of_earned_fees: u64,
    /// Hash of the executed transactions.
    pub executed_transactions_hash: Option<Hash>,
}

impl CborEncode for InputRecord {
    fn to_cbor(&self) -> Result<Vec<u8>, EncodingError> {
        let fields = [
            encode_uint(u64::from(self.version)),
            encode_uint(self.round_number),
            encode_uint(self.epoch),
            encode_optional_hash(self.previous_hash.as_ref()),
            encode_optional_hash(self.hash.as_ref()),
            encode_optional_hash(self.block_hash.as_ref()),
            encode_byte_string(&self.summary_value),
            encode_uint(self.timestamp),
            encode_uint(self.sum_of_earned_fees),
            encode_optional_hash(self.executed_transactions_hash.as_ref()),
        ];
        Ok(encode_tagged(INPUT_RECORD_TAG, &encode_array(&fields)))
    }
}

impl CborDecode for InputRecord {
    fn from_cbor(data: &[u8]) -> Result<Self, DecodeError> {
        let items = read_tagged_array(data, INPUT_RECORD_TAG, FIELDS, "InputRecord")?;
        Ok(Self {
            version: read_u32(items[0], "InputRecord version")?,
            round_number: read_unsigned_integer(items[1])?,
            epoch: read_unsigned_integer(items[2])?,
            previous_hash: read_optional_hash(items[3])?,
            hash: read_optional_hash(items[4])?,
            block_hash: read_optional_hash(items[5])?,
            summary_value: read_byte_string(items[6])?.to_vec(),
            timestamp: read_unsigned_integer(items[7])?,
            sum_of_earned_fees: read_unsigned_integer(items[8])?,
            executed_transactions_hash: read_optional_hash(items[9])?,
        })
    }
}
