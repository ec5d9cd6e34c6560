//! Unicity seal: the root chain's signed commitment to the unicity tree root.

use std::collections::BTreeMap;

use unicity_crypto::{sha256, Hash};

use super::{
    encode_optional_hash, read_hash, read_optional_hash, read_tagged_array, read_u32,
    UNICITY_SEAL_TAG,
};
use crate::cbor::{
    encode_array, encode_byte_string, encode_map, encode_null, encode_tagged, encode_text_string,
    encode_uint, read_byte_string, read_map, read_optional, read_text_string,
    read_unsigned_integer, CborDecode, CborEncode,
};
use crate::error::{DecodeError, EncodingError};

const FIELDS: usize = 8;

/// Root chain seal over one round's unicity tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicitySeal {
    /// Seal format version.
    pub version: u32,
    /// Network the seal belongs to.
    pub network_id: u16,
    /// Root chain round that produced the seal.
    pub root_chain_round_number: u64,
    /// Root chain epoch; selects the trust base.
    pub epoch: u64,
    /// Seal timestamp.
    pub timestamp: u64,
    /// Hash of the previous round's seal.
    pub previous_hash: Option<Hash>,
    /// Unicity tree root committed by the seal.
    pub hash: Hash,
    /// Root node signatures keyed by node id.
    pub signatures: BTreeMap<String, Vec<u8>>,
}

impl UnicitySeal {
    fn encode_fields(&self, signatures: Vec<u8>) -> Vec<u8> {
        let fields = [
            encode_uint(u64::from(self.version)),
            encode_uint(u64::from(self.network_id)),
            encode_uint(self.root_chain_round_number),
            encode_uint(self.epoch),
            encode_uint(self.timestamp),
            encode_optional_hash(self.previous_hash.as_ref()),
            encode_byte_string(&self.hash),
            signatures,
        ];
        encode_tagged(UNICITY_SEAL_TAG, &encode_array(&fields))
    }

    /// Bytes the root nodes sign: the seal encoding with `null` in place of
    /// the signature map.
    #[must_use]
    pub fn signing_bytes(&self) -> Vec<u8> {
        self.encode_fields(encode_null())
    }

    /// SHA-256 of [`Self::signing_bytes`].
    #[must_use]
    pub fn signing_digest(&self) -> Hash {
        sha256(&self.signing_bytes())
    }

    /// Signature of `node_id`, if present.
    #[must_use]
    pub fn signature(&self, node_id: &str) -> Option<&[u8]> {
        self.signatures.get(node_id).map(Vec::as_slice)
    }
}

impl CborEncode for UnicitySeal {
    fn to_cbor(&self) -> Result<Vec<u8>, EncodingError> {
        let signatures = encode_map(self.signatures.iter().map(|(id, signature)| {
            (encode_text_string(id), encode_byte_string(signature))
        }))?;
        Ok(self.encode_fields(signatures))
    }
}

/// Node ids are unique because `read_map` rejects repeated keys.
fn read_signatures(data: &[u8]) -> Result<BTreeMap<String, Vec<u8>>, DecodeError> {
    read_map(data)?
        .into_iter()
        .map(|(key, value)| -> Result<_, DecodeError> {
            Ok((read_text_string(key)?.to_owned(), read_byte_string(value)?.to_vec()))
        })
        .collect()
}

impl CborDecode for UnicitySeal {
    fn from_cbor(data: &[u8]) -> Result<Self, DecodeError> {
        let items = read_tagged_array(data, UNICITY_SEAL_TAG, FIELDS, "UnicitySeal")?;
        let network_id = read_unsigned_integer(items[1])?;

        Ok(Self {
            version: read_u32(items[0], "UnicitySeal version")?,
            network_id: u16::try_from(network_id).map_err(|_| {
                DecodeError::malformed(0, format!("network id {network_id} exceeds 16 bits"))
            })?,
            root_chain_round_number: read_unsigned_integer(items[2])?,
            epoch: read_unsigned_integer(items[3])?,
            timestamp: read_unsigned_integer(items[4])?,
            previous_hash: read_optional_hash(items[5])?,
            hash: read_hash(items[6])?,
            signatures: read_optional(items[7], read_signatures)?.unwrap_or_default(),
        })
    }
}
