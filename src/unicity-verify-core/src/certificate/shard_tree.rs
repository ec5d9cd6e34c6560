//! Shard tree certificate: the path from a shard leaf to the partition's
//! shard tree root.

use unicity_crypto::Hash;

use super::{read_fixed_array, read_hash};
use crate::bitstring::BitString;
use crate::cbor::{
    encode_array, encode_bit_string, encode_byte_string, read_array, read_bit_string,
    CborDecode, CborEncode,
};
use crate::error::{DecodeError, EncodingError};
use crate::merkle;

/// Shard identifier plus sibling hashes, ordered from the leaf upwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShardTreeCertificate {
    /// Shard identifier; its length is the depth of the shard in the tree.
    pub shard: BitString,
    /// Sibling hashes from the leaf up to the root.
    pub sibling_hashes: Vec<Hash>,
}

impl ShardTreeCertificate {
    /// Whether the sibling path is as long as the shard identifier.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.sibling_hashes.len() == self.shard.len()
    }

    /// Fold the sibling path over `leaf`, or `None` when the path length
    /// does not match the shard identifier.
    #[must_use]
    pub fn root_hash(&self, leaf: Hash) -> Option<Hash> {
        merkle::shard_tree_root(leaf, &self.shard, &self.sibling_hashes)
    }
}

impl CborEncode for ShardTreeCertificate {
    fn to_cbor(&self) -> Result<Vec<u8>, EncodingError> {
        let siblings: Vec<Vec<u8>> = self
            .sibling_hashes
            .iter()
            .map(|hash| encode_byte_string(hash))
            .collect();
        Ok(encode_array(&[
            encode_bit_string(&self.shard),
            encode_array(&siblings),
        ]))
    }
}

impl CborDecode for ShardTreeCertificate {
    fn from_cbor(data: &[u8]) -> Result<Self, DecodeError> {
        let items = read_fixed_array(data, 2, "ShardTreeCertificate")?;
        let sibling_hashes = read_array(items[1])?
            .into_iter()
            .map(read_hash)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            shard: read_bit_string(items[0])?,
            sibling_hashes,
        })
    }
}
