//! Unicity tree certificate: the path from a partition's shard tree root to
//! the network-wide unicity tree root.

use unicity_crypto::Hash;

use super::{read_fixed_array, read_hash, read_tagged_array, read_u32, UNICITY_TREE_CERTIFICATE_TAG};
use crate::cbor::{
    encode_array, encode_byte_string, encode_tagged, encode_uint, read_array, read_byte_string,
    CborDecode, CborEncode,
};
use crate::error::{DecodeError, EncodingError};
use crate::merkle;

/// One node on the unicity tree path: the node's split key and the hash of
/// the subtree not on the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashStep {
    /// Split key of the node.
    pub key: Vec<u8>,
    /// Hash of the sibling subtree.
    pub hash: Hash,
}

/// Unicity tree certificate for one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicityTreeCertificate {
    /// Partition identifier; its big-endian bytes are the leaf key.
    pub partition_identifier: u32,
    /// Hash of the partition description record.
    pub partition_description_hash: Hash,
    /// Path steps from the leaf upwards.
    pub hash_steps: Vec<HashStep>,
}

impl UnicityTreeCertificate {
    /// Key of this partition's leaf.
    #[must_use]
    pub fn partition_key(&self) -> [u8; 4] {
        self.partition_identifier.to_be_bytes()
    }

    /// Recompute the unicity tree root from the partition's shard tree root.
    #[must_use]
    pub fn root_hash(&self, shard_tree_root: &Hash) -> Hash {
        let key = self.partition_key();
        let leaf = merkle::unicity_leaf_hash(&key, shard_tree_root, &self.partition_description_hash);
        merkle::index_tree_root(&key, leaf, &self.hash_steps)
    }
}

impl CborEncode for HashStep {
    fn to_cbor(&self) -> Result<Vec<u8>, EncodingError> {
        Ok(encode_array(&[
            encode_byte_string(&self.key),
            encode_byte_string(&self.hash),
        ]))
    }
}

impl CborDecode for HashStep {
    fn from_cbor(data: &[u8]) -> Result<Self, DecodeError> {
        let items = read_fixed_array(data, 2, "HashStep")?;
        Ok(Self {
            key: read_byte_string(items[0])?.to_vec(),
            hash: read_hash(items[1])?,
        })
    }
}

impl CborEncode for UnicityTreeCertificate {
    fn to_cbor(&self) -> Result<Vec<u8>, EncodingError> {
        let steps = self
            .hash_steps
            .iter()
            .map(CborEncode::to_cbor)
            .collect::<Result<Vec<_>, _>>()?;
        let fields = [
            encode_uint(u64::from(self.partition_identifier)),
            encode_byte_string(&self.partition_description_hash),
            encode_array(&steps),
        ];
        Ok(encode_tagged(UNICITY_TREE_CERTIFICATE_TAG, &encode_array(&fields)))
    }
}

impl CborDecode for UnicityTreeCertificate {
    fn from_cbor(data: &[u8]) -> Result<Self, DecodeError> {
        let items = read_tagged_array(
            data,
            UNICITY_TREE_CERTIFICATE_TAG,
            3,
            "UnicityTreeCertificate",
        )?;
        let hash_steps = read_array(items[2])?
            .into_iter()
            .map(HashStep::from_cbor)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            partition_identifier: read_u32(items[0], "partition identifier")?,
            partition_description_hash: read_hash(items[1])?,
            hash_steps,
        })
    }
}
