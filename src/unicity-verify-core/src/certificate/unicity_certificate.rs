//! Unicity certificate: input record plus the shard tree, unicity tree and
//! seal that anchor it to the root chain.

use unicity_crypto::{sha256_concat, Hash};

use super::{
    encode_optional_hash, read_hash, read_optional_hash, read_tagged_array, read_u32,
    InputRecord, ShardTreeCertificate, UnicitySeal, UnicityTreeCertificate,
    UNICITY_CERTIFICATE_TAG,
};
use crate::cbor::{encode_array, encode_byte_string, encode_tagged, encode_uint, CborDecode, CborEncode};
use crate::error::{DecodeError, EncodingError};

const FIELDS: usize = 7;

/// Certificate proving a shard's input record is the unique one for its round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicityCertificate {
    /// Certificate format version.
    pub version: u32,
    /// Certified shard state.
    pub input_record: InputRecord,
    /// Hash of the technical record, if any.
    pub technical_record_hash: Option<Hash>,
    /// Hash of the shard configuration.
    pub shard_configuration_hash: Hash,
    /// Path from the shard leaf to the partition's shard tree root.
    pub shard_tree_certificate: ShardTreeCertificate,
    /// Path from the shard tree root to the unicity tree root.
    pub unicity_tree_certificate: UnicityTreeCertificate,
    /// Root chain seal over the unicity tree root.
    pub unicity_seal: UnicitySeal,
}

impl UnicityCertificate {
    /// Shard tree leaf: `H(canonical(input_record) || technical_record_hash)`.
    ///
    /// The technical record hash contributes its CBOR encoding, so an absent
    /// hash adds the single `null` byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the input record cannot be encoded.
    pub fn shard_leaf_hash(&self) -> Result<Hash, EncodingError> {
        let record = self.input_record.to_cbor()?;
        let technical = encode_optional_hash(self.technical_record_hash.as_ref());
        Ok(sha256_concat(&[&record[..], &technical[..]]))
    }

    /// Root of the partition's shard tree, or `None` when the shard path is
    /// malformed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input record cannot be encoded.
    pub fn shard_tree_root(&self) -> Result<Option<Hash>, EncodingError> {
        let leaf = self.shard_leaf_hash()?;
        Ok(self.shard_tree_certificate.root_hash(leaf))
    }

    /// Unicity tree root rebuilt from the input record upwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the input record cannot be encoded.
    pub fn unicity_tree_root(&self) -> Result<Option<Hash>, EncodingError> {
        Ok(self
            .shard_tree_root()?
            .map(|root| self.unicity_tree_certificate.root_hash(&root)))
    }
}

impl CborEncode for UnicityCertificate {
    fn to_cbor(&self) -> Result<Vec<u8>, EncodingError> {
        let fields = [
            encode_uint(u64::from(self.version)),
            self.input_record.to_cbor()?,
            encode_optional_hash(self.technical_record_hash.as_ref()),
            encode_byte_string(&self.shard_configuration_hash),
            self.shard_tree_certificate.to_cbor()?,
            self.unicity_tree_certificate.to_cbor()?,
            self.unicity_seal.to_cbor()?,
        ];
        Ok(encode_tagged(UNICITY_CERTIFICATE_TAG, &encode_array(&fields)))
    }
}

impl CborDecode for UnicityCertificate {
    fn from_cbor(data: &[u8]) -> Result<Self, DecodeError> {
        let items = read_tagged_array(data, UNICITY_CERTIFICATE_TAG, FIELDS, "UnicityCertificate")?;
        Ok(Self {
            version: read_u32(items[0], "UnicityCertificate version")?,
            input_record: InputRecord::from_cbor(items[1])?,
            technical_record_hash: read_optional_hash(items[2])?,
            shard_configuration_hash: read_hash(items[3])?,
            shard_tree_certificate: ShardTreeCertificate::from_cbor(items[4])?,
            unicity_tree_certificate: UnicityTreeCertificate::from_cbor(items[5])?,
            unicity_seal: UnicitySeal::from_cbor(items[6])?,
        })
    }
}
