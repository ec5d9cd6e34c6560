//! Transaction record with its inclusion proof.
//!
//! The transaction record is carried as an opaque CBOR array; only the proof
//! is interpreted.

use unicity_crypto::{sha256, Hash};

use super::{read_fixed_array, read_hash, UnicityCertificate};
use crate::cbor::{
    encode_array, encode_boolean, encode_byte_string, read_array, read_boolean, CborDecode,
    CborEncode,
};
use crate::error::{DecodeError, EncodingError, VerifyError};
use crate::merkle;

/// One step of the block's transaction Merkle path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleChainItem {
    /// Whether `hash` is the left child.
    pub left: bool,
    /// Sibling hash.
    pub hash: Hash,
}

/// Proof that a transaction was included in a certified block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionProof {
    /// Hash of the block header.
    pub block_header_hash: Hash,
    /// Path from the transaction to the block's transaction root.
    pub merkle_chain: Vec<MerkleChainItem>,
    /// Certificate of the shard round that produced the block.
    pub unicity_certificate: UnicityCertificate,
}

impl TransactionProof {
    /// Fold the Merkle chain over `leaf`, giving the block's transaction
    /// root.
    #[must_use]
    pub fn chain_root(&self, leaf: Hash) -> Hash {
        self.merkle_chain.iter().fold(leaf, |current, item| {
            if item.left {
                merkle::hash_pair(&item.hash, &current)
            } else {
                merkle::hash_pair(&current, &item.hash)
            }
        })
    }
}

/// Decode hex text into bytes; whitespace is ignored.
///
/// # Errors
///
/// Returns [`VerifyError::InvalidInput`] for invalid hex.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, VerifyError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).map_err(|e| VerifyError::InvalidInput {
        message: format!("proof hex: {e}"),
    })
}

/// A transaction record together with its proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecordWithProof {
    /// Raw canonical CBOR of the transaction record array.
    pub transaction_record: Vec<u8>,
    /// Inclusion proof.
    pub transaction_proof: TransactionProof,
}

impl TransactionRecordWithProof {
    /// Decode from hex text; whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid hex or undecodable CBOR.
    pub fn from_hex(text: &str) -> Result<Self, VerifyError> {
        Ok(Self::from_cbor(&decode_hex(text)?)?)
    }

    /// SHA-256 of the transaction record bytes.
    #[must_use]
    pub fn transaction_hash(&self) -> Hash {
        sha256(&self.transaction_record)
    }

    /// Transaction root the Merkle chain leads to from this record.
    #[must_use]
    pub fn transaction_root(&self) -> Hash {
        self.transaction_proof.chain_root(self.transaction_hash())
    }

    /// The certificate the proof anchors to.
    #[must_use]
    pub fn unicity_certificate(&self) -> &UnicityCertificate {
        &self.transaction_proof.unicity_certificate
    }
}

impl CborEncode for MerkleChainItem {
    fn to_cbor(&self) -> Result<Vec<u8>, EncodingError> {
        Ok(encode_array(&[
            encode_boolean(self.left),
            encode_byte_string(&self.hash),
        ]))
    }
}

impl CborDecode for MerkleChainItem {
    fn from_cbor(data: &[u8]) -> Result<Self, DecodeError> {
        let items = read_fixed_array(data, 2, "MerkleChainItem")?;
        Ok(Self {
            left: read_boolean(items[0])?,
            hash: read_hash(items[1])?,
        })
    }
}

impl CborEncode for TransactionProof {
    fn to_cbor(&self) -> Result<Vec<u8>, EncodingError> {
        let chain = self
            .merkle_chain
            .iter()
            .map(CborEncode::to_cbor)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(encode_array(&[
            encode_byte_string(&self.block_header_hash),
            encode_array(&chain),
            self.unicity_certificate.to_cbor()?,
        ]))
    }
}

impl CborDecode for TransactionProof {
    fn from_cbor(data: &[u8]) -> Result<Self, DecodeError> {
        let items = read_fixed_array(data, 3, "TransactionProof")?;
        let merkle_chain = read_array(items[1])?
            .into_iter()
            .map(MerkleChainItem::from_cbor)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            block_header_hash: read_hash(items[0])?,
            merkle_chain,
            unicity_certificate: UnicityCertificate::from_cbor(items[2])?,
        })
    }
}

impl CborEncode for TransactionRecordWithProof {
    fn to_cbor(&self) -> Result<Vec<u8>, EncodingError> {
        Ok(encode_array(&[
            self.transaction_record.clone(),
            self.transaction_proof.to_cbor()?,
        ]))
    }
}

impl CborDecode for TransactionRecordWithProof {
    fn from_cbor(data: &[u8]) -> Result<Self, DecodeError> {
        let items = read_fixed_array(data, 2, "TransactionRecordWithProof")?;
        // Only the shape of the record is checked.
        read_array(items[0])?;

        Ok(Self {
            transaction_record: items[0].to_vec(),
            transaction_proof: TransactionProof::from_cbor(items[1])?,
        })
    }
}
