//! Error types for encoding, decoding and verification.

use thiserror::Error;

use crate::cbor::MajorType;

/// Errors raised while producing canonical CBOR.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Negative value passed to an unsigned encoder.
    #[error("Cannot encode negative value {value} as unsigned integer")]
    NegativeValue {
        /// The rejected value.
        value: i128,
    },

    /// Value does not fit in 64 bits.
    #[error("Value {value} exceeds 64 bits")]
    Overflow {
        /// The rejected value.
        value: i128,
    },

    /// Two map entries encode to the same key bytes.
    #[error("Duplicate map key {key}")]
    DuplicateMapKey {
        /// Hex of the encoded key.
        key: String,
    },
}

/// Errors raised while parsing CBOR.
///
/// Corrupt input is always rejected; the decoder never repairs or guesses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The item has a different major type than the reader expects.
    #[error("Expected {expected}, found {actual} at offset {offset}")]
    MajorTypeMismatch {
        /// Major type the reader expected.
        expected: MajorType,
        /// Major type found in the input.
        actual: MajorType,
        /// Offset of the item.
        offset: usize,
    },

    /// Indefinite-length item (additional info 31).
    #[error("Indefinite-length {major} at offset {offset} is not supported")]
    IndefiniteLengthUnsupported {
        /// Major type carrying the indefinite marker.
        major: MajorType,
        /// Offset of the item.
        offset: usize,
    },

    /// Structurally invalid input.
    #[error("Malformed CBOR at offset {offset}: {reason}")]
    Malformed {
        /// Offset where the problem was detected.
        offset: usize,
        /// What is wrong.
        reason: String,
    },

    /// Input ended before the item was complete.
    #[error("Truncated CBOR at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        /// Offset where more bytes were needed.
        offset: usize,
        /// Bytes needed.
        needed: u64,
        /// Bytes remaining in the input.
        available: usize,
    },

    /// A tagged item carries a different tag than its schema requires.
    #[error("Expected tag {expected}, found tag {actual}")]
    UnexpectedTag {
        /// Tag required by the schema.
        expected: u64,
        /// Tag found in the input.
        actual: u64,
    },
}

impl DecodeError {
    /// Create a malformed-input error.
    #[must_use]
    pub fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            reason: reason.into(),
        }
    }
}

/// Errors raised when building a trust base.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrustBaseError {
    /// A quorum threshold of zero would accept unsigned seals.
    #[error("Quorum threshold must be at least 1")]
    ZeroQuorumThreshold,

    /// The threshold can never be reached by the roster.
    #[error("Quorum threshold {threshold} exceeds roster size {nodes}")]
    QuorumExceedsRoster {
        /// Configured threshold.
        threshold: u64,
        /// Number of nodes in the roster.
        nodes: usize,
    },

    /// The same node id appears twice.
    #[error("Duplicate root node {id}")]
    DuplicateNode {
        /// The repeated node id.
        id: String,
    },

    /// A node entry has no public key.
    #[error("Root node {id} has an empty public key")]
    EmptyPublicKey {
        /// The node id.
        id: String,
    },
}

/// Errors that can occur around verification.
///
/// Rule failures are never errors; they are recorded in the result tree.
/// These cover the inputs the policy cannot even start on.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Proof bytes could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A value could not be encoded.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Trust base is invalid.
    #[error("Trust base error: {0}")]
    TrustBase(#[from] TrustBaseError),

    /// Cryptographic error.
    #[error("Crypto error: {0}")]
    Crypto(#[from] unicity_crypto::CryptoError),

    /// Proof exceeds the configured size limit.
    #[error("Proof of {size} bytes exceeds limit of {limit} bytes")]
    ProofTooLarge {
        /// Size of the rejected proof.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Input could not be parsed (hex, JSON).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Error message.
        message: String,
    },

    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VerifyError {
    /// Check if this error means the proof itself is corrupt.
    #[must_use]
    pub fn is_malformed_proof(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::ProofTooLarge { .. })
    }
}
