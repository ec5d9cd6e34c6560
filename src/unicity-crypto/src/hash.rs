//! SHA-256 helpers shared by the certificate hash chains.

use sha2::{Digest, Sha256};

/// Length of every hash committed by the network (SHA-256).
pub const HASH_LEN: usize = 32;

/// A SHA-256 digest.
pub type Hash = [u8; HASH_LEN];

/// Hash a single buffer.
#[must_use]
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Hash the concatenation of `parts` without materializing it.
#[must_use]
pub fn sha256_concat(parts: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Convert a slice into a [`Hash`] if it has exactly [`HASH_LEN`] bytes.
#[must_use]
pub fn hash_from_slice(bytes: &[u8]) -> Option<Hash> {
    bytes.try_into().ok()
}
