//! Signature traits used at the verification seam.
//!
//! Root validators sign the SHA-256 digest of a seal, so both traits work on
//! prehashed input. The verification engine only depends on
//! [`DigestVerifier`]; [`DigestSigner`] exists to produce fixtures and for
//! tooling that assembles certificates locally.

use crate::error::CryptoError;
use crate::hash::HASH_LEN;

/// Length of a compact `r || s` ECDSA signature.
pub const COMPACT_SIGNATURE_LEN: usize = 64;

/// Length of a recoverable `r || s || v` signature.
pub const RECOVERABLE_SIGNATURE_LEN: usize = COMPACT_SIGNATURE_LEN + 1;

/// Trait for signing prehashed data.
pub trait DigestSigner {
    /// Get the public key in the encoding the trust base uses.
    fn public_key(&self) -> Vec<u8>;

    /// Sign a digest and return the signature.
    fn sign_digest(&self, digest: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// Trait for verifying signatures over prehashed data.
pub trait DigestVerifier {
    /// Verify a signature over `digest` against a public key.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not verify,
    /// and an error when the key or signature cannot be parsed.
    fn verify_digest(
        &self,
        public_key: &[u8],
        digest: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError>;
}

/// Drop the trailing recovery byte of a recoverable signature.
///
/// Signatures of any other length are returned unchanged.
#[must_use]
pub fn strip_recovery_byte(signature: &[u8]) -> &[u8] {
    if signature.len() == RECOVERABLE_SIGNATURE_LEN {
        &signature[..COMPACT_SIGNATURE_LEN]
    } else {
        signature
    }
}

pub(crate) fn check_digest_len(digest: &[u8]) -> Result<(), CryptoError> {
    if digest.len() != HASH_LEN {
        return Err(CryptoError::InvalidDigestLength {
            expected: HASH_LEN,
            actual: digest.len(),
        });
    }
    Ok(())
}
