//! # unicity-crypto
//!
//! Cryptographic primitives for verifying unicity proofs.
//!
//! - **Hashing**: SHA-256, the only hash function the certificate trees use
//! - **Signatures**: ECDSA secp256k1 over prehashed digests, the scheme root
//!   validators use to sign unicity seals
//!
//! ## Recoverable Signatures
//!
//! Validators publish 65-byte signatures with a trailing recovery byte:
//!
//! ```text
//! signature = r (32) || s (32) || v (1)
//! ```
//!
//! Verification works against the public key from the trust base, so the
//! recovery byte is stripped before the compact signature is checked.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod secp256k1;
mod signature;

pub use error::CryptoError;
pub use hash::{hash_from_slice, sha256, sha256_concat, Hash, HASH_LEN};
pub use secp256k1::{Secp256k1Signer, Secp256k1Verifier};
pub use signature::{
    strip_recovery_byte, DigestSigner, DigestVerifier, COMPACT_SIGNATURE_LEN,
    RECOVERABLE_SIGNATURE_LEN,
};

/// Constant-time byte comparison.
///
/// Compares two byte slices in constant time to prevent timing attacks.
/// Returns `true` if the slices are equal, `false` otherwise.
///
/// # Security
///
/// Used for comparing reconstructed tree roots against committed hashes.
/// The length check still returns early; hash lengths are not secret.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;

    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
