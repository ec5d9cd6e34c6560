//! ECDSA secp256k1 signature operations.
//!
//! Root validators sign with secp256k1 and publish compressed SEC1 public
//! keys. Signatures travel as 65-byte `r || s || v` values; only the compact
//! 64-byte part takes part in verification.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};

use crate::error::CryptoError;
use crate::signature::{check_digest_len, strip_recovery_byte, DigestSigner, DigestVerifier};

/// ECDSA secp256k1 signer producing recoverable signatures.
pub struct Secp256k1Signer {
    signing_key: SigningKey,
}

impl Secp256k1Signer {
    /// Create a signer from a 32-byte secret scalar.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not a valid non-zero scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|e| CryptoError::invalid_private_key(e.to_string()))?;

        Ok(Self { signing_key })
    }

    /// Get the verifying key.
    #[must_use]
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl DigestSigner for Secp256k1Signer {
    fn public_key(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    fn sign_digest(&self, digest: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_digest_len(digest)?;
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|e| CryptoError::signing_failed(e.to_string()))?;

        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte());
        Ok(bytes)
    }
}

/// ECDSA secp256k1 verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Verifier;

impl Secp256k1Verifier {
    /// Create a new verifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DigestVerifier for Secp256k1Verifier {
    fn verify_digest(
        &self,
        public_key: &[u8],
        digest: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        check_digest_len(digest)?;

        let vk = VerifyingKey::from_sec1_bytes(public_key)
            .map_err(|e| CryptoError::invalid_public_key(e.to_string()))?;

        let sig = Signature::from_slice(strip_recovery_byte(signature))
            .map_err(|e| CryptoError::invalid_signature(e.to_string()))?;

        match vk.verify_prehash(digest, &sig) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}
