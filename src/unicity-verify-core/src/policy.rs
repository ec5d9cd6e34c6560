//! Verification policy: the fixed rule tree a proof must pass.
//!
//! ```text
//! VerificationPolicy
//! ├── StructureRule
//! │   ├── UnicityCertificateVersionRule
//! │   ├── InputRecordVersionRule
//! │   ├── UnicitySealVersionRule
//! │   ├── ShardTreeDepthRule
//! │   └── SealEpochRule            (WARNING only)
//! ├── UnicitySealHashMatchesUnicityTreeRootHashRule
//! └── UnicitySealQuorumSignaturesVerificationRule
//!     └── SignatureVerificationRule[<node id>] ...
//! ```
//!
//! Every stage runs even after an earlier one fails, so the returned tree
//! always shows every problem with the proof.

use tracing::{info, instrument, warn};

use crate::cache::TrustBaseCache;
use crate::cbor::CborDecode;
use crate::certificate::{TransactionRecordWithProof, TrustBase};
use crate::config::VerifyConfig;
use crate::error::VerifyError;
use crate::rule::{
    AggregatedRule, HashChainRule, QuorumSignatureRule, SealEpochRule, ShardTreeDepthRule,
    VerificationContext, VerificationResult, VerificationRule, VersionRule,
};

/// Name of the root of every result tree.
pub const POLICY_NAME: &str = "VerificationPolicy";

/// Structure, hash chain and quorum checks in that order.
pub struct VerificationPolicy {
    config: VerifyConfig,
    root: AggregatedRule,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationPolicy {
    /// Policy with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VerifyConfig::default())
    }

    /// Policy for `config`.
    #[must_use]
    pub fn with_config(config: VerifyConfig) -> Self {
        let structure = AggregatedRule::new(
            "StructureRule",
            vec![
                Box::new(VersionRule::certificate(config.certificate_versions.clone())),
                Box::new(VersionRule::input_record(config.input_record_versions.clone())),
                Box::new(VersionRule::seal(config.seal_versions.clone())),
                Box::new(ShardTreeDepthRule),
                Box::new(SealEpochRule),
            ],
        );
        let root = AggregatedRule::new(
            POLICY_NAME,
            vec![
                Box::new(structure),
                Box::new(HashChainRule),
                Box::new(QuorumSignatureRule::new()),
            ],
        );
        Self { config, root }
    }

    /// Configuration the policy was built from.
    #[must_use]
    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Verify a decoded proof against `trust_base`.
    #[instrument(skip_all, fields(round = proof.unicity_certificate().unicity_seal.root_chain_round_number))]
    pub fn verify(
        &self,
        proof: &TransactionRecordWithProof,
        trust_base: &TrustBase,
    ) -> VerificationResult {
        let context = VerificationContext::new(proof, trust_base);
        let result = self.root.evaluate(&context);
        if result.is_ok() {
            info!("Proof accepted");
        } else {
            warn!("Proof rejected");
        }
        result
    }

    /// Decode `bytes` and verify the proof.
    ///
    /// # Errors
    ///
    /// Returns an error when the input exceeds the configured size or does
    /// not decode. Rule failures are reported in the result, not as errors.
    #[instrument(skip_all, fields(size = bytes.len()))]
    pub fn verify_bytes(
        &self,
        bytes: &[u8],
        trust_base: &TrustBase,
    ) -> Result<VerificationResult, VerifyError> {
        let proof = self.decode(bytes)?;
        Ok(self.verify(&proof, trust_base))
    }

    /// Verify against the cached trust base for the seal's epoch.
    ///
    /// A missing trust base yields a FAIL tree rather than an error.
    #[instrument(skip_all)]
    pub fn verify_with_cache(
        &self,
        proof: &TransactionRecordWithProof,
        cache: &TrustBaseCache,
    ) -> VerificationResult {
        let epoch = proof.unicity_certificate().unicity_seal.epoch;
        match cache.get(epoch) {
            Some(trust_base) => self.verify(proof, &trust_base),
            None => {
                warn!(epoch, "No trust base cached for seal epoch");
                VerificationResult::fail(POLICY_NAME, format!("No trust base for epoch {epoch}"))
                    .with_error("trust base not cached")
            },
        }
    }

    /// Decode a proof, enforcing the configured size limit.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::ProofTooLarge`] or a decode error.
    pub fn decode(&self, bytes: &[u8]) -> Result<TransactionRecordWithProof, VerifyError> {
        if bytes.len() > self.config.max_proof_size {
            return Err(VerifyError::ProofTooLarge {
                size: bytes.len(),
                limit: self.config.max_proof_size,
            });
        }
        Ok(TransactionRecordWithProof::from_cbor(bytes)?)
    }
}
