//! Quorum check over the root node signatures on the unicity seal.

use tracing::{debug, warn};
use unicity_crypto::{DigestVerifier, Secp256k1Verifier};

use super::{VerificationContext, VerificationResult, VerificationRule};

/// Counts valid root node signatures on the seal against the trust base
/// quorum threshold.
///
/// Every signature in the seal gets its own child result; a signature from
/// a node outside the trust base is reported as unknown and never counts.
#[derive(Debug, Default, Clone)]
pub struct QuorumSignatureRule<V = Secp256k1Verifier> {
    verifier: V,
}

impl<V: DigestVerifier> QuorumSignatureRule<V> {
    const NAME: &'static str = "UnicitySealQuorumSignaturesVerificationRule";

    /// Use `verifier` to check each signature.
    pub fn with_verifier(verifier: V) -> Self {
        Self { verifier }
    }

    fn check_signature(
        &self,
        context: &VerificationContext<'_>,
        node_id: &str,
        signature: &[u8],
        digest: &[u8],
    ) -> VerificationResult {
        let rule = format!("SignatureVerificationRule[{node_id}]");
        let Some(node) = context.trust_base.node(node_id) else {
            warn!(node_id, "Seal signed by unknown root node");
            return VerificationResult::fail(rule, format!("Unknown root node {node_id}"));
        };

        match self.verifier.verify_digest(&node.public_key, digest, signature) {
            Ok(true) => {
                debug!(node_id, "Signature verified");
                VerificationResult::ok(rule, "Signature is valid")
            },
            Ok(false) => {
                warn!(node_id, "Signature does not verify");
                VerificationResult::fail(rule, "Signature is invalid")
            },
            Err(e) => {
                warn!(node_id, error = %e, "Signature could not be checked");
                VerificationResult::fail(rule, "Signature could not be checked").with_error(e.to_string())
            },
        }
    }
}

impl QuorumSignatureRule {
    /// Quorum rule with the secp256k1 verifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V: DigestVerifier + Send + Sync> VerificationRule for QuorumSignatureRule<V> {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, context: &VerificationContext<'_>) -> VerificationResult {
        let seal = &context.certificate().unicity_seal;
        let digest = seal.signing_digest();

        let children: Vec<VerificationResult> = seal
            .signatures
            .iter()
            .map(|(node_id, signature)| self.check_signature(context, node_id, signature, &digest))
            .collect();

        let successes = children.iter().filter(|child| child.is_ok()).count() as u64;
        let threshold = context.trust_base.quorum_threshold();
        debug!(successes, threshold, signatures = children.len(), "Quorum evaluated");

        let message = format!("{successes} of {threshold} required signatures verified");
        let result = if successes >= threshold {
            VerificationResult::ok(Self::NAME, message)
        } else {
            warn!(successes, threshold, "Quorum not reached");
            VerificationResult::fail(Self::NAME, message).with_error("Quorum threshold not reached")
        };
        result.with_children(children)
    }
}

#[cfg(test)]
mod tests {
    use unicity_crypto::CryptoError;

    use super::*;
    use crate::rule::{fixtures, ResultCode};

    #[test]
    fn test_single_signature_reaches_threshold_one() {
        let (proof, trust_base) = fixtures::signed_proof();
        let context = VerificationContext::new(&proof, &trust_base);
        let result = QuorumSignatureRule::new().evaluate(&context);

        assert_eq!(result.code, ResultCode::Ok);
        assert_eq!(result.children.len(), 1);
        assert_eq!(result.children[0].code, ResultCode::Ok);
    }

    #[test]
    fn test_signature_over_other_seal_fails() {
        let (mut proof, trust_base) = fixtures::signed_proof();
        proof.transaction_proof.unicity_certificate.unicity_seal.timestamp += 1;
        let context = VerificationContext::new(&proof, &trust_base);
        let result = QuorumSignatureRule::new().evaluate(&context);

        assert_eq!(result.code, ResultCode::Fail);
        assert_eq!(result.children[0].message, "Signature is invalid");
    }

    struct Broken;

    impl DigestVerifier for Broken {
        fn verify_digest(&self, _: &[u8], _: &[u8], _: &[u8]) -> Result<bool, CryptoError> {
            Err(CryptoError::invalid_public_key("not a point"))
        }
    }

    #[test]
    fn test_verifier_error_is_a_failed_child() {
        let (proof, trust_base) = fixtures::signed_proof();
        let context = VerificationContext::new(&proof, &trust_base);
        let result = QuorumSignatureRule::with_verifier(Broken).evaluate(&context);

        assert_eq!(result.code, ResultCode::Fail);
        assert!(result.children[0].error.as_deref().unwrap().contains("not a point"));
    }
}
