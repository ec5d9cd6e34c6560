//! Rebuilds the unicity tree root from the input record and compares it to
//! the hash the seal commits to.

use tracing::{debug, warn};
use unicity_crypto::constant_time_eq;

use super::{VerificationContext, VerificationResult, VerificationRule};

/// Input record → shard tree root → unicity tree root → seal hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashChainRule;

impl HashChainRule {
    const NAME: &'static str = "UnicitySealHashMatchesUnicityTreeRootHashRule";
}

impl VerificationRule for HashChainRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, context: &VerificationContext<'_>) -> VerificationResult {
        let certificate = context.certificate();

        let root = match certificate.unicity_tree_root() {
            Ok(Some(root)) => root,
            Ok(None) => {
                warn!("Shard tree path cannot be folded");
                return VerificationResult::fail(Self::NAME, "Shard tree path is malformed")
                    .with_error("sibling count does not match shard identifier length");
            },
            Err(e) => {
                return VerificationResult::fail(Self::NAME, "Input record could not be encoded")
                    .with_error(e.to_string());
            },
        };

        let sealed = &certificate.unicity_seal.hash;
        if constant_time_eq(&root, sealed) {
            debug!(root = %hex::encode(root), "Unicity tree root matches seal");
            VerificationResult::ok(Self::NAME, "Unicity seal hash matches tree root")
        } else {
            warn!(
                computed = %hex::encode(root),
                sealed = %hex::encode(sealed),
                "Unicity tree root mismatch"
            );
            VerificationResult::fail(Self::NAME, "Unicity seal hash does not match tree root").with_error(
                format!("computed {}, sealed {}", hex::encode(root), hex::encode(sealed)),
            )
        }
    }
}
