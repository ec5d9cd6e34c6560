//! Verification rules.
//!
//! A rule inspects the decoded proof and the trust base and returns a
//! [`VerificationResult`]. Rules never raise: every failure becomes a FAIL
//! node in the result tree. [`AggregatedRule`] composes rules and always
//! evaluates every child, so the tree is complete even after a failure.

mod hash_chain;
mod quorum;
mod result;
mod structure;

use tracing::debug;

use crate::certificate::{TransactionRecordWithProof, TrustBase, UnicityCertificate};

pub use hash_chain::HashChainRule;
pub use quorum::QuorumSignatureRule;
pub use result::{ResultCode, VerificationResult};
pub use structure::{SealEpochRule, ShardTreeDepthRule, VersionRule};

/// Inputs shared by every rule of one verification.
#[derive(Debug, Clone, Copy)]
pub struct VerificationContext<'a> {
    /// The decoded proof.
    pub proof: &'a TransactionRecordWithProof,
    /// Trust base for the seal's epoch.
    pub trust_base: &'a TrustBase,
}

impl<'a> VerificationContext<'a> {
    /// Bundle a proof with its trust base.
    #[must_use]
    pub fn new(proof: &'a TransactionRecordWithProof, trust_base: &'a TrustBase) -> Self {
        Self { proof, trust_base }
    }

    /// Shortcut to the proof's unicity certificate.
    #[must_use]
    pub fn certificate(&self) -> &'a UnicityCertificate {
        self.proof.unicity_certificate()
    }
}

/// A single verification check.
pub trait VerificationRule: Send + Sync {
    /// Stable rule name, used in the result tree.
    fn name(&self) -> &str;

    /// Evaluate the rule.
    fn evaluate(&self, context: &VerificationContext<'_>) -> VerificationResult;
}

/// Runs every child rule in order and fails if any child fails.
pub struct AggregatedRule {
    name: String,
    rules: Vec<Box<dyn VerificationRule>>,
}

impl AggregatedRule {
    /// Compose `rules` under `name`.
    pub fn new(name: impl Into<String>, rules: Vec<Box<dyn VerificationRule>>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Child rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Box<dyn VerificationRule>] {
        &self.rules
    }
}

impl VerificationRule for AggregatedRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, context: &VerificationContext<'_>) -> VerificationResult {
        let children: Vec<VerificationResult> = self
            .rules
            .iter()
            .map(|rule| rule.evaluate(context))
            .collect();

        let failed = children.iter().filter(|child| !child.is_ok()).count();
        debug!(rule = %self.name, children = children.len(), failed, "Aggregated rule evaluated");

        let result = if failed == 0 {
            VerificationResult::ok(&self.name, "All checks passed")
        } else {
            VerificationResult::fail(&self.name, format!("{failed} of {} checks failed", children.len()))
        };
        result.with_children(children)
    }
}

#[cfg(test)]
pub(crate) mod fixtures;
