//! Structural checks on the decoded certificate.

use tracing::{debug, warn};

use super::{VerificationContext, VerificationResult, VerificationRule};

/// Checks a version field against an allow-list.
pub struct VersionRule {
    name: &'static str,
    field: &'static str,
    allowed: Vec<u32>,
    extract: fn(&VerificationContext<'_>) -> u32,
}

impl VersionRule {
    /// Unicity certificate version.
    pub fn certificate(allowed: Vec<u32>) -> Self {
        Self {
            name: "UnicityCertificateVersionRule",
            field: "Unicity certificate",
            allowed,
            extract: |context| context.certificate().version,
        }
    }

    /// Input record version.
    pub fn input_record(allowed: Vec<u32>) -> Self {
        Self {
            name: "InputRecordVersionRule",
            field: "Input record",
            allowed,
            extract: |context| context.certificate().input_record.version,
        }
    }

    /// Unicity seal version.
    pub fn seal(allowed: Vec<u32>) -> Self {
        Self {
            name: "UnicitySealVersionRule",
            field: "Unicity seal",
            allowed,
            extract: |context| context.certificate().unicity_seal.version,
        }
    }
}

impl VerificationRule for VersionRule {
    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(&self, context: &VerificationContext<'_>) -> VerificationResult {
        let version = (self.extract)(context);
        if self.allowed.contains(&version) {
            debug!(rule = self.name, version, "Version accepted");
            VerificationResult::ok(self.name, format!("{} version {version} is supported", self.field))
        } else {
            warn!(rule = self.name, version, allowed = ?self.allowed, "Unsupported version");
            VerificationResult::fail(
                self.name,
                format!("{} version {version} is not supported", self.field),
            )
            .with_error(format!("allowed versions: {:?}", self.allowed))
        }
    }
}

/// Shard tree sibling count must equal the shard identifier's bit length.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShardTreeDepthRule;

impl VerificationRule for ShardTreeDepthRule {
    fn name(&self) -> &str {
        "ShardTreeDepthRule"
    }

    fn evaluate(&self, context: &VerificationContext<'_>) -> VerificationResult {
        let stc = &context.certificate().shard_tree_certificate;
        if stc.is_well_formed() {
            return VerificationResult::ok(
                self.name(),
                format!("Shard {} has a path of matching depth", stc.shard),
            );
        }
        warn!(shard_bits = stc.shard.len(), siblings = stc.sibling_hashes.len(), "Shard path depth mismatch");
        VerificationResult::fail(self.name(), "Shard tree path length does not match shard identifier")
            .with_error(format!(
                "{} sibling hashes for a {}-bit shard identifier",
                stc.sibling_hashes.len(),
                stc.shard.len()
            ))
    }
}

/// Warns when the seal was produced in a different epoch than the trust
/// base describes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SealEpochRule;

impl VerificationRule for SealEpochRule {
    fn name(&self) -> &str {
        "SealEpochRule"
    }

    fn evaluate(&self, context: &VerificationContext<'_>) -> VerificationResult {
        let seal_epoch = context.certificate().unicity_seal.epoch;
        let trust_epoch = context.trust_base.epoch();
        if seal_epoch == trust_epoch {
            VerificationResult::ok(self.name(), format!("Seal epoch {seal_epoch} matches trust base"))
        } else {
            warn!(seal_epoch, trust_epoch, "Seal epoch differs from trust base");
            VerificationResult::warning(
                self.name(),
                format!("Seal epoch {seal_epoch} differs from trust base epoch {trust_epoch}"),
            )
        }
    }
}
