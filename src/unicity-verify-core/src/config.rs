//! Configuration for the verification policy and the trust base cache.

use serde::{Deserialize, Serialize};

/// Configuration for proof verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerifyConfig {
    /// Accepted unicity certificate versions.
    pub certificate_versions: Vec<u32>,
    /// Accepted input record versions.
    pub input_record_versions: Vec<u32>,
    /// Accepted unicity seal versions.
    pub seal_versions: Vec<u32>,
    /// Largest encoded proof accepted, in bytes.
    pub max_proof_size: usize,
    /// Epochs kept in the trust base cache behind the newest one.
    pub retained_epochs: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            certificate_versions: vec![1],
            input_record_versions: vec![1],
            seal_versions: vec![1],
            max_proof_size: 1024 * 1024, // 1 MiB
            retained_epochs: 2,
        }
    }
}
