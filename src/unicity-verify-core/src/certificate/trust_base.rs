//! Root chain trust base: the validator roster for one epoch.
//!
//! Loaded from JSON:
//!
//! ```json
//! {
//!   "epoch": 0,
//!   "quorumThreshold": 1,
//!   "nodes": [{ "id": "node-1", "publicKey": "03…", "stake": 1 }]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TrustBaseError, VerifyError};

/// One root validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    /// Node identifier, as used in seal signature maps.
    pub id: String,
    /// SEC1-encoded secp256k1 public key.
    #[serde(with = "hex_bytes")]
    pub public_key: Vec<u8>,
    /// Stake weight.
    #[serde(default)]
    pub stake: u64,
}

/// Validated validator roster and quorum threshold for one epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTrustBase")]
pub struct TrustBase {
    epoch: u64,
    quorum_threshold: u64,
    nodes: Vec<NodeInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrustBase {
    epoch: u64,
    quorum_threshold: u64,
    nodes: Vec<NodeInfo>,
}

impl TryFrom<RawTrustBase> for TrustBase {
    type Error = TrustBaseError;

    fn try_from(raw: RawTrustBase) -> Result<Self, Self::Error> {
        Self::new(raw.epoch, raw.quorum_threshold, raw.nodes)
    }
}

impl TrustBase {
    /// Build a trust base, rejecting rosters that could never produce a
    /// meaningful quorum.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero threshold, a threshold above the roster
    /// size, duplicate node ids or empty public keys.
    pub fn new(
        epoch: u64,
        quorum_threshold: u64,
        nodes: Vec<NodeInfo>,
    ) -> Result<Self, TrustBaseError> {
        if quorum_threshold == 0 {
            return Err(TrustBaseError::ZeroQuorumThreshold);
        }
        if quorum_threshold > nodes.len() as u64 {
            return Err(TrustBaseError::QuorumExceedsRoster {
                threshold: quorum_threshold,
                nodes: nodes.len(),
            });
        }

        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(TrustBaseError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
            if node.public_key.is_empty() {
                return Err(TrustBaseError::EmptyPublicKey {
                    id: node.id.clone(),
                });
            }
        }

        Ok(Self {
            epoch,
            quorum_threshold,
            nodes,
        })
    }

    /// Parse and validate a JSON trust base.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidInput`] for malformed JSON or an
    /// invalid roster.
    pub fn from_json(json: &str) -> Result<Self, VerifyError> {
        serde_json::from_str(json).map_err(|e| VerifyError::InvalidInput {
            message: format!("trust base: {e}"),
        })
    }

    /// Load a JSON trust base from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VerifyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Epoch this roster is valid for.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of valid signatures required.
    #[must_use]
    pub fn quorum_threshold(&self) -> u64 {
        self.quorum_threshold
    }

    /// Roster in declaration order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeInfo] {
        &self.nodes
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&NodeInfo> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(text.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}
