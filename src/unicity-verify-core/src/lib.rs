//! # unicity-verify-core
//!
//! Offline verification of unicity certificates: proof that a shard's
//! state for a round is the one the root chain certified, checked without
//! trusting whoever delivered the proof.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   VerificationPolicy                         │
//! │                                                              │
//! │  hex / bytes ──► cbor::CborReader ──► certificate::*         │
//! │                                            │                 │
//! │                                            ▼                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐      │
//! │  │ Structure    │  │ HashChain    │  │ Quorum       │      │
//! │  │ (versions,   │  │ (IR → shard  │  │ (secp256k1,  │      │
//! │  │  depth)      │  │  → unicity)  │  │  threshold)  │      │
//! │  └──────────────┘  └──────────────┘  └──────────────┘      │
//! │                           │                                  │
//! │                           ▼                                  │
//! │                 VerificationResult tree                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              ▲
//!                  TrustBaseCache (per epoch)
//! ```
//!
//! ## Properties
//!
//! - **Canonical**: hashes are computed over re-encoded canonical CBOR
//! - **Complete**: every rule runs, the tree shows every failure
//! - **Pure**: no I/O, no clock, no network inside the engine

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::pedantic)] // Too strict for production code
#![allow(clippy::missing_errors_doc)] // Error documentation not required
#![allow(clippy::module_name_repetitions)] // Allow Type in module::Type
#![allow(clippy::must_use_candidate)] // Not all functions need must_use

pub mod bitstring;
pub mod cache;
pub mod cbor;
pub mod certificate;
pub mod config;
pub mod error;
pub mod merkle;
pub mod policy;
pub mod rule;

pub use bitstring::BitString;
pub use cache::TrustBaseCache;
pub use cbor::{CborDecode, CborEncode, CborReader, MajorType};
pub use certificate::{
    HashStep, InputRecord, MerkleChainItem, NodeInfo, ShardTreeCertificate, TransactionProof,
    TransactionRecordWithProof, TrustBase, UnicityCertificate, UnicitySeal,
    UnicityTreeCertificate,
};
pub use config::VerifyConfig;
pub use error::{DecodeError, EncodingError, TrustBaseError, VerifyError};
pub use policy::VerificationPolicy;
pub use rule::{
    AggregatedRule, ResultCode, VerificationContext, VerificationResult, VerificationRule,
};
