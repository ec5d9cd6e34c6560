//! Consistent proofs for rule unit tests.

use std::collections::BTreeMap;

use unicity_crypto::{DigestSigner, Secp256k1Signer};

use crate::bitstring::BitString;
use crate::certificate::{
    HashStep, InputRecord, MerkleChainItem, NodeInfo, ShardTreeCertificate, TransactionProof,
    TransactionRecordWithProof, TrustBase, UnicityCertificate, UnicitySeal,
    UnicityTreeCertificate,
};

pub const NODE_ID: &str = "node-1";

pub fn signer(seed: u8) -> Secp256k1Signer {
    Secp256k1Signer::from_bytes(&[seed; 32]).unwrap()
}

pub fn node(id: &str, signer: &Secp256k1Signer) -> NodeInfo {
    NodeInfo {
        id: id.to_owned(),
        public_key: signer.public_key(),
        stake: 1,
    }
}

/// Sign the seal of `proof` as `id`.
pub fn sign(proof: &mut TransactionRecordWithProof, id: &str, signer: &Secp256k1Signer) {
    let seal = &mut proof.transaction_proof.unicity_certificate.unicity_seal;
    let signature = signer.sign_digest(&seal.signing_digest()).unwrap();
    seal.signatures.insert(id.to_owned(), signature);
}

/// Unsigned proof whose seal commits to the correct unicity tree root.
pub fn unsigned_proof() -> TransactionRecordWithProof {
    let mut certificate = UnicityCertificate {
        version: 1,
        input_record: InputRecord {
            version: 1,
            round_number: 42,
            epoch: 0,
            previous_hash: Some([0x10; 32]),
            hash: Some([0x11; 32]),
            block_hash: Some([0x12; 32]),
            summary_value: vec![0; 8],
            timestamp: 1_700_000_000,
            sum_of_earned_fees: 0,
            executed_transactions_hash: Some([0x13; 32]),
        },
        technical_record_hash: None,
        shard_configuration_hash: [0x20; 32],
        shard_tree_certificate: ShardTreeCertificate {
            shard: BitString::from_bits(&[true, false]),
            sibling_hashes: vec![[0x30; 32], [0x31; 32]],
        },
        unicity_tree_certificate: UnicityTreeCertificate {
            partition_identifier: 5,
            partition_description_hash: [0x40; 32],
            hash_steps: vec![
                HashStep {
                    key: 3u32.to_be_bytes().to_vec(),
                    hash: [0x41; 32],
                },
                HashStep {
                    key: 9u32.to_be_bytes().to_vec(),
                    hash: [0x42; 32],
                },
            ],
        },
        unicity_seal: UnicitySeal {
            version: 1,
            network_id: 3,
            root_chain_round_number: 7,
            epoch: 0,
            timestamp: 1_700_000_001,
            previous_hash: Some([0x50; 32]),
            hash: [0; 32],
            signatures: BTreeMap::new(),
        },
    };
    certificate.unicity_seal.hash = certificate.unicity_tree_root().unwrap().unwrap();

    TransactionRecordWithProof {
        // [1, "tx"]
        transaction_record: vec![0x82, 0x01, 0x62, b't', b'x'],
        transaction_proof: TransactionProof {
            block_header_hash: [0x60; 32],
            merkle_chain: vec![MerkleChainItem {
                left: false,
                hash: [0x61; 32],
            }],
            unicity_certificate: certificate,
        },
    }
}

/// Proof signed by [`NODE_ID`] and a trust base requiring that signature.
pub fn signed_proof() -> (TransactionRecordWithProof, TrustBase) {
    let key = signer(0x11);
    let mut proof = unsigned_proof();
    sign(&mut proof, NODE_ID, &key);
    let trust_base = TrustBase::new(0, 1, vec![node(NODE_ID, &key)]).unwrap();
    (proof, trust_base)
}
