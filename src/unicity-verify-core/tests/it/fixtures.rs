//! Proof fixtures built through the public API.
//!
//! Proofs are assembled with the encoder and signed with fixed secp256k1
//! keys, so every run produces the same bytes.

use std::collections::BTreeMap;

use unicity_crypto::{DigestSigner, Secp256k1Signer};
use unicity_verify_core::cbor::{encode_array, encode_text_string, encode_unsigned_integer};
use unicity_verify_core::{
    BitString, CborEncode, HashStep, InputRecord, MerkleChainItem, NodeInfo,
    ShardTreeCertificate, TransactionProof, TransactionRecordWithProof, TrustBase,
    UnicityCertificate, UnicitySeal, UnicityTreeCertificate,
};

/// Root node ids with the seed of their signing key.
pub const ROOT_NODES: [(&str, u8); 3] = [("root-a", 0x21), ("root-b", 0x22), ("root-c", 0x23)];

pub fn signer(seed: u8) -> Secp256k1Signer {
    Secp256k1Signer::from_bytes(&[seed; 32]).expect("fixed key is a valid scalar")
}

pub fn node_info(id: &str, seed: u8) -> NodeInfo {
    NodeInfo {
        id: id.to_owned(),
        public_key: signer(seed).public_key(),
        stake: 100,
    }
}

/// Trust base over the first `nodes` root nodes.
pub fn trust_base(nodes: usize, quorum_threshold: u64) -> TrustBase {
    let roster = ROOT_NODES[..nodes]
        .iter()
        .map(|(id, seed)| node_info(id, *seed))
        .collect();
    TrustBase::new(0, quorum_threshold, roster).expect("valid roster")
}

fn transaction_record() -> Vec<u8> {
    encode_array(&[
        encode_unsigned_integer(1u8).unwrap(),
        encode_text_string("transfer"),
        encode_array::<Vec<u8>>(&[]),
    ])
}

/// Proof with a consistent hash chain and no signatures.
pub fn unsigned_proof() -> TransactionRecordWithProof {
    let mut certificate = UnicityCertificate {
        version: 1,
        input_record: InputRecord {
            version: 1,
            round_number: 1_337,
            epoch: 0,
            previous_hash: Some([0xa0; 32]),
            hash: Some([0xa1; 32]),
            block_hash: Some([0xa2; 32]),
            summary_value: 500u64.to_be_bytes().to_vec(),
            timestamp: 1_722_000_000,
            sum_of_earned_fees: 12,
            executed_transactions_hash: None,
        },
        technical_record_hash: Some([0xb0; 32]),
        shard_configuration_hash: [0xb1; 32],
        shard_tree_certificate: ShardTreeCertificate {
            shard: BitString::from_bits(&[false, true, true]),
            sibling_hashes: vec![[0xc0; 32], [0xc1; 32], [0xc2; 32]],
        },
        unicity_tree_certificate: UnicityTreeCertificate {
            partition_identifier: 0x0000_0103,
            partition_description_hash: [0xd0; 32],
            hash_steps: vec![
                HashStep {
                    key: 0x0000_0104u32.to_be_bytes().to_vec(),
                    hash: [0xd1; 32],
                },
                HashStep {
                    key: 0x0000_0001u32.to_be_bytes().to_vec(),
                    hash: [0xd2; 32],
                },
                HashStep {
                    key: 0x0000_0200u32.to_be_bytes().to_vec(),
                    hash: [0xd3; 32],
                },
            ],
        },
        unicity_seal: UnicitySeal {
            version: 1,
            network_id: 3,
            root_chain_round_number: 88_000,
            epoch: 0,
            timestamp: 1_722_000_005,
            previous_hash: Some([0xe0; 32]),
            hash: [0; 32],
            signatures: BTreeMap::new(),
        },
    };
    certificate.unicity_seal.hash = certificate
        .unicity_tree_root()
        .expect("encodable")
        .expect("well-formed shard path");

    TransactionRecordWithProof {
        transaction_record: transaction_record(),
        transaction_proof: TransactionProof {
            block_header_hash: [0xf0; 32],
            merkle_chain: vec![
                MerkleChainItem {
                    left: true,
                    hash: [0xf1; 32],
                },
                MerkleChainItem {
                    left: false,
                    hash: [0xf2; 32],
                },
            ],
            unicity_certificate: certificate,
        },
    }
}

/// Add a signature from root node `id` over the proof's seal.
pub fn sign(proof: &mut TransactionRecordWithProof, id: &str, seed: u8) {
    let seal = &mut proof.transaction_proof.unicity_certificate.unicity_seal;
    let signature = signer(seed)
        .sign_digest(&seal.signing_digest())
        .expect("signing a 32-byte digest");
    seal.signatures.insert(id.to_owned(), signature);
}

/// Proof signed by the first root node.
pub fn signed_proof() -> TransactionRecordWithProof {
    let mut proof = unsigned_proof();
    let (id, seed) = ROOT_NODES[0];
    sign(&mut proof, id, seed);
    proof
}

pub fn to_hex(proof: &TransactionRecordWithProof) -> String {
    hex::encode(proof.to_cbor().expect("fixture encodes"))
}
