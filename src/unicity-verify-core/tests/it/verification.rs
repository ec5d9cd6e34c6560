//! End-to-end verification through the policy.

use proptest::prelude::*;

use unicity_verify_core::rule::HashChainRule;
use unicity_verify_core::{
    CborEncode, DecodeError, ResultCode, TransactionRecordWithProof, TrustBase, TrustBaseCache,
    VerificationContext, VerificationPolicy, VerificationResult, VerificationRule, VerifyError,
};

use crate::fixtures::{self, ROOT_NODES};

const HASH_CHAIN: &str = "UnicitySealHashMatchesUnicityTreeRootHashRule";
const QUORUM: &str = "UnicitySealQuorumSignaturesVerificationRule";

fn stage<'a>(result: &'a VerificationResult, rule: &str) -> &'a VerificationResult {
    result
        .find(rule)
        .unwrap_or_else(|| panic!("no {rule} in\n{result}"))
}

fn hash_chain(proof: &TransactionRecordWithProof) -> VerificationResult {
    let trust_base = fixtures::trust_base(1, 1);
    HashChainRule.evaluate(&VerificationContext::new(proof, &trust_base))
}

// ============================================================================
// Hash chain
// ============================================================================

#[test]
fn hash_chain_fixture_passes() {
    let result = hash_chain(&fixtures::unsigned_proof());
    assert_eq!(result.code, ResultCode::Ok, "{result}");
}

#[test]
fn any_flipped_sibling_bit_fails_hash_chain() {
    let proof = fixtures::unsigned_proof();
    let certificate = &proof.transaction_proof.unicity_certificate;

    for sibling in 0..certificate.shard_tree_certificate.sibling_hashes.len() {
        for bit in 0..256 {
            let mut tampered = proof.clone();
            tampered.transaction_proof.unicity_certificate.shard_tree_certificate.sibling_hashes
                [sibling][bit / 8] ^= 1 << (bit % 8);
            let result = hash_chain(&tampered);
            assert_eq!(result.code, ResultCode::Fail, "shard sibling {sibling} bit {bit}");
            assert_eq!(result.message, "Unicity seal hash does not match tree root");
        }
    }

    for step in 0..certificate.unicity_tree_certificate.hash_steps.len() {
        for bit in 0..256 {
            let mut tampered = proof.clone();
            tampered.transaction_proof.unicity_certificate.unicity_tree_certificate.hash_steps
                [step]
                .hash[bit / 8] ^= 1 << (bit % 8);
            assert_eq!(hash_chain(&tampered).code, ResultCode::Fail, "step {step} bit {bit}");
        }
    }
}

#[test]
fn shard_bit_and_partition_are_committed() {
    let proof = fixtures::unsigned_proof();

    let mut other_shard = proof.clone();
    other_shard.transaction_proof.unicity_certificate.shard_tree_certificate.shard =
        unicity_verify_core::BitString::from_bits(&[true, true, true]);
    assert_eq!(hash_chain(&other_shard).code, ResultCode::Fail);

    let mut other_partition = proof;
    other_partition
        .transaction_proof
        .unicity_certificate
        .unicity_tree_certificate
        .partition_identifier += 1;
    assert_eq!(hash_chain(&other_partition).code, ResultCode::Fail);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    /// Any change to the certified input record breaks the chain.
    #[test]
    fn input_record_changes_fail(round in any::<u64>(), fees in any::<u64>()) {
        let mut proof = fixtures::unsigned_proof();
        let record = &mut proof.transaction_proof.unicity_certificate.input_record;
        prop_assume!(round != record.round_number || fees != record.sum_of_earned_fees);
        record.round_number = round;
        record.sum_of_earned_fees = fees;
        prop_assert_eq!(hash_chain(&proof).code, ResultCode::Fail);
    }
}

// ============================================================================
// Quorum
// ============================================================================

#[test]
fn one_signature_meets_threshold_one() {
    let result = VerificationPolicy::new().verify(&fixtures::signed_proof(), &fixtures::trust_base(1, 1));
    assert_eq!(result.code, ResultCode::Ok, "{result}");
    assert_eq!(stage(&result, QUORUM).children.len(), 1);
}

#[test]
fn unsigned_seal_fails_quorum() {
    let result = VerificationPolicy::new().verify(&fixtures::unsigned_proof(), &fixtures::trust_base(1, 1));
    assert_eq!(result.code, ResultCode::Fail);

    let quorum = stage(&result, QUORUM);
    assert_eq!(quorum.code, ResultCode::Fail);
    assert!(quorum.children.is_empty());
    assert_eq!(stage(&result, HASH_CHAIN).code, ResultCode::Ok);
}

#[test]
fn one_signature_misses_threshold_two() {
    let result = VerificationPolicy::new().verify(&fixtures::signed_proof(), &fixtures::trust_base(2, 2));
    let quorum = stage(&result, QUORUM);
    assert_eq!(quorum.code, ResultCode::Fail);
    assert_eq!(quorum.message, "1 of 2 required signatures verified");
}

#[test]
fn two_signatures_meet_threshold_two() {
    let mut proof = fixtures::signed_proof();
    let (id, seed) = ROOT_NODES[1];
    fixtures::sign(&mut proof, id, seed);

    let result = VerificationPolicy::new().verify(&proof, &fixtures::trust_base(3, 2));
    assert_eq!(result.code, ResultCode::Ok, "{result}");
}

#[test]
fn unknown_node_fails_only_its_own_check() {
    let mut proof = fixtures::signed_proof();
    fixtures::sign(&mut proof, "intruder", 0x66);

    let result = VerificationPolicy::new().verify(&proof, &fixtures::trust_base(1, 1));
    let quorum = stage(&result, QUORUM);
    assert_eq!(quorum.code, ResultCode::Ok, "{result}");

    let intruder = stage(quorum, "SignatureVerificationRule[intruder]");
    assert_eq!(intruder.code, ResultCode::Fail);
    assert_eq!(intruder.message, "Unknown root node intruder");
    assert_eq!(stage(quorum, "SignatureVerificationRule[root-a]").code, ResultCode::Ok);
}

#[test]
fn signature_from_wrong_key_fails() {
    let mut proof = fixtures::unsigned_proof();
    // root-a's id, root-b's key
    fixtures::sign(&mut proof, ROOT_NODES[0].0, ROOT_NODES[1].1);

    let result = VerificationPolicy::new().verify(&proof, &fixtures::trust_base(2, 1));
    let quorum = stage(&result, QUORUM);
    assert_eq!(quorum.code, ResultCode::Fail);
    assert_eq!(quorum.children[0].message, "Signature is invalid");
}

#[test]
fn compact_signature_without_recovery_byte_verifies() {
    let mut proof = fixtures::signed_proof();
    let seal = &mut proof.transaction_proof.unicity_certificate.unicity_seal;
    for signature in seal.signatures.values_mut() {
        assert_eq!(signature.len(), 65);
        signature.truncate(64);
    }
    let result = VerificationPolicy::new().verify(&proof, &fixtures::trust_base(1, 1));
    assert_eq!(result.code, ResultCode::Ok, "{result}");
}

// ============================================================================
// Policy
// ============================================================================

#[test]
fn hex_proof_verifies_end_to_end() {
    let encoded = fixtures::to_hex(&fixtures::signed_proof());
    // Line-wrapped hex, as a proof file would hold it.
    let wrapped: String = encoded
        .as_bytes()
        .chunks(64)
        .map(|line| format!("{}\n", std::str::from_utf8(line).unwrap()))
        .collect();

    let proof = TransactionRecordWithProof::from_hex(&wrapped).unwrap();
    assert_eq!(proof, fixtures::signed_proof());

    let bytes = hex::decode(&encoded).unwrap();
    let result = VerificationPolicy::new()
        .verify_bytes(&bytes, &fixtures::trust_base(1, 1))
        .unwrap();
    assert_eq!(result.code, ResultCode::Ok, "{result}");
}

#[test]
fn non_canonical_proof_is_a_decode_error() {
    let mut proof = fixtures::signed_proof();
    // [1] with the element in the one-byte argument form
    proof.transaction_record = vec![0x81, 0x18, 0x01];
    let bytes = proof.to_cbor().unwrap();

    let err = VerificationPolicy::new()
        .verify_bytes(&bytes, &fixtures::trust_base(1, 1))
        .unwrap_err();
    assert!(matches!(err, VerifyError::Decode(DecodeError::Malformed { .. })), "{err}");
}

#[test]
fn decoded_proof_reencodes_identically() {
    let bytes = fixtures::signed_proof().to_cbor().unwrap();
    let policy = VerificationPolicy::new();
    let decoded = policy.decode(&bytes).unwrap();
    assert_eq!(decoded.to_cbor().unwrap(), bytes);
}

#[test]
fn truncated_proof_is_a_decode_error() {
    let bytes = fixtures::signed_proof().to_cbor().unwrap();
    let err = VerificationPolicy::new()
        .verify_bytes(&bytes[..bytes.len() - 1], &fixtures::trust_base(1, 1))
        .unwrap_err();
    assert!(matches!(err, VerifyError::Decode(_)), "{err}");
    assert!(err.is_malformed_proof());
}

#[test]
fn failures_in_every_stage_are_all_reported() {
    let mut proof = fixtures::unsigned_proof();
    let certificate = &mut proof.transaction_proof.unicity_certificate;
    certificate.unicity_seal.version = 7;
    certificate.input_record.round_number += 1;

    let result = VerificationPolicy::new().verify(&proof, &fixtures::trust_base(1, 1));
    assert_eq!(result.code, ResultCode::Fail);
    assert_eq!(result.children.len(), 3);
    assert_eq!(stage(&result, "UnicitySealVersionRule").code, ResultCode::Fail);
    assert_eq!(stage(&result, "UnicityCertificateVersionRule").code, ResultCode::Ok);
    assert_eq!(stage(&result, HASH_CHAIN).code, ResultCode::Fail);
    assert_eq!(stage(&result, QUORUM).code, ResultCode::Fail);
}

#[test]
fn seal_epoch_mismatch_only_warns() {
    let nodes = fixtures::trust_base(1, 1).nodes().to_vec();
    let next_epoch = TrustBase::new(1, 1, nodes).unwrap();

    let result = VerificationPolicy::new().verify(&fixtures::signed_proof(), &next_epoch);
    assert_eq!(result.code, ResultCode::Ok, "{result}");
    assert_eq!(stage(&result, "SealEpochRule").code, ResultCode::Warning);
}

#[test]
fn cache_resolves_trust_base_by_seal_epoch() {
    let proof = fixtures::signed_proof();
    let policy = VerificationPolicy::new();
    let cache = TrustBaseCache::from_config(policy.config());

    assert_eq!(policy.verify_with_cache(&proof, &cache).code, ResultCode::Fail);

    cache.put(fixtures::trust_base(1, 1));
    assert!(policy.verify_with_cache(&proof, &cache).is_ok());

    cache.invalidate(0);
    assert_eq!(policy.verify_with_cache(&proof, &cache).code, ResultCode::Fail);
}

#[test]
fn result_tree_serializes_to_json() {
    let result = VerificationPolicy::new().verify(&fixtures::signed_proof(), &fixtures::trust_base(1, 1));
    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["code"], "OK");
    assert_eq!(json["rule"], "VerificationPolicy");
    assert_eq!(json["children"].as_array().unwrap().len(), 3);
}

#[test]
fn merkle_chain_is_decoded() {
    let proof = fixtures::signed_proof();
    let leaf = proof.transaction_hash();
    let root = proof.transaction_proof.chain_root(leaf);
    assert_ne!(root, leaf);

    assert_eq!(proof.transaction_root(), root);

    let mut reordered = proof.clone();
    reordered.transaction_proof.merkle_chain.reverse();
    assert_ne!(reordered.transaction_proof.chain_root(leaf), root);
}
