//! Tests for the `unicity-verify` binary.

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

use crate::fixtures;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_unicity-verify"))
        .args(args)
        .output()
        .unwrap()
}

fn inputs(proof: &unicity_verify_core::TransactionRecordWithProof) -> (NamedTempFile, NamedTempFile) {
    let proof = write_temp(&fixtures::to_hex(proof));
    let trust_base = write_temp(&serde_json::to_string(&fixtures::trust_base(1, 1)).unwrap());
    (proof, trust_base)
}

#[test]
fn verify_valid_proof_exits_zero() {
    let (proof, trust_base) = inputs(&fixtures::signed_proof());
    let output = run(&[
        "verify",
        "--proof",
        proof.path().to_str().unwrap(),
        "--trust-base",
        trust_base.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("[OK] VerificationPolicy"), "{stdout}");
}

#[test]
fn verify_rejected_proof_exits_one_with_json() {
    let (proof, trust_base) = inputs(&fixtures::unsigned_proof());
    let output = run(&[
        "verify",
        "--format",
        "json",
        "--proof",
        proof.path().to_str().unwrap(),
        "--trust-base",
        trust_base.path().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["code"], "FAIL");
}

#[test]
fn unreadable_proof_exits_two() {
    let trust_base = write_temp(&serde_json::to_string(&fixtures::trust_base(1, 1)).unwrap());
    let proof = write_temp("not hex");
    let output = run(&[
        "verify",
        "--proof",
        proof.path().to_str().unwrap(),
        "--trust-base",
        trust_base.path().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("decoding proof"));
}

#[test]
fn oversized_proof_is_rejected_before_decoding() {
    let trust_base = write_temp(&serde_json::to_string(&fixtures::trust_base(1, 1)).unwrap());
    // Valid hex, one byte over the default 1 MiB limit.
    let proof = write_temp(&"00".repeat(1024 * 1024 + 1));
    let output = run(&[
        "verify",
        "--proof",
        proof.path().to_str().unwrap(),
        "--trust-base",
        trust_base.path().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("exceeds limit"));
}

#[test]
fn inspect_prints_certificate_summary() {
    let proof = write_temp(&fixtures::to_hex(&fixtures::signed_proof()));
    let output = run(&["inspect", "--format", "json", "--proof", proof.path().to_str().unwrap()]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["partitionIdentifier"], 0x103);
    assert_eq!(json["shard"], "011");
    assert_eq!(json["signers"][0], "root-a");

    let signed = fixtures::signed_proof();
    assert_eq!(json["transactionRoot"], hex::encode(signed.transaction_root()));
}
