//! unicity-verify CLI - offline verification of unicity proofs.
//!
//! Reads a hex-encoded transaction record with proof and a JSON trust base,
//! runs the verification policy and prints the result tree.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use unicity_verify_core::certificate::decode_hex;
use unicity_verify_core::{TransactionRecordWithProof, TrustBase, VerificationPolicy};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// unicity-verify - check that a transaction proof is anchored in a
/// root chain certified round.
///
/// Verification is fully offline: the proof and the trust base are read
/// from local files and nothing is fetched.
#[derive(Parser)]
#[command(name = "unicity-verify")]
#[command(version = VERSION)]
#[command(about = "Offline verification of unicity certificates")]
#[command(long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a proof against a trust base
    Verify {
        /// Hex file with the transaction record and proof
        #[arg(long)]
        proof: PathBuf,

        /// JSON trust base
        #[arg(long)]
        trust_base: PathBuf,
    },

    /// Decode a proof and print its certificate summary
    Inspect {
        /// Hex file with the transaction record and proof
        #[arg(long)]
        proof: PathBuf,
    },
}

fn read_proof(policy: &VerificationPolicy, path: &Path) -> Result<TransactionRecordWithProof> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading proof {}", path.display()))?;
    decode_hex(&text)
        .and_then(|bytes| policy.decode(&bytes))
        .with_context(|| format!("decoding proof {}", path.display()))
}

fn run_verify(proof: &Path, trust_base: &Path, format: Format) -> Result<bool> {
    let policy = VerificationPolicy::new();
    let proof = read_proof(&policy, proof)?;
    let trust_base = TrustBase::load(trust_base)
        .with_context(|| format!("loading trust base {}", trust_base.display()))?;

    let result = policy.verify(&proof, &trust_base);
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Text => print!("{result}"),
    }
    Ok(result.is_ok())
}

fn run_inspect(proof: &Path, format: Format) -> Result<()> {
    let proof = read_proof(&VerificationPolicy::new(), proof)?;
    let uc = proof.unicity_certificate();
    let ir = &uc.input_record;
    let seal = &uc.unicity_seal;
    let signers: Vec<&str> = seal.signatures.keys().map(String::as_str).collect();

    match format {
        Format::Json => {
            let output = serde_json::json!({
                "transactionHash": hex::encode(proof.transaction_hash()),
                "transactionRoot": hex::encode(proof.transaction_root()),
                "blockHeaderHash": hex::encode(proof.transaction_proof.block_header_hash),
                "certificateVersion": uc.version,
                "partitionIdentifier": uc.unicity_tree_certificate.partition_identifier,
                "shard": uc.shard_tree_certificate.shard.to_string(),
                "roundNumber": ir.round_number,
                "shardEpoch": ir.epoch,
                "rootChainRoundNumber": seal.root_chain_round_number,
                "sealEpoch": seal.epoch,
                "sealHash": hex::encode(seal.hash),
                "signers": signers,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        },
        Format::Text => {
            println!("Transaction hash:      {}", hex::encode(proof.transaction_hash()));
            println!("Transaction root:      {}", hex::encode(proof.transaction_root()));
            println!("Block header hash:     {}", hex::encode(proof.transaction_proof.block_header_hash));
            println!("Certificate version:   {}", uc.version);
            println!("Partition:             {}", uc.unicity_tree_certificate.partition_identifier);
            println!("Shard:                 {}", uc.shard_tree_certificate.shard);
            println!("Shard round / epoch:   {} / {}", ir.round_number, ir.epoch);
            println!("Root round / epoch:    {} / {}", seal.root_chain_round_number, seal.epoch);
            println!("Seal hash:             {}", hex::encode(seal.hash));
            println!("Signers:               {}", signers.join(", "));
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable.
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match &cli.command {
        Commands::Verify { proof, trust_base } => run_verify(proof, trust_base, cli.format),
        Commands::Inspect { proof } => run_inspect(proof, cli.format).map(|()| true),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        },
    }
}
