//! # Prove Subcommand
//!
//! Runs the prove pipeline for an identity document and writes the proof
//! package next to it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nikzk_core::PROOF_PACKAGE_FILENAME;
use nikzk_zkp::prove_identity;

use crate::CliContext;

/// Arguments for the `nikzk prove` subcommand.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Identity document (JSON with `nik`, `nama`, `tanggal_lahir`).
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Where to write the proof package.
    #[arg(long, short, default_value = PROOF_PACKAGE_FILENAME)]
    pub output: PathBuf,
}

/// Execute the prove subcommand.
pub fn run_prove(args: &ProveArgs, ctx: &CliContext) -> Result<u8> {
    let document = crate::read_document(&args.document)?;
    let package = prove_identity(&document, ctx.backend.as_ref(), &ctx.proof_policy)
        .with_context(|| format!("failed to prove {}", args.document.display()))?;

    let json = package.to_pretty_json()?;
    std::fs::write(&args.output, json.as_bytes())
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "OK: wrote proof package to {} ({} public signals)",
        args.output.display(),
        package.public_signals.len()
    );
    Ok(0)
}
