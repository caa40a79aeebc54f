//! # Canonicalize Subcommand
//!
//! Prints the witness-generator input for an identity document without
//! running any tool. Useful for checking that two parties canonicalize the
//! same card identically.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nikzk_core::build_circuit_inputs;

/// Arguments for the `nikzk canonicalize` subcommand.
#[derive(Args, Debug)]
pub struct CanonicalizeArgs {
    /// Identity document (JSON with `nik`, `nama`, `tanggal_lahir`).
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Write the inputs to this file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Execute the canonicalize subcommand.
pub fn run_canonicalize(args: &CanonicalizeArgs) -> Result<u8> {
    let document = crate::read_document(&args.document)?;
    let claim = document.to_claim()?;
    let inputs = build_circuit_inputs(&claim);
    let json = serde_json::to_string_pretty(&inputs)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("OK: wrote circuit inputs to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(0)
}
