//! # Verify Subcommand
//!
//! Checks a proof package against an asserted identity claim and applies
//! the age requirement. Prints `VALID:` or `INVALID:` with the caller-facing
//! message and returns [`EXIT_REJECTED`](crate::EXIT_REJECTED) for any
//! rejection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nikzk_core::{ProofPackage, VerificationClaim};
use nikzk_zkp::verify_submission;

use crate::{CliContext, EXIT_REJECTED};

/// Arguments for the `nikzk verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Proof package produced by `nikzk prove`.
    #[arg(value_name = "PACKAGE")]
    pub package: PathBuf,

    /// Asserted identity number.
    #[arg(long)]
    pub nik: String,

    /// Asserted full name.
    #[arg(long)]
    pub name: String,

    /// Asserted date of birth, DD-MM-YYYY.
    #[arg(long)]
    pub dob: String,

    /// Override the configured minimum age.
    #[arg(long)]
    pub min_age: Option<u32>,

    /// Evaluate age as of this year instead of the current one.
    #[arg(long)]
    pub current_year: Option<i32>,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs, ctx: &CliContext) -> Result<u8> {
    let bytes = std::fs::read(&args.package)
        .with_context(|| format!("failed to read file: {}", args.package.display()))?;
    let package = ProofPackage::from_slice(&bytes)
        .with_context(|| format!("failed to parse proof package: {}", args.package.display()))?;
    let claim = VerificationClaim::new(&args.nik, &args.name, &args.dob)?;

    let mut admission_config = ctx.settings.admission;
    if let Some(min_age) = args.min_age {
        admission_config.min_age = min_age;
    }
    if let Some(year) = args.current_year {
        admission_config.current_year = Some(year);
    }
    let admission = admission_config.policy();

    let outcome = verify_submission(
        &claim,
        &package,
        ctx.backend.as_ref(),
        &ctx.proof_policy,
        &admission,
    )?;

    let message = outcome.message(admission.min_age);
    if outcome.is_admitted() {
        println!("VALID: {message}");
        Ok(0)
    } else {
        println!("INVALID: {message}");
        Ok(EXIT_REJECTED)
    }
}
