//! # nikzk CLI Entry Point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nikzk_cli::canonicalize::{run_canonicalize, CanonicalizeArgs};
use nikzk_cli::prove::{run_prove, ProveArgs};
use nikzk_cli::verify::{run_verify, VerifyArgs};
use nikzk_cli::CliContext;

/// Zero-knowledge identity claims for national identity cards.
#[derive(Parser, Debug)]
#[command(name = "nikzk", version, about, long_about = None)]
struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Proof backend: `snarkjs` or `mock`.
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the circuit inputs derived from an identity document.
    Canonicalize(CanonicalizeArgs),

    /// Generate a proof package from an identity document.
    Prove(ProveArgs),

    /// Check a proof package against an asserted identity and age.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match dispatch(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn dispatch(cli: &Cli) -> Result<u8> {
    match &cli.command {
        Commands::Canonicalize(args) => run_canonicalize(args),
        Commands::Prove(args) => {
            let ctx = CliContext::load(cli.config.as_deref(), cli.backend.as_deref())?;
            run_prove(args, &ctx)
        }
        Commands::Verify(args) => {
            let ctx = CliContext::load(cli.config.as_deref(), cli.backend.as_deref())?;
            run_verify(args, &ctx)
        }
    }
}
