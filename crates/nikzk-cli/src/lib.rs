//! # nikzk-cli — Command-Line Interface for nikzk
//!
//! ## Subcommands
//!
//! - `nikzk canonicalize`: print the circuit inputs for a document.
//! - `nikzk prove`: write a proof package for a document.
//! - `nikzk verify`: check a proof package against a claim.
//!
//! ```bash
//! nikzk prove ktp.json --output zk_proof.json
//! nikzk verify zk_proof.json --nik 3201010101010001 --name "Siti Nurhaliza" --dob 07-07-1997
//! ```
//!
//! `verify` exits 0 when admitted, 2 when the proof or the age requirement
//! is rejected, and 1 on any error.

pub mod canonicalize;
pub mod prove;
pub mod verify;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use nikzk_core::IdentityDocument;
use nikzk_zkp::{build_backend, NikzkConfig, ProofBackend, ProofPolicy, ProofSystem};

/// Exit code for a completed verification that did not admit.
pub const EXIT_REJECTED: u8 = 2;

/// Resolved configuration shared by all subcommands.
#[derive(Clone)]
pub struct CliContext {
    /// Toolchain and admission settings.
    pub settings: NikzkConfig,
    /// Proof backend.
    pub backend: Arc<dyn ProofSystem>,
    /// Whether the mock backend is acceptable.
    pub proof_policy: ProofPolicy,
}

impl CliContext {
    /// Resolve settings from `--config`, `NIKZK_*`, and `--backend`.
    ///
    /// The backend comes from `--backend`, then `NIKZK_BACKEND`, then
    /// defaults to snarkjs.
    pub fn load(config: Option<&Path>, backend: Option<&str>) -> Result<Self> {
        let settings = NikzkConfig::load(config).context("failed to load configuration")?;
        let name = match backend {
            Some(name) => name.to_string(),
            None => std::env::var("NIKZK_BACKEND").unwrap_or_else(|_| "snarkjs".to_string()),
        };
        let kind: ProofBackend = name.parse()?;
        tracing::debug!(backend = %kind, "proof backend selected");
        Ok(Self {
            backend: build_backend(kind, &settings.toolchain),
            settings,
            proof_policy: ProofPolicy::from_environment(),
        })
    }
}

/// Read and decode an identity document file.
pub fn read_document(path: &Path) -> Result<IdentityDocument> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read file: {}", path.display()))?;
    IdentityDocument::from_slice(&bytes)
        .with_context(|| format!("failed to parse document: {}", path.display()))
}
