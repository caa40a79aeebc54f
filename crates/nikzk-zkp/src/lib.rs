//! # nikzk-zkp — Proof Backends and Pipelines
//!
//! Hides the external witness generator, prover, and verifier behind the
//! sealed [`ProofSystem`] trait and runs the prove and verify pipelines
//! over it.
//!
//! ## Backends
//!
//! - [`SnarkjsProofSystem`]: Groth16 through `node` and `snarkjs`
//!   processes, each call bounded by a timeout.
//! - [`MockProofSystem`]: deterministic SHA-256 stand-in for tests and
//!   development. Refused under a production [`ProofPolicy`].

pub mod config;
pub mod mock;
pub mod pipeline;
pub mod policy;
pub mod runner;
pub mod snarkjs;
pub mod traits;

use std::sync::Arc;

// Re-export primary types.
pub use config::{AdmissionConfig, ConfigError, NikzkConfig, ToolchainConfig};
pub use mock::MockProofSystem;
pub use pipeline::{prove_identity, verify_submission, VerificationOutcome, VerificationStatus};
pub use policy::{PolicyError, PolicyMode, ProofBackend, ProofPolicy};
pub use runner::ToolError;
pub use snarkjs::SnarkjsProofSystem;
pub use traits::{GeneratedProof, ProofError, ProofSystem, VerifyError};

/// Instantiate the backend of the given kind.
pub fn build_backend(kind: ProofBackend, toolchain: &ToolchainConfig) -> Arc<dyn ProofSystem> {
    match kind {
        ProofBackend::Groth16 => Arc::new(SnarkjsProofSystem::new(toolchain.clone())),
        ProofBackend::Mock => Arc::new(MockProofSystem::new()),
    }
}
