//! # Proof System Trait (Sealed)
//!
//! The collaborator interface behind which the external witness generator,
//! prover, and cryptographic verifier live. Both backends (snarkjs process
//! backend, deterministic mock) implement it.
//!
//! ## Sealed Trait
//!
//! `ProofSystem` is **sealed**: only implementations defined in `nikzk-zkp`
//! can exist. A verifier must not be handed a backend that answers `true`
//! for arbitrary input.
//!
//! ## Object Safety
//!
//! Unlike a key-typed proving API, this trait has no associated types. The
//! serving layer holds an `Arc<dyn ProofSystem>` chosen at startup.

use nikzk_core::{CircuitInputs, NikzkError};
use thiserror::Error;

use crate::policy::ProofBackend;
use crate::runner::ToolError;

/// Error during proof generation.
///
/// Returned by [`ProofSystem::prove`] when no proof could be produced.
#[derive(Error, Debug)]
pub enum ProofError {
    /// An external tool could not run to completion.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// A tool exited successfully but its output could not be decoded.
    #[error("`{tool}` produced unparseable output: {detail}")]
    MalformedOutput {
        /// The tool whose output was rejected.
        tool: String,
        /// Decoder message.
        detail: String,
    },

    /// The circuit constraints cannot be satisfied by the given inputs.
    #[error("circuit constraint not satisfied: {0}")]
    Unsatisfied(String),
}

/// Error during proof verification.
///
/// A cryptographically invalid proof is not an error: [`ProofSystem::verify`]
/// reports it as `Ok(false)`.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The proof object is structurally unusable.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// The verifier tool could not run to completion or gave an
    /// unrecognized answer.
    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// A freshly generated proof with the public signals the prover emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProof {
    /// Opaque backend proof object.
    pub proof: serde_json::Value,
    /// Ordered public signals, decimal strings.
    pub public_signals: Vec<String>,
}

/// Private module that seals the [`ProofSystem`] trait.
mod private {
    /// Sealing marker trait. Not accessible outside `nikzk-zkp`.
    pub trait Sealed {}
}

/// Sealed trait defining the external proving and verification operations.
///
/// Calls are blocking and may spawn processes; async callers must run them
/// on a blocking thread pool. Implementations are `Send + Sync` so one
/// instance can serve concurrent requests.
pub trait ProofSystem: private::Sealed + Send + Sync {
    /// Which kind of proofs this backend produces.
    fn backend(&self) -> ProofBackend;

    /// Generate a proof over the given circuit inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ProofError::Tool`] if an external tool fails or times out,
    /// [`ProofError::MalformedOutput`] if its output cannot be decoded.
    fn prove(&self, inputs: &CircuitInputs) -> Result<GeneratedProof, ProofError>;

    /// Verify `proof` against `public_signals`.
    ///
    /// Callers pass the verifier-recomputed signals, never the ones found in
    /// an uploaded package.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the proof is valid, `Ok(false)` if it is well-formed
    /// but cryptographically invalid.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::MalformedProof`] for a structurally unusable
    /// proof and [`VerifyError::Tool`] for environmental faults.
    fn verify(
        &self,
        proof: &serde_json::Value,
        public_signals: &[String],
    ) -> Result<bool, VerifyError>;
}

impl From<ProofError> for NikzkError {
    fn from(err: ProofError) -> Self {
        match err {
            ProofError::Tool(tool) => tool.into(),
            ProofError::MalformedOutput { tool, detail } => NikzkError::ExternalToolFailure {
                tool,
                diagnostic: detail,
            },
            ProofError::Unsatisfied(detail) => NikzkError::ExternalToolFailure {
                tool: "witness".to_string(),
                diagnostic: detail,
            },
        }
    }
}

impl From<VerifyError> for NikzkError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::MalformedProof(_) => NikzkError::CryptographicInvalidity,
            VerifyError::Tool(tool) => tool.into(),
        }
    }
}

// ---- Sealed trait implementations for authorized proof systems ----

impl private::Sealed for crate::mock::MockProofSystem {}

impl private::Sealed for crate::snarkjs::SnarkjsProofSystem {}
