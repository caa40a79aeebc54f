//! # Proof Backend Policy
//!
//! Decides whether a proof backend may be used for authoritative
//! verification in the current deployment.
//!
//! ## Problem
//!
//! The mock backend's "proofs" are SHA-256 digests over the public signals.
//! Anyone can compute one without knowing a witness, so a verifier that
//! accepts them in production admits whoever asks.
//!
//! ## Configuration
//!
//! The policy mode is determined by:
//! 1. Runtime environment variable (`NIKZK_PROOF_POLICY`)
//! 2. Explicit `ProofPolicy::new()` construction
//!
//! Without an override, release builds (`not(debug_assertions)`) default to
//! `Production` and debug builds to `Development`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable selecting the policy mode.
pub const PROOF_POLICY_ENV: &str = "NIKZK_PROOF_POLICY";

/// Errors from proof policy enforcement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Mock backend rejected in production mode.
    #[error("mock proof rejected: production mode requires a real proof backend ({backend})")]
    MockProofRejected {
        /// The backend that was rejected.
        backend: String,
    },
}

/// The kind of backend that produced or checks a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofBackend {
    /// Deterministic SHA-256 mock, no cryptographic security.
    Mock,
    /// Groth16 via the snarkjs toolchain.
    Groth16,
}

impl ProofBackend {
    /// Whether this backend provides real cryptographic security.
    pub fn is_real(self) -> bool {
        matches!(self, ProofBackend::Groth16)
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ProofBackend::Mock => "mock-sha256",
            ProofBackend::Groth16 => "groth16",
        }
    }
}

impl fmt::Display for ProofBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized backend name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown proof backend \"{0}\" (expected snarkjs or mock)")]
pub struct UnknownBackend(pub String);

impl FromStr for ProofBackend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "snarkjs" | "groth16" => Ok(ProofBackend::Groth16),
            "mock" | "mock-sha256" => Ok(ProofBackend::Mock),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

/// Proof policy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Reject mock proofs unconditionally.
    Production,
    /// Accept mock proofs (tests and local development only).
    Development,
}

/// Runtime proof policy.
///
/// ```rust
/// use nikzk_zkp::policy::{ProofBackend, ProofPolicy};
///
/// let policy = ProofPolicy::production();
/// assert!(policy.validate(ProofBackend::Groth16).is_ok());
/// assert!(policy.validate(ProofBackend::Mock).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofPolicy {
    mode: PolicyMode,
}

impl ProofPolicy {
    /// Create a policy with the given mode.
    pub fn new(mode: PolicyMode) -> Self {
        Self { mode }
    }

    /// Create a production policy (rejects mock proofs).
    pub fn production() -> Self {
        Self::new(PolicyMode::Production)
    }

    /// Create a development policy (accepts mock proofs).
    pub fn development() -> Self {
        Self::new(PolicyMode::Development)
    }

    /// Create a policy from `NIKZK_PROOF_POLICY`, falling back to the
    /// build-profile default.
    pub fn from_environment() -> Self {
        Self::from_env_value(std::env::var(PROOF_POLICY_ENV).ok().as_deref())
    }

    /// Resolve a policy from an optional override value.
    ///
    /// Unrecognized values fall through to the build-profile default.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("production" | "prod") => Self::production(),
            Some("development" | "dev") => Self::development(),
            _ if cfg!(not(debug_assertions)) => Self::production(),
            _ => Self::development(),
        }
    }

    /// Validate whether a backend is acceptable under this policy.
    ///
    /// # Errors
    ///
    /// [`PolicyError::MockProofRejected`] if the mock backend is used in
    /// production mode.
    pub fn validate(&self, backend: ProofBackend) -> Result<(), PolicyError> {
        match self.mode {
            PolicyMode::Production if !backend.is_real() => Err(PolicyError::MockProofRejected {
                backend: backend.name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Current policy mode.
    pub fn mode(&self) -> PolicyMode {
        self.mode
    }
}
