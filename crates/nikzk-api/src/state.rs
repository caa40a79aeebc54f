//! # Application State
//!
//! Shared state for the Axum application: the proof backend chosen at
//! startup, the proof policy, and admission settings.

use std::sync::Arc;

use nikzk_core::AdmissionPolicy;
use nikzk_zkp::policy::UnknownBackend;
use nikzk_zkp::{
    build_backend, AdmissionConfig, ConfigError, NikzkConfig, PolicyError, ProofBackend,
    ProofPolicy, ProofSystem, ToolchainConfig,
};
use thiserror::Error;

use crate::metrics::ServiceMetrics;

/// Errors raised while assembling the service configuration.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Config file or `NIKZK_*` override is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// `NIKZK_BACKEND` names no known backend.
    #[error(transparent)]
    Backend(#[from] UnknownBackend),
    /// The proof policy forbids the selected backend.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port.
    pub port: u16,
    /// Backend kind.
    pub backend: ProofBackend,
    /// Whether the mock backend is acceptable.
    pub proof_policy: ProofPolicy,
    /// Toolchain and admission settings.
    pub settings: NikzkConfig,
}

impl AppConfig {
    /// Build configuration from the environment.
    ///
    /// - `PORT` (default 8080)
    /// - `NIKZK_BACKEND`: `snarkjs` (default) or `mock`
    /// - `NIKZK_CONFIG`: optional YAML file, see [`NikzkConfig`]
    /// - `NIKZK_PROOF_POLICY`: `production` or `development`
    /// - `NIKZK_*` toolchain and admission overrides
    pub fn from_env() -> Result<Self, StartupError> {
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let backend = match std::env::var("NIKZK_BACKEND") {
            Ok(name) => name.parse::<ProofBackend>()?,
            Err(_) => ProofBackend::Groth16,
        };

        let config_path = std::env::var_os("NIKZK_CONFIG").map(std::path::PathBuf::from);
        let settings = NikzkConfig::load(config_path.as_deref())?;

        Ok(Self {
            port,
            backend,
            proof_policy: ProofPolicy::from_environment(),
            settings,
        })
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Proof backend used for both proving and verification.
    pub backend: Arc<dyn ProofSystem>,
    /// Policy checked before a verification is treated as authoritative.
    pub proof_policy: ProofPolicy,
    /// Admission threshold settings.
    pub admission: AdmissionConfig,
    /// Toolchain, consulted by the readiness probe.
    pub toolchain: ToolchainConfig,
    /// Proof and verdict counters.
    pub metrics: ServiceMetrics,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.backend.backend())
            .field("proof_policy", &self.proof_policy)
            .field("admission", &self.admission)
            .finish()
    }
}

impl AppState {
    /// Build state from validated configuration.
    ///
    /// # Errors
    ///
    /// [`StartupError::Policy`] if the policy forbids the configured backend.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        config.proof_policy.validate(config.backend)?;
        Ok(Self {
            backend: build_backend(config.backend, &config.settings.toolchain),
            proof_policy: config.proof_policy,
            admission: config.settings.admission,
            toolchain: config.settings.toolchain.clone(),
            metrics: ServiceMetrics::new(),
        })
    }

    /// Build state around an explicit backend.
    pub fn with_backend(
        backend: Arc<dyn ProofSystem>,
        proof_policy: ProofPolicy,
        admission: AdmissionConfig,
    ) -> Self {
        Self {
            backend,
            proof_policy,
            admission,
            toolchain: ToolchainConfig::default(),
            metrics: ServiceMetrics::new(),
        }
    }

    /// Admission policy for the current request.
    pub fn admission_policy(&self) -> AdmissionPolicy {
        self.admission.policy()
    }

    /// Reasons the service cannot serve requests yet; empty when ready.
    pub fn readiness_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let kind = self.backend.backend();
        if let Err(err) = self.proof_policy.validate(kind) {
            problems.push(err.to_string());
        }
        if kind == ProofBackend::Groth16 {
            problems.extend(
                self.toolchain
                    .missing_artifacts()
                    .into_iter()
                    .map(|p| format!("missing circuit artifact {}", p.display())),
            );
        }
        problems
    }
}
