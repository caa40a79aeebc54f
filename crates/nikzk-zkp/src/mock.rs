//! # Mock Proof System
//!
//! A deterministic, transparent in-process backend for tests and local
//! development. The "proof" is a SHA-256 digest over the public signals.
//!
//! ## Security Notice
//!
//! Anyone can compute a mock proof for any signal vector. The mock is only
//! useful because it preserves one property of the real backend: a proof
//! made for one signal vector does not verify against another. Production
//! deployments reject it through [`ProofPolicy`](crate::policy::ProofPolicy).

use nikzk_core::{sha256_digest, CircuitInputs, SIGNAL_SENTINEL};
use serde_json::json;

use crate::policy::ProofBackend;
use crate::traits::{GeneratedProof, ProofError, ProofSystem, VerifyError};

const MOCK_DOMAIN: &str = "nikzk-mock-proof-v1";

/// Deterministic mock backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockProofSystem;

impl MockProofSystem {
    /// Create the mock backend.
    pub fn new() -> Self {
        Self
    }

    fn digest_hex(public_signals: &[String]) -> String {
        let mut preimage = String::from(MOCK_DOMAIN);
        for signal in public_signals {
            preimage.push('\n');
            preimage.push_str(signal);
        }
        sha256_digest(preimage.as_bytes()).to_hex()
    }
}

impl ProofSystem for MockProofSystem {
    fn backend(&self) -> ProofBackend {
        ProofBackend::Mock
    }

    fn prove(&self, inputs: &CircuitInputs) -> Result<GeneratedProof, ProofError> {
        // Mirror the circuit: each private value must equal its public copy.
        let pairs = [
            ("nik_hash", &inputs.private_nik_hash, &inputs.public_nik_hash),
            ("name_hash", &inputs.private_name_hash, &inputs.public_name_hash),
            (
                "birth_year",
                &inputs.private_birth_year,
                &inputs.public_birth_year,
            ),
        ];
        if let Some((name, _, _)) = pairs.iter().find(|(_, private, public)| private != public) {
            return Err(ProofError::Unsatisfied(format!(
                "private_{name} != public_{name}"
            )));
        }

        let public_signals = vec![
            SIGNAL_SENTINEL.to_string(),
            inputs.public_nik_hash.clone(),
            inputs.public_name_hash.clone(),
            inputs.public_birth_year.clone(),
        ];
        let proof = json!({
            "protocol": ProofBackend::Mock.name(),
            "digest": Self::digest_hex(&public_signals),
        });
        tracing::debug!("mock proof generated");
        Ok(GeneratedProof {
            proof,
            public_signals,
        })
    }

    fn verify(
        &self,
        proof: &serde_json::Value,
        public_signals: &[String],
    ) -> Result<bool, VerifyError> {
        let object = proof
            .as_object()
            .ok_or_else(|| VerifyError::MalformedProof("proof must be a JSON object".into()))?;
        if object.get("protocol").and_then(|v| v.as_str()) != Some(ProofBackend::Mock.name()) {
            return Ok(false);
        }
        let digest = object
            .get("digest")
            .and_then(|v| v.as_str())
            .ok_or_else(|| VerifyError::MalformedProof("missing digest".into()))?;
        Ok(digest == Self::digest_hex(public_signals))
    }
}
