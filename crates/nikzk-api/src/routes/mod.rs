//! # API Route Modules
//!
//! | Route | Module |
//! |---|---|
//! | `POST /v1/proofs` | [`proofs`] |
//! | `POST /v1/verifications` | [`verifications`] |
//! | `GET /v1/metrics` | [`metrics`] |

pub mod metrics;
pub mod proofs;
pub mod verifications;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use nikzk_core::ProofPackage;

/// Proof package as it travels over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProofPackageBody {
    /// Opaque Groth16 proof object.
    #[schema(value_type = Object)]
    pub proof: serde_json::Value,
    /// Ordered public signals: `"1"`, NIK hash, name hash, birth year.
    pub public_signals: Vec<String>,
    /// Human-readable description.
    pub description: String,
}

impl From<ProofPackage> for ProofPackageBody {
    fn from(p: ProofPackage) -> Self {
        Self {
            proof: p.proof,
            public_signals: p.public_signals,
            description: p.description,
        }
    }
}

impl From<ProofPackageBody> for ProofPackage {
    fn from(p: ProofPackageBody) -> Self {
        Self {
            proof: p.proof,
            public_signals: p.public_signals,
            description: p.description,
        }
    }
}
