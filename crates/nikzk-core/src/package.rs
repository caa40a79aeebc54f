//! # Proof Packager
//!
//! Wraps a backend proof and its ordered public signals into the single
//! transportable JSON artifact handed back to the holder.
//!
//! No validation happens here. The producer is trusted to emit signals in
//! circuit order; the verifier side re-derives everything it relies on.

use serde::{Deserialize, Serialize};

/// Fixed human-readable description embedded in every package.
pub const PROOF_DESCRIPTION: &str = "ZK Proof for NIK, Name, Birth Year consistency";

/// Suggested file name when a package is offered as a download.
pub const PROOF_PACKAGE_FILENAME: &str = "zk_proof.json";

/// The transportable proof artifact.
///
/// `public_signals` order is fixed by the circuit: `"1"`, NIK hash, name
/// hash, birth year. Trailing extra signals are allowed and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofPackage {
    /// Opaque proof object from the proving backend.
    pub proof: serde_json::Value,
    /// Ordered decimal-string field elements.
    pub public_signals: Vec<String>,
    /// Human-readable description.
    pub description: String,
}

impl ProofPackage {
    /// Decode a package from uploaded bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Pretty-printed JSON for download.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Bundle a proof with its public signals.
pub fn package(proof: serde_json::Value, public_signals: Vec<String>) -> ProofPackage {
    ProofPackage {
        proof,
        public_signals,
        description: PROOF_DESCRIPTION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn package_attaches_description() {
        let p = package(json!({"pi_a": ["1", "2"]}), vec!["1".into()]);
        assert_eq!(p.description, PROOF_DESCRIPTION);
        assert_eq!(p.public_signals, vec!["1".to_string()]);
    }

    #[test]
    fn package_json_has_three_keys() {
        let p = package(json!({}), vec![]);
        let value = serde_json::to_value(&p).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(obj.contains_key("proof"));
        assert!(obj.contains_key("public_signals"));
        assert!(obj.contains_key("description"));
    }

    #[test]
    fn decode_rejects_numeric_signals() {
        let err = ProofPackage::from_slice(
            br#"{"proof":{},"public_signals":[1,2,3,4],"description":""}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn pretty_json_decodes_back() {
        let p = package(json!({"protocol": "groth16"}), vec!["1".into(), "2".into()]);
        let text = p.to_pretty_json().unwrap();
        assert_eq!(ProofPackage::from_slice(text.as_bytes()).unwrap(), p);
    }
}
