//! # Claim Builder
//!
//! Assembles an [`IdentityClaim`] from raw identity fields and serializes it
//! into the [`CircuitInputs`] consumed by the external witness generator.
//!
//! The circuit asserts that each private value equals its public copy, so
//! the proof states "I know values that canonicalize to exactly these
//! disclosed signals". Secrecy of the fields themselves is not the goal.

use serde::{Deserialize, Serialize};

use crate::canonical::{
    canonicalize_id, canonicalize_name, parse_birth_year, BirthYear, FieldElement,
};
use crate::error::ValidationError;

/// Canonical form of one person's attested data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    /// Truncated digest of the trimmed NIK.
    pub nik_hash: FieldElement,
    /// Truncated digest of the trimmed, uppercased name.
    pub name_hash: FieldElement,
    /// Birth year, carried in the clear.
    pub birth_year: BirthYear,
}

impl IdentityClaim {
    /// Canonicalize a raw `(nik, name, dob)` triple.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedDate`] if `dob` is not `DD-MM-YYYY`.
    pub fn from_raw(nik: &str, name: &str, dob: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            nik_hash: canonicalize_id(nik),
            name_hash: canonicalize_name(name),
            birth_year: parse_birth_year(dob)?,
        })
    }
}

/// The holder's identity-card document as uploaded to the prover.
///
/// Keys follow the card export format (`nik`, `nama`, `tanggal_lahir`).
/// Unknown keys are ignored. Fields are optional at the serde level so a
/// missing one is reported by name instead of as a generic decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDocument {
    /// National identity number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nik: Option<String>,
    /// Full name.
    #[serde(default, rename = "nama", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Date of birth, `DD-MM-YYYY`.
    #[serde(default, rename = "tanggal_lahir", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

impl IdentityDocument {
    /// Decode a document from uploaded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnparseableDocument`] for invalid UTF-8 or JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        serde_json::from_slice(bytes).map_err(|e| ValidationError::UnparseableDocument(e.to_string()))
    }

    /// Canonicalize the document into a claim.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first absent key,
    /// or [`ValidationError::MalformedDate`] for a bad date.
    pub fn to_claim(&self) -> Result<IdentityClaim, ValidationError> {
        let nik = required(&self.nik, "nik")?;
        let name = required(&self.name, "nama")?;
        let dob = required(&self.date_of_birth, "tanggal_lahir")?;
        IdentityClaim::from_raw(nik, name, dob)
    }
}

fn required<'a>(field: &'a Option<String>, key: &str) -> Result<&'a str, ValidationError> {
    field
        .as_deref()
        .ok_or_else(|| ValidationError::MissingField(key.to_string()))
}

/// Witness-generator input: a private and a public copy of each value,
/// decimal-string encoded.
///
/// Field names are the exact JSON keys the circuit expects; do not rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitInputs {
    /// Witness copy of the NIK hash.
    pub private_nik_hash: String,
    /// Witness copy of the name hash.
    pub private_name_hash: String,
    /// Witness copy of the birth year.
    pub private_birth_year: String,
    /// Disclosed NIK hash.
    pub public_nik_hash: String,
    /// Disclosed name hash.
    pub public_name_hash: String,
    /// Disclosed birth year.
    pub public_birth_year: String,
}

impl CircuitInputs {
    /// Serialize to the JSON bytes written for the witness generator.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Build witness-generator inputs from a claim. Pure and total.
pub fn build_circuit_inputs(claim: &IdentityClaim) -> CircuitInputs {
    let nik = claim.nik_hash.to_decimal_string();
    let name = claim.name_hash.to_decimal_string();
    let year = claim.birth_year.to_decimal_string();
    CircuitInputs {
        private_nik_hash: nik.clone(),
        private_name_hash: name.clone(),
        private_birth_year: year.clone(),
        public_nik_hash: nik,
        public_name_hash: name,
        public_birth_year: year,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> IdentityClaim {
        IdentityClaim::from_raw("3333332222220001", "Jane Nobody", "01-01-2001").unwrap()
    }

    #[test]
    fn inputs_copy_values_into_both_slots() {
        let inputs = build_circuit_inputs(&jane());
        assert_eq!(inputs.private_nik_hash, "12309871718263622894");
        assert_eq!(inputs.public_nik_hash, inputs.private_nik_hash);
        assert_eq!(inputs.private_name_hash, "4685410519295410648");
        assert_eq!(inputs.public_name_hash, inputs.private_name_hash);
        assert_eq!(inputs.private_birth_year, "2001");
        assert_eq!(inputs.public_birth_year, "2001");
    }

    #[test]
    fn inputs_serialize_with_exact_keys_and_string_values() {
        let bytes = build_circuit_inputs(&jane()).to_json_bytes().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "private_birth_year",
                "private_name_hash",
                "private_nik_hash",
                "public_birth_year",
                "public_name_hash",
                "public_nik_hash",
            ]
        );
        assert!(obj.values().all(|v| v.is_string()));
    }

    #[test]
    fn document_with_extra_fields_converts() {
        let doc = IdentityDocument::from_slice(
            br#"{"nik":"3333332222220001","nama":"Jane Nobody","tanggal_lahir":"01-01-2001","alamat":"Jl. Merdeka"}"#,
        )
        .unwrap();
        assert_eq!(doc.to_claim().unwrap(), jane());
    }

    #[test]
    fn document_missing_field_is_named() {
        let doc = IdentityDocument::from_slice(br#"{"nik":"1","tanggal_lahir":"01-01-2001"}"#)
            .unwrap();
        assert_eq!(
            doc.to_claim().unwrap_err(),
            ValidationError::MissingField("nama".to_string())
        );
    }

    #[test]
    fn document_not_json_is_unparseable() {
        let err = IdentityDocument::from_slice(b"nik=1").unwrap_err();
        assert!(matches!(err, ValidationError::UnparseableDocument(_)));
    }

    #[test]
    fn document_bad_date_propagates() {
        let doc = IdentityDocument {
            nik: Some("1".into()),
            name: Some("A".into()),
            date_of_birth: Some("2001-01-01".into()),
        };
        assert!(matches!(
            doc.to_claim(),
            Err(ValidationError::MalformedDate { .. })
        ));
    }
}
