//! # Public-Signal Verifier
//!
//! Checks that a submitted [`ProofPackage`] speaks about the claim the
//! verifier asserts, before any cryptographic work is spent on it.
//!
//! ## Security Invariant
//!
//! On success the result carries the verifier's own recomputed signal
//! vector ([`ExpectedSignals`]). Cryptographic verification must run
//! against that vector, never against `package.public_signals`: an uploaded
//! file controls its own signals, so trusting them would let a forged
//! package pass with a proof over different values.

use serde::{Deserialize, Serialize};

use crate::claim::IdentityClaim;
use crate::error::ValidationError;
use crate::package::ProofPackage;

/// Constant first public signal emitted by the circuit.
pub const SIGNAL_SENTINEL: &str = "1";

/// Number of leading public signals the circuit contract defines.
pub const MIN_PUBLIC_SIGNALS: usize = 4;

/// Position of a public signal in the circuit output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalIndex {
    /// Index 0, always `"1"`.
    Sentinel,
    /// Index 1.
    NikHash,
    /// Index 2.
    NameHash,
    /// Index 3.
    BirthYear,
}

impl SignalIndex {
    /// All positions in circuit order.
    pub const ALL: [SignalIndex; MIN_PUBLIC_SIGNALS] = [
        SignalIndex::Sentinel,
        SignalIndex::NikHash,
        SignalIndex::NameHash,
        SignalIndex::BirthYear,
    ];

    /// Zero-based offset into the signal vector.
    pub fn position(self) -> usize {
        match self {
            SignalIndex::Sentinel => 0,
            SignalIndex::NikHash => 1,
            SignalIndex::NameHash => 2,
            SignalIndex::BirthYear => 3,
        }
    }

    /// Stable name for logs.
    pub fn name(self) -> &'static str {
        match self {
            SignalIndex::Sentinel => "sentinel",
            SignalIndex::NikHash => "nik_hash",
            SignalIndex::NameHash => "name_hash",
            SignalIndex::BirthYear => "birth_year",
        }
    }
}

impl std::fmt::Display for SignalIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.name(), self.position())
    }
}

/// A raw claim supplied by the relying party, already canonicalized.
///
/// Construction runs the same canonicalizer as the prover, so the only way
/// to obtain expected values is through [`VerificationClaim::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationClaim {
    canonical: IdentityClaim,
}

impl VerificationClaim {
    /// Canonicalize the verifier's `(nik, name, dob)` triple.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedDate`] for a bad date.
    pub fn new(nik: &str, name: &str, dob: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            canonical: IdentityClaim::from_raw(nik, name, dob)?,
        })
    }

    /// The canonical values this claim asserts.
    pub fn canonical(&self) -> &IdentityClaim {
        &self.canonical
    }

    /// The signal vector a genuine proof for this claim must carry.
    pub fn expected_signals(&self) -> ExpectedSignals {
        ExpectedSignals::from_claim(&self.canonical)
    }
}

/// The verifier-recomputed public-signal vector.
///
/// Only [`VerificationClaim`] and [`IdentityClaim`] produce one; it is the
/// vector handed to the cryptographic verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedSignals([String; MIN_PUBLIC_SIGNALS]);

impl ExpectedSignals {
    /// Recompute the signals for a canonical claim.
    pub fn from_claim(claim: &IdentityClaim) -> Self {
        Self([
            SIGNAL_SENTINEL.to_string(),
            claim.nik_hash.to_decimal_string(),
            claim.name_hash.to_decimal_string(),
            claim.birth_year.to_decimal_string(),
        ])
    }

    /// The expected value at one position.
    pub fn get(&self, index: SignalIndex) -> &str {
        &self.0[index.position()]
    }

    /// The vector in circuit order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Owned vector in circuit order.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.to_vec()
    }
}

/// Positions where a package's signals diverged from the expected ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingMismatch {
    /// Every diverging position, in circuit order. Never empty.
    pub diverging: Vec<SignalIndex>,
}

/// Outcome of the binding check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingResult {
    /// Signals match; carries the vector to verify cryptographically.
    Bound(ExpectedSignals),
    /// At least one signal differs from the claim.
    Unbound(BindingMismatch),
    /// The package cannot be compared at all.
    Malformed(String),
}

impl BindingResult {
    /// Whether the package is bound to the claim.
    pub fn is_bound(&self) -> bool {
        matches!(self, BindingResult::Bound(_))
    }
}

/// Compare a package's leading public signals with the claim's expected
/// values, positionally and by exact string equality.
///
/// Every position is compared even after a mismatch so diagnostics can
/// report all of them. Signals beyond the fourth are ignored.
pub fn check_binding(claim: &VerificationClaim, package: &ProofPackage) -> BindingResult {
    let submitted = &package.public_signals;
    if submitted.len() < MIN_PUBLIC_SIGNALS {
        tracing::warn!(
            found = submitted.len(),
            required = MIN_PUBLIC_SIGNALS,
            "proof package has too few public signals"
        );
        return BindingResult::Malformed("insufficient public signals".to_string());
    }

    let expected = claim.expected_signals();
    let diverging: Vec<SignalIndex> = SignalIndex::ALL
        .into_iter()
        .filter(|&index| submitted[index.position()] != expected.get(index))
        .collect();

    if diverging.is_empty() {
        return BindingResult::Bound(expected);
    }

    for &index in &diverging {
        tracing::warn!(signal = %index, "public signal does not match claim");
        tracing::debug!(
            signal = %index,
            expected = expected.get(index),
            submitted = submitted[index.position()].as_str(),
            "public signal mismatch detail"
        );
    }
    BindingResult::Unbound(BindingMismatch { diverging })
}
