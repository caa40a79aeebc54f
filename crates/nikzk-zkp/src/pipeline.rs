//! # Prove and Verify Pipelines
//!
//! The two end-to-end operations, expressed over a [`ProofSystem`].
//!
//! ## Verification State Machine
//!
//! ```text
//! received ──binding──▶ Malformed | Unbound            (terminal)
//!          └─ Bound ──crypto──▶ Invalid                (terminal)
//!                     └─ Valid ──age──▶ AgeFailed | Admitted
//! ```
//!
//! Binding runs before any external process is spawned, and the
//! cryptographic check receives the verifier-recomputed signals from
//! [`BindingResult::Bound`], never the uploaded ones.

use nikzk_core::{
    build_circuit_inputs, check_binding, package, AdmissionDecision, AdmissionPolicy,
    BindingMismatch, BindingResult, IdentityDocument, NikzkError, ProofPackage, VerificationClaim,
    MIN_PUBLIC_SIGNALS,
};
use serde::Serialize;

use crate::policy::ProofPolicy;
use crate::traits::ProofSystem;

/// Generate a proof package for an identity document.
///
/// # Errors
///
/// [`NikzkError::MalformedInput`] for a document that cannot be
/// canonicalized. [`NikzkError::ExternalToolFailure`] if `policy` forbids
/// the backend or the prover emitted fewer than four public signals, and
/// any tool error from the backend.
pub fn prove_identity(
    document: &IdentityDocument,
    backend: &dyn ProofSystem,
    policy: &ProofPolicy,
) -> Result<ProofPackage, NikzkError> {
    ensure_allowed(backend, policy)?;
    let claim = document.to_claim()?;
    let inputs = build_circuit_inputs(&claim);
    let generated = backend.prove(&inputs)?;

    let found = generated.public_signals.len();
    if found < MIN_PUBLIC_SIGNALS {
        tracing::error!(
            backend = %backend.backend(),
            found,
            "prover emitted too few public signals"
        );
        return Err(NikzkError::ExternalToolFailure {
            tool: backend.backend().name().to_string(),
            diagnostic: format!(
                "prover emitted {found} public signals, at least {MIN_PUBLIC_SIGNALS} required"
            ),
        });
    }

    tracing::info!(backend = %backend.backend(), "proof package generated");
    Ok(package(generated.proof, generated.public_signals))
}

/// A backend the policy forbids is an environmental fault, not a verdict
/// on the document or the submission.
fn ensure_allowed(backend: &dyn ProofSystem, policy: &ProofPolicy) -> Result<(), NikzkError> {
    policy
        .validate(backend.backend())
        .map_err(|err| NikzkError::ExternalToolFailure {
            tool: backend.backend().name().to_string(),
            diagnostic: err.to_string(),
        })
}

/// Terminal state of one verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Too few public signals to compare.
    Malformed {
        /// Signals present in the package.
        found: usize,
    },
    /// Public signals do not describe the asserted claim.
    Unbound(BindingMismatch),
    /// Signals match but the proof does not verify.
    Invalid,
    /// Proof valid, holder younger than the threshold.
    AgeFailed(AdmissionDecision),
    /// Proof valid, age requirement met.
    Admitted(AdmissionDecision),
}

/// Outward status of a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Proof valid and admitted.
    Valid,
    /// Anything else.
    Invalid,
}

impl VerificationOutcome {
    /// Whether the holder is admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, VerificationOutcome::Admitted(_))
    }

    /// Outward status.
    pub fn status(&self) -> VerificationStatus {
        if self.is_admitted() {
            VerificationStatus::Valid
        } else {
            VerificationStatus::Invalid
        }
    }

    /// The error describing why the proof itself was rejected, if it was.
    pub fn rejection(&self) -> Option<NikzkError> {
        match self {
            VerificationOutcome::Malformed { found } => Some(NikzkError::InsufficientSignals {
                found: *found,
                required: MIN_PUBLIC_SIGNALS,
            }),
            VerificationOutcome::Unbound(mismatch) => Some(NikzkError::BindingMismatch {
                diverging: mismatch.diverging.clone(),
            }),
            VerificationOutcome::Invalid => Some(NikzkError::CryptographicInvalidity),
            VerificationOutcome::AgeFailed(_) | VerificationOutcome::Admitted(_) => None,
        }
    }

    /// Message for the end caller.
    ///
    /// `Unbound` and `Invalid` produce the same text.
    pub fn message(&self, min_age: u32) -> String {
        match self {
            VerificationOutcome::Admitted(_) => {
                format!("proof valid and age requirement ({min_age}+ years) met")
            }
            VerificationOutcome::AgeFailed(_) => {
                format!("age requirement ({min_age}+ years) not met")
            }
            other => other
                .rejection()
                .map(|err| err.user_message())
                .unwrap_or_default(),
        }
    }
}

/// Decide whether `package` proves `claim` and whether the holder is
/// admitted.
///
/// # Errors
///
/// Only environmental faults are errors: the backend is not allowed by
/// `policy`, or an external tool failed or timed out. Every judgement about
/// the submission itself is a [`VerificationOutcome`].
pub fn verify_submission(
    claim: &VerificationClaim,
    submitted: &ProofPackage,
    backend: &dyn ProofSystem,
    policy: &ProofPolicy,
    admission: &AdmissionPolicy,
) -> Result<VerificationOutcome, NikzkError> {
    ensure_allowed(backend, policy)?;

    let expected = match check_binding(claim, submitted) {
        BindingResult::Bound(expected) => expected,
        BindingResult::Unbound(mismatch) => {
            tracing::info!(
                diverging = mismatch.diverging.len(),
                "verification rejected: signals do not match claim"
            );
            return Ok(VerificationOutcome::Unbound(mismatch));
        }
        BindingResult::Malformed(reason) => {
            tracing::info!(%reason, "verification rejected: malformed package");
            return Ok(VerificationOutcome::Malformed {
                found: submitted.public_signals.len(),
            });
        }
    };

    let valid = match backend.verify(&submitted.proof, expected.as_slice()) {
        Ok(valid) => valid,
        Err(err) => match NikzkError::from(err) {
            NikzkError::CryptographicInvalidity => false,
            environmental => return Err(environmental),
        },
    };
    if !valid {
        tracing::info!(backend = %backend.backend(), "verification rejected: proof invalid");
        return Ok(VerificationOutcome::Invalid);
    }

    let decision = admission.evaluate(claim.canonical().birth_year);
    tracing::info!(
        admitted = decision.admitted,
        min_age = decision.min_age,
        "proof verified"
    );
    Ok(if decision.admitted {
        VerificationOutcome::Admitted(decision)
    } else {
        VerificationOutcome::AgeFailed(decision)
    })
}
