//! # Error Hierarchy
//!
//! Structured error types for nikzk, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! [`NikzkError`] is the taxonomy surfaced by the prove and verify
//! pipelines. Every variant is recoverable: the serving layer converts it
//! to a status message with [`NikzkError::user_message`] and keeps running.

use thiserror::Error;

use crate::binding::SignalIndex;
use crate::canonical::DOB_FORMAT;

/// Top-level error type for prove and verify operations.
#[derive(Error, Debug)]
pub enum NikzkError {
    /// A claim field, date, or uploaded document violated its expected shape.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] ValidationError),

    /// The submitted proof package carries too few public signals.
    #[error("insufficient public signals: found {found}, at least {required} required")]
    InsufficientSignals {
        /// Number of signals present in the package.
        found: usize,
        /// Minimum number the circuit contract requires.
        required: usize,
    },

    /// The canonicalized claim does not match the package's public signals.
    #[error("public signals do not match the claim (diverging at {})", format_indices(.diverging))]
    BindingMismatch {
        /// Every signal position whose value differed from the expected one.
        diverging: Vec<SignalIndex>,
    },

    /// The proof failed cryptographic verification.
    #[error("proof failed cryptographic verification")]
    CryptographicInvalidity,

    /// An external proving or verification tool exceeded its time budget.
    #[error("external tool `{tool}` timed out after {seconds}s")]
    ExternalToolTimeout {
        /// Name of the program that was killed.
        tool: String,
        /// Configured timeout in seconds.
        seconds: u64,
    },

    /// An external proving or verification tool failed or produced
    /// unparseable output.
    #[error("external tool `{tool}` failed: {diagnostic}")]
    ExternalToolFailure {
        /// Name of the program that failed.
        tool: String,
        /// Last diagnostic line emitted by the tool.
        diagnostic: String,
    },
}

impl NikzkError {
    /// Message safe to show to the end caller.
    ///
    /// Binding mismatches and cryptographic failures share one message so a
    /// caller cannot learn which check rejected the proof. Tool faults are
    /// reported as environmental without the tool's own output.
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedInput(err) => format!("invalid input: {err}"),
            Self::InsufficientSignals { found, required } => format!(
                "proof package is corrupt or incomplete: found {found} public signals, at least {required} required"
            ),
            Self::BindingMismatch { .. } | Self::CryptographicInvalidity => {
                "proof is invalid: verification failed (forged or modified proof)".to_string()
            }
            Self::ExternalToolTimeout { .. } | Self::ExternalToolFailure { .. } => {
                "proof service is temporarily unavailable; try again later".to_string()
            }
        }
    }

    /// Whether the error stems from the local environment rather than the
    /// submitted claim or proof.
    pub fn is_environmental(&self) -> bool {
        matches!(
            self,
            Self::ExternalToolTimeout { .. } | Self::ExternalToolFailure { .. }
        )
    }
}

fn format_indices(indices: &[SignalIndex]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validation errors for raw identity input.
///
/// Each variant carries the offending input or field name together with
/// the expected shape, so a caller can fix the request without guesswork.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Date of birth is not in day-month-year form.
    #[error("invalid date of birth \"{value}\" (expected {}, e.g. 07-07-1997)", DOB_FORMAT)]
    MalformedDate {
        /// The string that failed to parse.
        value: String,
    },

    /// A required field is absent from a claim or document.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// An uploaded document could not be decoded.
    #[error("unparseable document: {0}")]
    UnparseableDocument(String),
}
