#![deny(missing_docs)]

//! # nikzk-core — Identity-Claim Canonicalization and Binding
//!
//! This crate holds the part of nikzk whose correctness must hold no matter
//! which proving backend executes the circuit. It has no internal crate
//! dependencies and performs no I/O.
//!
//! ## Components
//!
//! 1. **Field canonicalizer** ([`canonical`]): NIK, name, and date of birth
//!    to circuit values.
//! 2. **Claim builder** ([`claim`]): [`IdentityClaim`] to [`CircuitInputs`].
//! 3. **Proof packager** ([`package`]): proof + public signals to
//!    [`ProofPackage`].
//! 4. **Public-signal verifier** ([`binding`]): [`check_binding`] decides
//!    whether a package speaks about the verifier's claim.
//! 5. **Admission policy** ([`admission`]): age threshold on a verified
//!    birth year.
//!
//! ## Design Principles
//!
//! 1. **Determinism.** Prover and verifier canonicalize independently; every
//!    canonicalization function is pure.
//! 2. **Verifier-owned signals.** [`BindingResult::Bound`] carries the
//!    recomputed [`ExpectedSignals`], the only vector cryptographic
//!    verification may run against.
//! 3. **[`NikzkError`] hierarchy.** Structured errors with `thiserror`, no
//!    `.unwrap()` outside tests.

pub mod admission;
pub mod binding;
pub mod canonical;
pub mod claim;
pub mod digest;
pub mod error;
pub mod package;

// Re-export primary types at crate root for ergonomic imports.
pub use admission::{meets_minimum_age, AdmissionDecision, AdmissionPolicy, DEFAULT_MIN_AGE};
pub use binding::{
    check_binding, BindingMismatch, BindingResult, ExpectedSignals, SignalIndex,
    VerificationClaim, MIN_PUBLIC_SIGNALS, SIGNAL_SENTINEL,
};
pub use canonical::{
    canonicalize_id, canonicalize_name, parse_birth_year, trim_field, BirthYear, FieldElement,
    DOB_FORMAT,
};
pub use claim::{build_circuit_inputs, CircuitInputs, IdentityClaim, IdentityDocument};
pub use digest::{sha256_digest, Sha256Digest};
pub use error::{NikzkError, ValidationError};
pub use package::{package, ProofPackage, PROOF_DESCRIPTION, PROOF_PACKAGE_FILENAME};
