//! # Field Canonicalizer
//!
//! Deterministic mapping from raw identity fields to the values that enter
//! the proof circuit.
//!
//! ## Security Invariant
//!
//! Prover and verifier canonicalize independently and must agree bit for
//! bit. Every function here is a pure function of its trimmed (and, for
//! names, uppercased) input: no locale, clock, or process state is read.
//!
//! ## Rules
//!
//! 1. ID: trim surrounding whitespace, SHA-256, keep the leading 64 bits.
//!    Whitespace is Unicode `White_Space` plus the ASCII separators
//!    U+001C..U+001F, the set the issuing services strip.
//! 2. Name: trim, uppercase, then the same digest-and-truncate step.
//!    Internal whitespace and punctuation are kept as-is, so
//!    `"Jane  Nobody"` and `"Jane Nobody"` canonicalize differently.
//! 3. Birth year: the year component of a `DD-MM-YYYY` date, not hashed.

use serde::{Deserialize, Serialize};

use crate::digest::{sha256_digest, Sha256Digest};
use crate::error::ValidationError;

/// Expected shape of a date-of-birth string.
pub const DOB_FORMAT: &str = "DD-MM-YYYY";

const DOB_DELIMITER: char = '-';

/// A 64-bit value that fits the circuit's arithmetic width.
///
/// Crosses the circuit boundary as a decimal string (see
/// [`FieldElement::to_decimal_string`]); the circuit field modulus may
/// exceed native integer range, so JSON numbers are never used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldElement(u64);

impl FieldElement {
    /// Wrap a raw value.
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Truncate a digest to its leading 64 bits.
    pub fn from_digest(digest: &Sha256Digest) -> Self {
        Self(digest.leading_u64())
    }

    /// The underlying integer.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Decimal encoding used in circuit inputs and public signals.
    pub fn to_decimal_string(self) -> String {
        self.0.to_string()
    }
}

impl std::fmt::Display for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A calendar year taken from a date of birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BirthYear(i32);

impl BirthYear {
    /// Wrap a raw year.
    pub fn new(year: i32) -> Self {
        Self(year)
    }

    /// The underlying year.
    pub fn value(self) -> i32 {
        self.0
    }

    /// Decimal encoding used in circuit inputs and public signals.
    pub fn to_decimal_string(self) -> String {
        self.0.to_string()
    }
}

impl std::fmt::Display for BirthYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_field_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Remove surrounding whitespace from a raw field.
pub fn trim_field(raw: &str) -> &str {
    raw.trim_matches(is_field_whitespace)
}

/// Canonicalize a national ID (NIK).
///
/// Only surrounding whitespace is removed; no case folding.
pub fn canonicalize_id(raw: &str) -> FieldElement {
    FieldElement::from_digest(&sha256_digest(trim_field(raw).as_bytes()))
}

/// Canonicalize a full name.
///
/// Surrounding whitespace is removed and the name is uppercased so identity
/// binding is case-insensitive.
pub fn canonicalize_name(raw: &str) -> FieldElement {
    let normalized = trim_field(raw).to_uppercase();
    FieldElement::from_digest(&sha256_digest(normalized.as_bytes()))
}

/// Extract the birth year from a `DD-MM-YYYY` date.
///
/// Day and month must be one or two ASCII digits and the year exactly four.
/// Day and month ranges are not checked: `31-13-1997` yields 1997.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedDate`] when the input has a different
/// delimiter, component count, or non-numeric component.
pub fn parse_birth_year(raw: &str) -> Result<BirthYear, ValidationError> {
    let malformed = || ValidationError::MalformedDate {
        value: raw.to_string(),
    };

    let mut parts = trim_field(raw).split(DOB_DELIMITER);
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    if !is_digits(day, 1, 2) || !is_digits(month, 1, 2) || !is_digits(year, 4, 4) {
        return Err(malformed());
    }

    year.parse::<i32>().map(BirthYear).map_err(|_| malformed())
}

fn is_digits(s: &str, min_len: usize, max_len: usize) -> bool {
    (min_len..=max_len).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}
