//! # Admission Policy
//!
//! Turns a verified birth year into an admission decision. Only evaluate
//! this after the binding check returned `Bound` and the proof verified
//! cryptographically.
//!
//! The rule is year-granular: `birth_year <= current_year - min_age`.
//! Someone born late in the threshold year is admitted from January 1st.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::canonical::BirthYear;

/// Default minimum age.
pub const DEFAULT_MIN_AGE: u32 = 18;

/// Whether someone born in `birth_year` meets `min_age` in `current_year`.
pub fn meets_minimum_age(birth_year: i32, current_year: i32, min_age: u32) -> bool {
    let min_age = i32::try_from(min_age).unwrap_or(i32::MAX);
    birth_year <= current_year.saturating_sub(min_age)
}

/// Age threshold and the year it is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionPolicy {
    /// Minimum age in whole years.
    pub min_age: u32,
    /// Reference year for the age computation.
    pub current_year: i32,
}

impl AdmissionPolicy {
    /// A policy evaluated against an explicit reference year.
    pub fn new(min_age: u32, current_year: i32) -> Self {
        Self {
            min_age,
            current_year,
        }
    }

    /// A policy evaluated against the current UTC year.
    pub fn for_current_year(min_age: u32) -> Self {
        Self::new(min_age, Utc::now().year())
    }

    /// Latest birth year that is still admitted.
    pub fn latest_admitted_year(&self) -> i32 {
        let min_age = i32::try_from(self.min_age).unwrap_or(i32::MAX);
        self.current_year.saturating_sub(min_age)
    }

    /// Apply the policy to a verified birth year.
    pub fn evaluate(&self, birth_year: BirthYear) -> AdmissionDecision {
        let admitted = meets_minimum_age(birth_year.value(), self.current_year, self.min_age);
        tracing::debug!(
            birth_year = birth_year.value(),
            current_year = self.current_year,
            min_age = self.min_age,
            admitted,
            "admission policy evaluated"
        );
        AdmissionDecision {
            admitted,
            birth_year,
            min_age: self.min_age,
        }
    }
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self::for_current_year(DEFAULT_MIN_AGE)
    }
}

/// Result of applying an [`AdmissionPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionDecision {
    /// Whether the age requirement is met.
    pub admitted: bool,
    /// The attested birth year the decision was made on.
    pub birth_year: BirthYear,
    /// The threshold that was applied.
    pub min_age: u32,
}
