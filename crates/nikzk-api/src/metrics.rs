//! # Service Counters
//!
//! Atomic counters for proofs issued and verification verdicts, served as
//! JSON at `GET /v1/metrics`. Counts only; no claim data is recorded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use nikzk_core::NikzkError;
use nikzk_zkp::VerificationOutcome;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default)]
struct Counters {
    proofs_issued: AtomicU64,
    admitted: AtomicU64,
    age_rejected: AtomicU64,
    proof_rejected: AtomicU64,
    toolchain_failures: AtomicU64,
}

/// Shared counters; clones observe the same values.
#[derive(Debug, Clone, Default)]
pub struct ServiceMetrics {
    counters: Arc<Counters>,
}

impl ServiceMetrics {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a proof package handed to a holder.
    pub fn record_proof_issued(&self) {
        self.counters.proofs_issued.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a finished verification by its verdict.
    pub fn record_outcome(&self, outcome: &VerificationOutcome) {
        let counter = match outcome {
            VerificationOutcome::Admitted(_) => &self.counters.admitted,
            VerificationOutcome::AgeFailed(_) => &self.counters.age_rejected,
            VerificationOutcome::Malformed { .. }
            | VerificationOutcome::Unbound(_)
            | VerificationOutcome::Invalid => &self.counters.proof_rejected,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a pipeline error if it was environmental.
    pub fn record_error(&self, err: &NikzkError) {
        if err.is_environmental() {
            self.counters
                .toolchain_failures
                .fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let c = &self.counters;
        MetricsSnapshot {
            proofs_issued: c.proofs_issued.load(Ordering::Relaxed),
            admitted: c.admitted.load(Ordering::Relaxed),
            age_rejected: c.age_rejected.load(Ordering::Relaxed),
            proof_rejected: c.proof_rejected.load(Ordering::Relaxed),
            toolchain_failures: c.toolchain_failures.load(Ordering::Relaxed),
        }
    }
}

/// Counter values served by the metrics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetricsSnapshot {
    /// Proof packages issued.
    pub proofs_issued: u64,
    /// Verifications that admitted the holder.
    pub admitted: u64,
    /// Valid proofs whose holder was below the age threshold.
    pub age_rejected: u64,
    /// Packages rejected as malformed, unbound, or invalid.
    pub proof_rejected: u64,
    /// Requests that failed on the external toolchain or proof policy.
    pub toolchain_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use nikzk_core::{AdmissionPolicy, BirthYear};

    #[test]
    fn outcomes_land_in_their_counters() {
        let metrics = ServiceMetrics::new();
        let clone = metrics.clone();
        let policy = AdmissionPolicy::new(18, 2025);

        clone.record_proof_issued();
        clone.record_outcome(&VerificationOutcome::Admitted(
            policy.evaluate(BirthYear::new(1990)),
        ));
        clone.record_outcome(&VerificationOutcome::AgeFailed(
            policy.evaluate(BirthYear::new(2010)),
        ));
        clone.record_outcome(&VerificationOutcome::Invalid);
        clone.record_outcome(&VerificationOutcome::Malformed { found: 3 });

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                proofs_issued: 1,
                admitted: 1,
                age_rejected: 1,
                proof_rejected: 2,
                toolchain_failures: 0,
            }
        );
    }

    #[test]
    fn only_environmental_errors_count_as_toolchain_failures() {
        let metrics = ServiceMetrics::new();
        metrics.record_error(&NikzkError::CryptographicInvalidity);
        metrics.record_error(&NikzkError::ExternalToolTimeout {
            tool: "snarkjs".into(),
            seconds: 120,
        });
        assert_eq!(metrics.snapshot().toolchain_failures, 1);
    }
}
