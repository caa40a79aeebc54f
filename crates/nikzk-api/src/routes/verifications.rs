//! # Proof Verification
//!
//! A relying party submits the claim it wants checked (`nik`, `name`,
//! `dob`) together with the holder's proof package. The response says only
//! whether the holder is admitted; why a proof was rejected stays in the
//! server log.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use nikzk_core::{ProofPackage, VerificationClaim};
use nikzk_zkp::{verify_submission, VerificationOutcome, VerificationStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, require_fields, Validate};
use crate::routes::ProofPackageBody;
use crate::state::AppState;

/// Verification request.
///
/// Claim fields are optional at the serde level so a missing one is
/// reported by name as a validation error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    /// NIK the relying party expects.
    pub nik: Option<String>,
    /// Name the relying party expects.
    pub name: Option<String>,
    /// Date of birth the relying party expects, `DD-MM-YYYY`.
    pub dob: Option<String>,
    /// The holder's proof package.
    pub proof_package: ProofPackageBody,
}

impl Validate for VerifyRequest {
    fn validate(&self) -> Result<(), String> {
        require_fields(&[
            ("nik", self.nik.as_deref()),
            ("name", self.name.as_deref()),
            ("dob", self.dob.as_deref()),
        ])
    }
}

/// Verification result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    /// `valid` when the proof verified and the age requirement is met,
    /// `invalid` otherwise.
    pub status: String,
    /// Human-readable explanation.
    pub message: String,
    /// Threshold applied.
    pub min_age: u32,
}

/// Build the verifications router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/verifications", post(create_verification))
}

/// POST /v1/verifications — Verify a proof package against a claim.
#[utoipa::path(
    post,
    path = "/v1/verifications",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification decided", body = VerifyResponse),
        (status = 400, description = "Body is not JSON or the package is malformed", body = crate::error::ErrorBody),
        (status = 422, description = "Missing field or malformed date", body = crate::error::ErrorBody),
        (status = 503, description = "Verification toolchain failed or timed out", body = crate::error::ErrorBody),
    ),
    tag = "verifications"
)]
pub(crate) async fn create_verification(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let claim = VerificationClaim::new(
        req.nik.as_deref().unwrap_or_default(),
        req.name.as_deref().unwrap_or_default(),
        req.dob.as_deref().unwrap_or_default(),
    )?;
    let package = ProofPackage::from(req.proof_package);

    let operation_id = Uuid::new_v4();
    tracing::info!(%operation_id, backend = %state.backend.backend(), "verification requested");

    let admission = state.admission_policy();
    let backend = state.backend.clone();
    let policy = state.proof_policy;
    let outcome = tokio::task::spawn_blocking(move || {
        verify_submission(&claim, &package, backend.as_ref(), &policy, &admission)
    })
    .await
    .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))?
    .map_err(|err| {
        state.metrics.record_error(&err);
        err
    })?;
    state.metrics.record_outcome(&outcome);

    if let Some(rejection) = outcome.rejection() {
        tracing::warn!(%operation_id, reason = %rejection, "proof rejected");
    } else if let VerificationOutcome::AgeFailed(decision) = &outcome {
        tracing::info!(%operation_id, birth_year = %decision.birth_year, "age requirement not met");
    }

    let status = match outcome.status() {
        VerificationStatus::Valid => "valid",
        VerificationStatus::Invalid => "invalid",
    };
    Ok(Json(VerifyResponse {
        status: status.to_string(),
        message: outcome.message(admission.min_age),
        min_age: admission.min_age,
    }))
}
