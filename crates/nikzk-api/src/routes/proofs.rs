//! # Proof Generation
//!
//! Accepts an identity-card document and returns a downloadable proof
//! package. The document's raw fields are canonicalized and discarded; only
//! their truncated digests and the birth year leave this handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use nikzk_core::{IdentityDocument, PROOF_PACKAGE_FILENAME};
use nikzk_zkp::prove_identity;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, require_fields, Validate};
use crate::routes::ProofPackageBody;
use crate::state::AppState;

/// Identity-card document in its export format.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IdentityDocumentRequest {
    /// National identity number.
    pub nik: Option<String>,
    /// Full name.
    pub nama: Option<String>,
    /// Date of birth, `DD-MM-YYYY`.
    pub tanggal_lahir: Option<String>,
}

impl Validate for IdentityDocumentRequest {
    fn validate(&self) -> Result<(), String> {
        require_fields(&[
            ("nik", self.nik.as_deref()),
            ("nama", self.nama.as_deref()),
            ("tanggal_lahir", self.tanggal_lahir.as_deref()),
        ])
    }
}

impl From<IdentityDocumentRequest> for IdentityDocument {
    fn from(req: IdentityDocumentRequest) -> Self {
        Self {
            nik: req.nik,
            name: req.nama,
            date_of_birth: req.tanggal_lahir,
        }
    }
}

/// Build the proofs router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/proofs", post(create_proof))
}

/// POST /v1/proofs — Generate a proof package for an identity document.
#[utoipa::path(
    post,
    path = "/v1/proofs",
    request_body = IdentityDocumentRequest,
    responses(
        (status = 200, description = "Proof package, served as an attachment", body = ProofPackageBody),
        (status = 400, description = "Body is not JSON", body = crate::error::ErrorBody),
        (status = 422, description = "Missing field or malformed date", body = crate::error::ErrorBody),
        (status = 503, description = "Proving toolchain unavailable or refused by the proof policy", body = crate::error::ErrorBody),
    ),
    tag = "proofs"
)]
pub(crate) async fn create_proof(
    State(state): State<AppState>,
    body: Result<Json<IdentityDocumentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let document: IdentityDocument = extract_validated_json(body)?.into();
    // Fail fast on a bad date before a blocking thread is taken.
    document.to_claim()?;

    let operation_id = Uuid::new_v4();
    tracing::info!(%operation_id, backend = %state.backend.backend(), "proof requested");

    let backend = state.backend.clone();
    let policy = state.proof_policy;
    let package =
        tokio::task::spawn_blocking(move || prove_identity(&document, backend.as_ref(), &policy))
            .await
            .map_err(|e| AppError::Internal(format!("proof task failed: {e}")))?
            .map_err(|err| {
                state.metrics.record_error(&err);
                err
            })?;
    state.metrics.record_proof_issued();

    tracing::info!(%operation_id, "proof package issued");
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{PROOF_PACKAGE_FILENAME}\""),
        )],
        Json(ProofPackageBody::from(package)),
    ))
}
