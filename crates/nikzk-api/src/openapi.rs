//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "nikzk API",
        version = "0.1.0",
        description = "Zero-knowledge identity claims: issue a proof package for an identity-card document, verify it against an asserted NIK, name, and date of birth, and apply a minimum-age rule.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::proofs::create_proof,
        crate::routes::verifications::create_verification,
        crate::routes::metrics::metrics,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::ProofPackageBody,
        crate::routes::proofs::IdentityDocumentRequest,
        crate::routes::verifications::VerifyRequest,
        crate::routes::verifications::VerifyResponse,
        crate::metrics::MetricsSnapshot,
    )),
    tags(
        (name = "proofs", description = "Proof generation for identity documents"),
        (name = "verifications", description = "Proof verification and age admission"),
        (name = "operations", description = "Proof and verification counters"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_both_operations() {
        let spec = ApiDoc::openapi();
        assert!(spec.paths.paths.contains_key("/v1/proofs"));
        assert!(spec.paths.paths.contains_key("/v1/verifications"));
    }
}
