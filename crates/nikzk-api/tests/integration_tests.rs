//! # Integration Tests for nikzk-api
//!
//! Drives the router in-process over the mock backend: proof issuance,
//! verification outcomes, error mapping, health probes, metrics, and the
//! OpenAPI document.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use nikzk_api::state::AppState;
use nikzk_zkp::{AdmissionConfig, MockProofSystem, ProofPolicy};

const ALICE: &str = r#"{"nik":"1234567890123456","nama":"Alice Example","tanggal_lahir":"15-05-1990"}"#;
const ALICE_MINOR: &str = r#"{"nik":"1234567890123456","nama":"Alice Example","tanggal_lahir":"15-05-2010"}"#;

/// Helper: build the test app over the mock backend with a fixed year.
fn test_app() -> axum::Router {
    let state = AppState::with_backend(
        Arc::new(MockProofSystem::new()),
        ProofPolicy::development(),
        AdmissionConfig {
            min_age: 18,
            current_year: Some(2025),
        },
    );
    nikzk_api::app(state)
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn issue(app: &axum::Router, document: &str) -> Value {
    let response = app
        .clone()
        .oneshot(post_json("/v1/proofs", document.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn verify(app: &axum::Router, dob: &str, package: Value) -> (StatusCode, Value) {
    let body = json!({
        "nik": "1234567890123456",
        "name": "alice example",
        "dob": dob,
        "proof_package": package,
    });
    let response = app
        .clone()
        .oneshot(post_json("/v1/verifications", body.to_string()))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_readiness_probe_with_mock_backend() {
    let response = test_app().oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Proof Issuance -----------------------------------------------------------

#[tokio::test]
async fn test_issue_proof_is_an_attachment() {
    let response = test_app()
        .oneshot(post_json("/v1/proofs", ALICE.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(disposition, "attachment; filename=\"zk_proof.json\"");

    let package = body_json(response).await;
    assert_eq!(
        package["description"],
        "ZK Proof for NIK, Name, Birth Year consistency"
    );
    assert_eq!(
        package["public_signals"],
        json!(["1", "8814055076367832742", "17141195559612255240", "1990"])
    );
}

#[tokio::test]
async fn test_issue_proof_missing_field_is_422() {
    let response = test_app()
        .oneshot(post_json("/v1/proofs", r#"{"nik":"1","nama":"A"}"#.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("tanggal_lahir"));
}

#[tokio::test]
async fn test_issue_proof_bad_date_names_format() {
    let doc = r#"{"nik":"1","nama":"A","tanggal_lahir":"1997-07-07"}"#;
    let response = test_app()
        .oneshot(post_json("/v1/proofs", doc.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("DD-MM-YYYY"));
}

#[tokio::test]
async fn test_issue_proof_non_json_is_400() {
    let response = test_app()
        .oneshot(post_json("/v1/proofs", "nik=1".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -- Verification -------------------------------------------------------------

#[tokio::test]
async fn test_adult_is_admitted() {
    let app = test_app();
    let package = issue(&app, ALICE).await;
    let (status, body) = verify(&app, "15-05-1990", package).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "valid");
    assert_eq!(body["min_age"], 18);
}

#[tokio::test]
async fn test_minor_is_refused_on_age() {
    let app = test_app();
    let package = issue(&app, ALICE_MINOR).await;
    let (status, body) = verify(&app, "15-05-2010", package).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "invalid");
    assert!(body["message"].as_str().unwrap().contains("age requirement"));
}

#[tokio::test]
async fn test_mismatch_and_forgery_look_the_same() {
    let app = test_app();

    // Claim a different year than the one proven.
    let package = issue(&app, ALICE).await;
    let (_, unbound) = verify(&app, "15-05-1991", package).await;

    // Paste adult signals onto a minor's proof.
    let mut forged = issue(&app, ALICE_MINOR).await;
    forged["public_signals"][3] = json!("1990");
    let (_, invalid) = verify(&app, "15-05-1990", forged).await;

    assert_eq!(unbound["status"], "invalid");
    assert_eq!(invalid["status"], "invalid");
    assert_eq!(unbound["message"], invalid["message"]);
}

#[tokio::test]
async fn test_three_signals_reports_incomplete_package() {
    let app = test_app();
    let mut package = issue(&app, ALICE).await;
    package["public_signals"].as_array_mut().unwrap().truncate(3);
    let (status, body) = verify(&app, "15-05-1990", package).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "invalid");
    assert!(body["message"].as_str().unwrap().contains("found 3"));
}

#[tokio::test]
async fn test_verify_bad_dob_is_422() {
    let app = test_app();
    let package = issue(&app, ALICE).await;
    let (status, body) = verify(&app, "1990-05-15", package).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_verify_blank_name_is_422() {
    let body = json!({
        "nik": "1234567890123456",
        "name": "  ",
        "dob": "15-05-1990",
        "proof_package": {"proof": {}, "public_signals": [], "description": ""},
    });
    let response = test_app()
        .oneshot(post_json("/v1/verifications", body.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_verify_missing_claim_field_is_422_naming_it() {
    let body = json!({
        "name": "Alice Example",
        "dob": "15-05-1990",
        "proof_package": {"proof": {}, "public_signals": [], "description": ""},
    });
    let response = test_app()
        .oneshot(post_json("/v1/verifications", body.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("nik is required"));
}

#[tokio::test]
async fn test_production_policy_with_mock_is_503() {
    let state = AppState::with_backend(
        Arc::new(MockProofSystem::new()),
        ProofPolicy::production(),
        AdmissionConfig::default(),
    );
    let app = nikzk_api::app(state);

    let readiness = app.clone().oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(readiness.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Issuing is refused outright.
    let response = app
        .clone()
        .oneshot(post_json("/v1/proofs", ALICE.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    // So is verifying a package issued elsewhere.
    let package = issue(&test_app(), ALICE).await;
    let (status, body) = verify(&app, "15-05-1990", package).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(!body["error"]["message"].as_str().unwrap().contains("mock"));

    let response = app.clone().oneshot(get("/v1/metrics")).await.unwrap();
    assert_eq!(body_json(response).await["toolchain_failures"], 2);
}

// -- Metrics & OpenAPI --------------------------------------------------------

#[tokio::test]
async fn test_metrics_count_issued_proofs_and_verdicts() {
    let app = test_app();
    let adult = issue(&app, ALICE).await;
    let minor = issue(&app, ALICE_MINOR).await;
    app.clone()
        .oneshot(post_json("/v1/proofs", "{".to_string()))
        .await
        .unwrap();

    verify(&app, "15-05-1990", adult.clone()).await;
    verify(&app, "15-05-2010", minor).await;
    verify(&app, "15-05-1991", adult).await;

    let response = app.clone().oneshot(get("/v1/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["proofs_issued"], 2);
    assert_eq!(body["admitted"], 1);
    assert_eq!(body["age_rejected"], 1);
    assert_eq!(body["proof_rejected"], 1);
    assert_eq!(body["toolchain_failures"], 0);
}

#[tokio::test]
async fn test_openapi_spec() {
    let response = test_app().oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["paths"]["/v1/proofs"]["post"].is_object());
    assert!(spec["paths"]["/v1/verifications"]["post"].is_object());
}
