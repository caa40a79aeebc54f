//! # nikzk-api — HTTP Service for Zero-Knowledge Identity Claims
//!
//! ## API Surface
//!
//! | Route | Module | Purpose |
//! |---|---|---|
//! | `POST /v1/proofs` | [`routes::proofs`] | Issue a proof package |
//! | `POST /v1/verifications` | [`routes::verifications`] | Verify a package against a claim |
//! | `GET /v1/metrics` | [`routes::metrics`] | Proof and verdict counters |
//! | `GET /openapi.json` | [`openapi`] | OpenAPI document |
//! | `GET /health/*` | this module | Liveness and readiness |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → Handler
//! ```
//!
//! Proving and verification spawn external processes; handlers run them
//! on Tokio's blocking pool.

pub mod error;
pub mod extractors;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::proofs::router())
        .merge(routes::verifications::router())
        .merge(routes::metrics::router())
        .merge(openapi::router())
        .layer(middleware::tracing_layer::layer())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once the backend is allowed and its circuit
/// artifacts are present, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> (StatusCode, String) {
    let problems = state.readiness_problems();
    if problems.is_empty() {
        (StatusCode::OK, "ready".to_string())
    } else {
        for problem in &problems {
            tracing::warn!(%problem, "not ready");
        }
        (StatusCode::SERVICE_UNAVAILABLE, "not ready".to_string())
    }
}
