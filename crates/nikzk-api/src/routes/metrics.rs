//! Proof and verification counters.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

/// Build the metrics router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/metrics", get(metrics))
}

/// GET /v1/metrics — Proofs issued and verification verdicts so far.
#[utoipa::path(
    get,
    path = "/v1/metrics",
    responses(
        (status = 200, description = "Counter snapshot", body = MetricsSnapshot),
    ),
    tag = "operations"
)]
pub(crate) async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
