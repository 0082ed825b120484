use axum::{extract::State, http::StatusCode, Json};
use common::types::Health;
use tracing::warn;

use crate::metrics;
use crate::state::ServerState;

/// Ping the document store.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Store reachable", body = crate::openapi::HealthDoc),
        (status = 500, description = "Store unreachable or not initialised", body = crate::openapi::HealthDoc)
    )
)]
pub async fn health(State(state): State<ServerState>) -> (StatusCode, Json<Health>) {
    match state.recipes.ping().await {
        Ok(()) => (StatusCode::OK, Json(Health::connected())),
        Err(e) => {
            warn!(error = %e, event = "health_check_failed", "database ping failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Health::disconnected(e.to_string())))
        }
    }
}

pub async fn metrics() -> (StatusCode, String) {
    metrics::encode_metrics()
}
