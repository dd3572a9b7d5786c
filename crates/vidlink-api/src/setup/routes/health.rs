//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the link store answers.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let store = match tokio::time::timeout(TIMEOUT, state.links.ping()).await {
        Ok(Ok(())) => "ready".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Link store readiness check failed");
            format!("not_ready: {}", e)
        }
        Err(_) => {
            tracing::error!("Link store readiness check timed out");
            "timeout".to_string()
        }
    };

    let ready = store == "ready";
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "store": store,
        })),
    )
}
