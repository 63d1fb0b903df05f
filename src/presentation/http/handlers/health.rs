use crate::presentation::http::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    detector: &'static str,
    encoder: &'static str,
    version: &'static str,
}

fn up_down(ready: bool) -> &'static str {
    if ready { "up" } else { "down" }
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let detector = state.faces.detector_ready();
    let encoder = state.faces.encoder_ready();

    let status = if detector && encoder {
        "healthy"
    } else {
        tracing::warn!(detector, encoder, "Health check: face backend not fully loaded");
        "degraded"
    };

    let response = HealthResponse {
        status,
        detector: up_down(detector),
        encoder: up_down(encoder),
        version: env!("CARGO_PKG_VERSION"),
    };

    (StatusCode::OK, Json(response))
}
