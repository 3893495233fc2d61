//! Prometheus metrics endpoint

use axum::{extract::State, response::IntoResponse};

use crate::AppState;

/// GET /metrics - Render request, cache and upstream metrics in Prometheus text format
pub async fn get(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}
