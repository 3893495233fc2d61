//! Health check endpoint

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use vetdx_core::CacheStats;

use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    available_models: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_keys: Option<Vec<String>>,
    cache_stats: CacheStats,
}

/// GET /health - Report whether the model provider is configured
pub async fn check(State(state): State<AppState>) -> impl IntoResponse {
    let cache_stats = state.cache.stats();

    match &state.client {
        Some(client) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                message: format!(
                    "Veterinary AI service is up and running with OpenRouter API key configured (model: {})",
                    client.model()
                ),
                available_models: Some(vec!["OPENROUTER_API_KEY".to_string()]),
                missing_keys: None,
                cache_stats,
            }),
        ),
        None => {
            tracing::warn!("Health check: no provider API key configured");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "error",
                    message: "Service cannot function - no API key configured".to_string(),
                    available_models: None,
                    missing_keys: Some(vec!["OPENROUTER_API_KEY".to_string()]),
                    cache_stats,
                }),
            )
        }
    }
}
