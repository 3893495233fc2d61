//! HTTP handlers

pub mod details;
pub mod diagnose;
pub mod health;
pub mod metrics;

use axum::{Router, routing::post};
use serde::Serialize;

use crate::AppState;
use crate::ai::PROVIDER_NAME;

/// Build the AI-backed routes
pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/diagnose", post(diagnose::diagnose))
        .route("/veterinary-details", post(details::veterinary_details))
}

/// Which providers answered a request and which were skipped, and why
#[derive(Debug, Default, Serialize)]
pub struct ProviderReport {
    pub queried_models: Vec<String>,
    pub skipped_models: Vec<String>,
}

impl ProviderReport {
    fn queried(&mut self, model: &str) {
        self.queried_models.push(format!("{PROVIDER_NAME}/{model}"));
    }

    fn skipped(&mut self, reason: impl std::fmt::Display) {
        self.skipped_models.push(format!("{PROVIDER_NAME} ({reason})"));
    }
}
