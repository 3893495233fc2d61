//! POST /veterinary-details

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use vetdx_core::{DEFAULT_BREED, build_detail_prompt, extract_json};

use super::ProviderReport;
use crate::AppState;
use crate::ai::{DETAIL_TEMPERATURE, fetch_completion};
use crate::error::AppError;

const NO_DETAILS: &str = "No details available";

/// Request body for a condition profile
#[derive(Deserialize)]
pub struct DetailsRequest {
    diagnosis: Option<String>,
    species: Option<String>,
    breed: Option<String>,
}

/// Response body for a condition profile
#[derive(Serialize)]
pub struct DetailsResponse {
    diagnosis: String,
    species: String,
    breed: String,
    /// Profile object from the model, or the `No details available` marker
    veterinary_details: JsonValue,
    #[serde(flatten)]
    report: ProviderReport,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /veterinary-details - Structured profile of a named condition
pub async fn veterinary_details(
    State(state): State<AppState>,
    body: Result<Json<DetailsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;

    let diagnosis = non_empty(body.diagnosis)
        .ok_or_else(|| AppError::BadRequest("Diagnosis is required".to_string()))?;
    let species = non_empty(body.species)
        .ok_or_else(|| AppError::BadRequest("Species is required".to_string()))?;
    let breed = non_empty(body.breed).unwrap_or_else(|| DEFAULT_BREED.to_string());

    let mut report = ProviderReport::default();
    let Some(client) = state.client.as_ref() else {
        report.skipped("no API key");
        return Err(AppError::ServiceUnavailable {
            message: "No AI models available".to_string(),
            skipped_models: report.skipped_models,
        });
    };

    tracing::info!(diagnosis = %diagnosis, species = %species, breed = %breed, "Detail request");
    let prompt = build_detail_prompt(&diagnosis, &species, &breed);

    let details = match fetch_completion(
        client,
        &state.cache,
        &state.retry,
        &prompt,
        DETAIL_TEMPERATURE,
    )
    .await
    {
        Ok(text) => {
            report.queried(client.model());
            match extract_json(&text) {
                Some(profile @ JsonValue::Object(_)) => profile,
                _ => {
                    tracing::error!(content = %text, "Failed to parse veterinary details JSON");
                    report.skipped("response parsing error");
                    JsonValue::String(NO_DETAILS.to_string())
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Error getting veterinary details");
            report.skipped(format!("API error: {e}"));
            return Err(AppError::ServiceUnavailable {
                message: "No AI models available".to_string(),
                skipped_models: report.skipped_models,
            });
        }
    };

    Ok(Json(DetailsResponse {
        diagnosis,
        species,
        breed,
        veterinary_details: details,
        report,
    }))
}
