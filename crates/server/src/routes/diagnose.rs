//! POST /diagnose

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde::Serialize;
use vetdx_core::{
    DISCLAIMER, DiagnosisResult, PatientRecord, build_diagnosis_prompt, extract_json, summarize,
};

use super::ProviderReport;
use crate::AppState;
use crate::ai::{DIAGNOSIS_TEMPERATURE, fetch_completion};
use crate::error::AppError;

const NO_PROVIDER_MESSAGE: &str =
    "No AI models were available to process your request. Please check API configurations.";

/// Response body for a diagnosis
#[derive(Serialize)]
pub struct DiagnoseResponse {
    diagnosis: String,
    #[serde(flatten)]
    result: DiagnosisResult,
    disclaimer: &'static str,
    #[serde(flatten)]
    report: ProviderReport,
}

/// POST /diagnose - Ranked diagnoses for a questionnaire
///
/// Validates the record, asks the model for a JSON diagnosis and relays it.
/// Output that cannot be interpreted is replaced by a fallback result; only
/// a request no provider could answer fails with 503.
pub async fn diagnose(
    State(state): State<AppState>,
    body: Result<Json<PatientRecord>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(record) = body?;
    let species = record.validate()?;

    let mut report = ProviderReport::default();
    let Some(client) = state.client.as_ref() else {
        report.skipped("no API key");
        return Err(AppError::ServiceUnavailable {
            message: NO_PROVIDER_MESSAGE.to_string(),
            skipped_models: report.skipped_models,
        });
    };

    tracing::info!(species = %species, "Diagnosis request");
    let prompt = build_diagnosis_prompt(&record);

    let result = match fetch_completion(
        client,
        &state.cache,
        &state.retry,
        &prompt,
        DIAGNOSIS_TEMPERATURE,
    )
    .await
    {
        Ok(text) => {
            report.queried(client.model());
            extract_json(&text)
                .and_then(DiagnosisResult::from_value)
                .unwrap_or_else(|| {
                    tracing::error!(content = %text, "Failed to parse diagnosis JSON");
                    report.skipped("response parsing error");
                    DiagnosisResult::fallback()
                })
        }
        Err(e) => {
            tracing::error!(error = %e, "OpenRouter API error");
            report.skipped(format!("API error: {e}"));
            return Err(AppError::ServiceUnavailable {
                message: NO_PROVIDER_MESSAGE.to_string(),
                skipped_models: report.skipped_models,
            });
        }
    };

    tracing::info!(
        conditions = result.conditions.len(),
        urgent = result.urgent,
        "Diagnosis complete"
    );

    Ok(Json(DiagnoseResponse {
        diagnosis: summarize(&result.conditions),
        result,
        disclaimer: DISCLAIMER,
        report,
    }))
}
