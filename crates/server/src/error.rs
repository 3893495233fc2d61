//! Application error handling

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use vetdx_core::ValidationError;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    ServiceUnavailable {
        message: String,
        skipped_models: Vec<String>,
    },
    RateLimited,
    Internal(String),
}

/// JSON body of every error response
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped_models: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg,
                    skipped_models: None,
                },
            ),
            AppError::ServiceUnavailable {
                message,
                skipped_models,
            } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    error: message,
                    skipped_models: Some(skipped_models),
                },
            ),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorBody {
                    error: "Rate limit exceeded. Please try again later.".to_string(),
                    skipped_models: None,
                },
            ),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: msg,
                        skipped_models: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid JSON body: {}", err.body_text()))
    }
}

/// Turn a handler panic into a 500 with the panic message
pub fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unexpected error".to_string()
    };
    AppError::Internal(message).into_response()
}
