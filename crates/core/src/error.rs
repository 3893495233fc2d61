use thiserror::Error;

/// Reasons a patient record is rejected before any model call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Species must be either 'cat' or 'dog'")]
    InvalidSpecies(String),
}
