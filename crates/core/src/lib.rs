//! vetdx-core: Shared types and pure pipeline stages
//!
//! This crate holds everything in the diagnosis pipeline that does not
//! touch the network: the patient record and its validation, prompt
//! construction, JSON recovery from model output, the diagnosis result
//! types, and the bounded response cache.

pub mod cache;
pub mod diagnosis;
pub mod error;
pub mod extract;
pub mod patient;
pub mod prompt;

pub use cache::{CacheStats, DEFAULT_CAPACITY, ResponseCache, fingerprint};
pub use diagnosis::{DISCLAIMER, DiagnosisCondition, DiagnosisResult, summarize};
pub use error::ValidationError;
pub use extract::extract_json;
pub use patient::{PatientRecord, REQUIRED_FIELDS, Species};
pub use prompt::{DEFAULT_BREED, build_detail_prompt, build_diagnosis_prompt};
