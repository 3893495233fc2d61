//! Upstream model access: OpenRouter client, retry policy and response cache

pub mod client;
pub mod completion;
pub mod retry;

pub use client::{ChatCompletion, OpenRouterClient, UpstreamError};
pub use completion::{CompletionCache, fetch_completion};
pub use retry::RetryConfig;

/// Name recorded in `queried_models` / `skipped_models`
pub const PROVIDER_NAME: &str = "OpenRouter";

/// Sampling temperature for diagnosis requests
pub const DIAGNOSIS_TEMPERATURE: f32 = 0.15;

/// Sampling temperature for condition-detail requests
pub const DETAIL_TEMPERATURE: f32 = 0.1;
