//! Server configuration

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::ai::RetryConfig;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-8b-instruct:free";

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub static_dir: PathBuf,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    /// `None` disables the AI endpoints; static assets are still served
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub openrouter_model: String,
    /// Ask the provider for strict JSON output (`response_format`)
    pub json_mode: bool,
    pub app_referer: String,
    pub app_title: String,
    pub upstream_timeout: Duration,
    pub cache_capacity: usize,
    pub retry: RetryConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".into()),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            rate_limit_rps: env_or("RATE_LIMIT_RPS", 10),
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openrouter_base_url: std::env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            openrouter_model: std::env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.into()),
            json_mode: env_or("OPENROUTER_JSON_MODE", false),
            app_referer: std::env::var("APP_REFERER")
                .unwrap_or_else(|_| "http://localhost:5000".into()),
            app_title: std::env::var("APP_TITLE")
                .unwrap_or_else(|_| "Veterinary AI Assistant".into()),
            upstream_timeout: Duration::from_secs(env_or("UPSTREAM_TIMEOUT_SECS", 60)),
            cache_capacity: env_or("CACHE_CAPACITY", vetdx_core::DEFAULT_CAPACITY),
            retry: RetryConfig {
                max_attempts: env_or("RETRY_MAX_ATTEMPTS", 3),
                base_delay: Duration::from_millis(env_or("RETRY_BASE_DELAY_MS", 2000)),
                max_delay: Duration::from_millis(env_or("RETRY_MAX_DELAY_MS", 8000)),
            },
        }
    }
}

/// Parse an environment variable, falling back to `default` when unset or invalid
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
