//! vetdx-server library crate
//!
//! Exposes `build_app` and `config` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

pub mod ai;
pub mod config;
mod error;
mod middleware;
mod routes;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use ai::{CompletionCache, OpenRouterClient, RetryConfig};
use config::Config;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// `None` when no provider API key is configured
    pub client: Option<OpenRouterClient>,
    pub cache: Arc<CompletionCache>,
    pub retry: RetryConfig,
    pub metrics: PrometheusHandle,
}

/// Build the full application router with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(config: &Config) -> Router {
    // Install Prometheus metrics recorder.
    // Use build_recorder() + set_global_recorder() so that repeated calls
    // (e.g. in integration tests) don't panic; the second install is
    // silently ignored and we still get a valid handle for /metrics.
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    let state = AppState {
        client: OpenRouterClient::from_config(config),
        cache: Arc::new(CompletionCache::new(config.cache_capacity)),
        retry: config.retry.clone(),
        metrics: prometheus_handle,
    };

    let rate_limiter = middleware::create_rate_limiter(config.rate_limit_rps);

    // AI routes (rate limited, they cost upstream tokens)
    let ai_routes = routes::ai_routes()
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    let public_routes = Router::new()
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::metrics::get));

    // Browser UI
    let static_dir = &config.static_dir;
    let assets = Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/scripts.js", ServeFile::new(static_dir.join("scripts.js")))
        .route_service("/styles.css", ServeFile::new(static_dir.join("styles.css")))
        .nest_service("/images", ServeDir::new(static_dir.join("images")));

    // Build CORS layer
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Build application
    Router::new()
        .merge(public_routes)
        .merge(ai_routes)
        .merge(assets)
        .with_state(state)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(axum_mw::from_fn(middleware::noindex_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}
