//! vetdx-server: veterinary diagnosis relay binary entrypoint.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vetdx_server::config::Config;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();

    // Log startup info
    if config.openrouter_api_key.is_some() {
        tracing::info!(
            model = %config.openrouter_model,
            json_mode = config.json_mode,
            "OpenRouter API key configured, AI features enabled"
        );
    } else {
        tracing::warn!("OPENROUTER_API_KEY not set, AI features disabled");
    }
    tracing::info!(
        max_attempts = config.retry.max_attempts,
        base_delay_ms = config.retry.base_delay.as_millis() as u64,
        max_delay_ms = config.retry.max_delay.as_millis() as u64,
        cache_capacity = config.cache_capacity,
        "Upstream policy"
    );
    tracing::info!("Rate limiting: {} requests/second", config.rate_limit_rps);
    tracing::info!(static_dir = %config.static_dir.display(), "Serving static assets");

    // Build application
    let app = vetdx_server::build_app(&config);

    // Start server
    let addr: SocketAddr = config.bind_address.parse().expect("Invalid bind address");
    tracing::info!("Starting vetdx server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shutdown complete");
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
