//! API server setup and configuration.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::{DocumentProcessor, PattaConfig, PattaError, Result};

use super::{
    handlers::{health_handler, info_handler, process_handler},
    types::{ApiSizeLimits, ApiState, DEFAULT_MAX_UPLOAD_MB},
};

const CORS_ORIGINS_ENV: &str = "PATTA_CORS_ORIGINS";
const MAX_UPLOAD_SIZE_ENV: &str = "PATTA_MAX_UPLOAD_SIZE_MB";

/// Parse size limits from `PATTA_MAX_UPLOAD_SIZE_MB`.
///
/// The value applies to both the request body and the multipart field.
/// Falls back to the default (25 MB) if unset, zero or not a number.
pub fn parse_size_limits_from_env() -> ApiSizeLimits {
    if let Ok(value) = std::env::var(MAX_UPLOAD_SIZE_ENV) {
        match value.trim().parse::<usize>() {
            Ok(mb) if mb > 0 => {
                tracing::info!("Upload size limit configured from environment: {} MB", mb);
                return ApiSizeLimits::from_mb(mb, mb);
            }
            Ok(_) => tracing::warn!("Invalid {} value (must be > 0)", MAX_UPLOAD_SIZE_ENV),
            Err(_) => tracing::warn!("Failed to parse {}='{}', must be a whole number", MAX_UPLOAD_SIZE_ENV, value),
        }
    }

    tracing::info!(
        "Upload size limit: {} MB (default) - configure with {}",
        DEFAULT_MAX_UPLOAD_MB,
        MAX_UPLOAD_SIZE_ENV
    );
    ApiSizeLimits::default()
}

fn cors_layer_from_env() -> CorsLayer {
    let permissive = || CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let Ok(origins_str) = std::env::var(CORS_ORIGINS_ENV) else {
        tracing::warn!(
            "CORS configured to allow all origins (default). Set {} to a comma-separated list of origins to restrict it",
            CORS_ORIGINS_ENV
        );
        return permissive();
    };

    let origins: Vec<_> = origins_str
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("{} set but empty/invalid - falling back to permissive CORS", CORS_ORIGINS_ENV);
        return permissive();
    }

    tracing::info!("CORS configured with {} explicit allowed origin(s)", origins.len());
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the API router with default size limits.
///
/// Public so the router can be nested into a larger application.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use patta_ocr::{DocumentProcessor, PattaConfig, api::create_router};
///
/// # fn main() -> patta_ocr::Result<()> {
/// let processor = DocumentProcessor::from_config(&PattaConfig::default())?;
/// let app = axum::Router::new().nest("/api", create_router(Arc::new(processor)));
/// # Ok(())
/// # }
/// ```
pub fn create_router(processor: Arc<DocumentProcessor>) -> Router {
    create_router_with_limits(processor, ApiSizeLimits::default())
}

/// Create the API router with custom size limits.
pub fn create_router_with_limits(processor: Arc<DocumentProcessor>, limits: ApiSizeLimits) -> Router {
    let state = ApiState { processor };

    Router::new()
        .route("/ocr/process", post(process_handler))
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .layer(DefaultBodyLimit::max(limits.max_multipart_field_bytes))
        .layer(RequestBodyLimitLayer::new(limits.max_request_body_bytes))
        .layer(cors_layer_from_env())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server with config file discovery.
///
/// Loads `patta.toml` from the current or a parent directory (or defaults),
/// applies `PATTA_*` environment overrides and builds the backends.
///
/// # Environment Variables
///
/// ```bash
/// export PATTA_NER_API_TOKEN=hf_xxx
/// export PATTA_CORS_ORIGINS="https://app.example.com"
/// export PATTA_MAX_UPLOAD_SIZE_MB=25
/// ```
pub async fn serve(host: impl AsRef<str>, port: u16) -> Result<()> {
    let config = PattaConfig::load(None)?;
    serve_with_config(host, port, config).await
}

/// Start the API server with explicit config; size limits come from the environment.
pub async fn serve_with_config(host: impl AsRef<str>, port: u16, config: PattaConfig) -> Result<()> {
    let limits = parse_size_limits_from_env();
    serve_with_config_and_limits(host, port, config, limits).await
}

/// Start the API server with explicit config and size limits.
///
/// # Errors
///
/// Fails if the host is not an IP address, a backend cannot be initialized
/// or the port cannot be bound.
pub async fn serve_with_config_and_limits(
    host: impl AsRef<str>,
    port: u16,
    config: PattaConfig,
    limits: ApiSizeLimits,
) -> Result<()> {
    let ip: IpAddr = host
        .as_ref()
        .parse()
        .map_err(|e| PattaError::validation(format!("Invalid host address: {}", e)))?;

    // Backend initialization may run blocking subprocesses.
    let processor = tokio::task::spawn_blocking(move || DocumentProcessor::from_config(&config))
        .await
        .map_err(|e| PattaError::Other(format!("Backend initialization task failed: {}", e)))??;
    let processor = Arc::new(processor);
    let addr = SocketAddr::new(ip, port);
    let app = create_router_with_limits(Arc::clone(&processor), limits);

    tracing::info!("Starting Patta OCR API server on http://{}:{}", ip, port);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(PattaError::Io)?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PattaError::Other(e.to_string()));

    processor.shutdown();
    tracing::info!("Patta OCR API server stopped");
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Start the API server on 127.0.0.1:8000 with config discovery.
pub async fn serve_default() -> Result<()> {
    serve("127.0.0.1", 8000).await
}
