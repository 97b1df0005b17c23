//! Estimate Search API server implementation
//!
//! HTTP server using Axum. Uploads are parsed and matched on the blocking
//! thread pool so large sheets do not stall other requests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::EngineConfig;
use crate::core::MatchEngine;
use crate::upload::ScratchDir;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Upload limit for `mb` megabytes, saturating instead of overflowing
pub fn upload_limit_bytes(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}

/// API Server configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Directory for per-request scratch copies of uploads
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub engine: EngineConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            upload_dir: std::env::temp_dir().join("estimate-uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            engine: EngineConfig::default(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub version: String,
    pub engine: Arc<MatchEngine>,
    pub scratch: ScratchDir,
}

impl AppState {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        Ok(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            engine: Arc::new(MatchEngine::new(config.engine.clone())?),
            scratch: ScratchDir::new(&config.upload_dir)?,
        })
    }
}

/// Build the router; separate from `run_api_server` so tests can drive it directly
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        .route("/upload", post(handlers::upload))
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "estimate_server=info,estimate_search=info,tower_http=info".into()
            }),
        )
        .init();

    let state = AppState::new(&config)?;
    let app = router(state, config.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Estimate Search API starting on http://{}", addr);
    info!("   Upload: POST /upload (file, search_term, mode)");
    info!("   Scratch dir: {}", config.upload_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Estimate Search API shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert!(config.upload_dir.ends_with("estimate-uploads"));
    }

    #[test]
    fn test_upload_limit_bytes() {
        assert_eq!(upload_limit_bytes(20), DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(upload_limit_bytes(0), 0);
        assert_eq!(upload_limit_bytes(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_config_address_format() {
        let config = ApiConfig {
            host: "192.168.1.100".to_string(),
            port: 9090,
            ..ApiConfig::default()
        };
        let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse().unwrap();
        assert_eq!(addr.port(), 9090);
    }

    #[test]
    fn test_app_state_creates_upload_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ApiConfig {
            upload_dir: dir.path().join("nested").join("uploads"),
            ..ApiConfig::default()
        };
        let state = AppState::new(&config).unwrap();
        assert!(state.scratch.path().is_dir());
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_app_state_rejects_invalid_engine_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = ApiConfig {
            upload_dir: dir.path().to_path_buf(),
            ..ApiConfig::default()
        };
        config.engine.threshold = 101;
        assert!(AppState::new(&config).is_err());
    }
}
