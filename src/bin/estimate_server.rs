//! Estimate Search API Server binary
//!
//! HTTP upload endpoint for fuzzy spreadsheet search.

use clap::Parser;
use estimate_search::api::server::{upload_limit_bytes, DEFAULT_MAX_UPLOAD_BYTES};
use estimate_search::api::{run_api_server, ApiConfig};
use estimate_search::config::EngineConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "estimate-server")]
#[command(version)]
#[command(about = "Estimate Search API Server - upload a spreadsheet, get matching rows as JSON")]
#[command(long_about = r#"
Estimate Search API Server

Endpoints:
  - GET  /         - HTML upload form
  - POST /upload   - Multipart upload: file, search_term (optional), mode (optional)
  - GET  /health   - Health check
  - GET  /version  - Server version and matching settings

Modes:
  list    - every row of the first sheet (default without a search term)
  column  - fuzzy-search the item column of the "Detail" sheet (default with a term)
  sheet   - fuzzy-search every cell of every sheet

Features:
  - Uploads stored in per-request scratch files, removed after each request
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - Tracing and structured logging (RUST_LOG)

Example usage:
  estimate-server                           # Start on localhost:5000
  estimate-server --host 0.0.0.0 --port 8080

  curl -F file=@estimate.xlsx -F search_term="pipe fitting" \
    http://localhost:5000/upload
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "ESTIMATE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "ESTIMATE_PORT")]
    port: u16,

    /// Scratch directory for uploaded files
    #[arg(long, env = "ESTIMATE_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Maximum upload size in megabytes
    #[arg(long, env = "ESTIMATE_MAX_UPLOAD_MB")]
    max_upload_mb: Option<usize>,

    /// Engine config (YAML)
    #[arg(short, long, env = "ESTIMATE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let defaults = ApiConfig::default();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        upload_dir: args.upload_dir.unwrap_or(defaults.upload_dir),
        max_upload_bytes: args
            .max_upload_mb
            .map(upload_limit_bytes)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        engine: match args.config {
            Some(path) => EngineConfig::load(&path)?,
            None => EngineConfig::default(),
        },
    };

    run_api_server(config).await
}
