//! HTTP API
//!
//! A single upload endpoint plus health/version probes.
//! Run with `estimate-search serve` or `estimate-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
