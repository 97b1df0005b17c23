//! CLI command handlers

pub mod commands;

pub use commands::{inspect, list, load_engine, search, SearchOptions};
