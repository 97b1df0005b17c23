//! Core matching logic: scoring, schema inference, row matching

pub mod engine;
pub mod fuzzy;
pub mod matcher;
pub mod schema;

pub use engine::{MatchEngine, SearchRequest};
pub use schema::{HeaderDetector, ResolvedSheet};
