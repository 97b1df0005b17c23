//! Estimate Search - fuzzy row search over uploaded cost spreadsheets
//!
//! Give it a spreadsheet and (optionally) a search term; get back the
//! matching rows as structured data.
//!
//! # Features
//!
//! - List-all, item-column and whole-workbook search modes
//! - Partial-ratio fuzzy matching with a configurable threshold
//! - Header-row detection and token-sort column inference
//! - Positional fallback for sheets without a usable header
//! - HTTP upload API and a CLI
//!
//! # Example
//!
//! ```no_run
//! use estimate_search::core::{MatchEngine, SearchRequest};
//! use estimate_search::excel::WorkbookReader;
//! use estimate_search::report::SearchResponse;
//! use estimate_search::EngineConfig;
//!
//! let workbook = WorkbookReader::new("estimate.xlsx").read()?;
//! let engine = MatchEngine::new(EngineConfig::default())?;
//! let outcome = engine.run(&workbook, &SearchRequest::column("pipe fitting"))?;
//!
//! let response = SearchResponse::from_outcome(outcome);
//! println!("{}", serde_json::to_string_pretty(&response).unwrap());
//! # Ok::<(), estimate_search::error::MatchError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod report;
pub mod types;
pub mod upload;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{MatchError, MatchResult};
pub use types::{CellValue, ColumnMapping, RawSheet, RowMatch, SearchMode, Sheet, Workbook};
