//! Engine configuration
//!
//! Every heuristic constant the match engine uses lives here so that tests
//! and deployments can override it from a YAML file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{MatchError, MatchResult};

pub const DEFAULT_THRESHOLD: u8 = 70;
pub const DEFAULT_SHEET_MARKER: &str = "Detail";
pub const DEFAULT_HEADER_RETRY_LIMIT: usize = 5;

const ITEM_FIELDS: [&str; 5] = ["Item", "Unit", "Quantity", "Unit Cost", "Total Cost"];
const PROJECT_FIELDS: [&str; 3] = ["Project Name", "Square Footage", "Unit Cost"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Row scores strictly above this (0-100) count as a match
    pub threshold: u8,
    /// Header labels must score strictly above this to be mapped to a field
    pub column_threshold: u8,
    /// Substring the column-search sheet's name must contain
    pub sheet_marker: String,
    /// Canonical field that must be found for column search
    pub item_field: String,
    /// Fields projected into `items` results
    pub item_fields: Vec<String>,
    /// Fields projected into `projects` results
    pub project_fields: Vec<String>,
    /// Extra names a canonical field may appear under
    pub aliases: HashMap<String, Vec<String>>,
    /// Header offsets `0..=header_retry_limit` are tried before falling back
    pub header_retry_limit: usize,
    /// Degraded-mode labels, by column index
    pub positional_fields: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut aliases = HashMap::new();
        aliases.insert(
            "Item".to_string(),
            vec!["Description".to_string(), "Item Description".to_string()],
        );

        Self {
            threshold: DEFAULT_THRESHOLD,
            column_threshold: DEFAULT_THRESHOLD,
            sheet_marker: DEFAULT_SHEET_MARKER.to_string(),
            item_field: "Item".to_string(),
            item_fields: ITEM_FIELDS.iter().map(|s| s.to_string()).collect(),
            project_fields: PROJECT_FIELDS.iter().map(|s| s.to_string()).collect(),
            aliases,
            header_retry_limit: DEFAULT_HEADER_RETRY_LIMIT,
            positional_fields: ITEM_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a YAML config file
    pub fn load(path: &Path) -> MatchResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> MatchResult<Self> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Same config with a different row threshold; column inference is unchanged
    pub fn with_threshold(mut self, threshold: u8) -> MatchResult<Self> {
        self.threshold = threshold;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> MatchResult<()> {
        for (key, value) in [
            ("threshold", self.threshold),
            ("column_threshold", self.column_threshold),
        ] {
            if value > 100 {
                return Err(MatchError::Config(format!(
                    "{} must be between 0 and 100, got {}",
                    key, value
                )));
            }
        }
        if self.item_field.trim().is_empty() {
            return Err(MatchError::Config("item_field must not be empty".to_string()));
        }
        if !self.item_fields.contains(&self.item_field) {
            return Err(MatchError::Config(format!(
                "item_field \"{}\" must be listed in item_fields",
                self.item_field
            )));
        }
        if self.sheet_marker.is_empty() {
            return Err(MatchError::Config("sheet_marker must not be empty".to_string()));
        }
        Ok(())
    }

    /// Field name followed by its aliases
    pub fn names_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> {
        std::iter::once(field).chain(
            self.aliases
                .get(field)
                .into_iter()
                .flatten()
                .map(String::as_str),
        )
    }
}
