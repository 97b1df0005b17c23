//! Schema inference: canonical field names → actual column labels
//!
//! Header rows in estimate spreadsheets are unreliable: titles and blank
//! rows often sit above the real header, and labels drift ("Unit Cost ($)",
//! "Cost Unit"). Inference tries successive header offsets until the first
//! column carries a real label, then maps each canonical field to its best
//! token-sort match. Sheets with no usable header at all fall back to fixed
//! column positions.

use regex::Regex;
use tracing::{debug, warn};

use super::fuzzy::token_sort_ratio;
use crate::config::EngineConfig;
use crate::error::{MatchError, MatchResult};
use crate::types::{ColumnLayout, ColumnMapping, RawSheet, Sheet};

/// Recognizes labels that were synthesized rather than read from a header
pub struct HeaderDetector {
    placeholder: Regex,
}

impl HeaderDetector {
    pub fn new() -> MatchResult<Self> {
        let placeholder = Regex::new(r"(?i)^\s*(unnamed:\s*\d+|col_\d+|column\s*\d+)?\s*$")
            .map_err(|e| MatchError::Config(format!("Regex error: {}", e)))?;
        Ok(Self { placeholder })
    }

    pub fn is_placeholder(&self, label: &str) -> bool {
        self.placeholder.is_match(label)
    }
}

/// A sheet with its header applied and its columns mapped
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSheet {
    pub sheet: Sheet,
    pub mapping: ColumnMapping,
}

/// Best-scoring label for `field` (or any of its aliases).
///
/// Ties go to the leftmost column. Returns the score even when it does not
/// clear the threshold so callers can log near misses.
pub fn best_label(config: &EngineConfig, field: &str, columns: &[String]) -> Option<(String, u8)> {
    let mut best: Option<(String, u8)> = None;
    for label in columns {
        let score = config
            .names_for(field)
            .map(|name| token_sort_ratio(name, label))
            .max()
            .unwrap_or(0);
        match &best {
            Some((_, top)) if *top >= score => {}
            _ => best = Some((label.clone(), score)),
        }
    }
    best
}

/// Map each of `fields` to the column whose label scores above `column_threshold`.
///
/// Fields with no qualifying label are simply left out of the mapping.
pub fn infer_columns(
    config: &EngineConfig,
    columns: &[String],
    fields: &[String],
) -> MatchResult<ColumnMapping> {
    let mut pairs = Vec::new();
    for field in fields {
        match best_label(config, field, columns) {
            Some((label, score)) if score > config.column_threshold => {
                debug!(field = %field, label = %label, score, "mapped column");
                pairs.push((field.clone(), label));
            }
            Some((label, score)) => {
                debug!(field = %field, closest = %label, score, "no column above threshold");
            }
            None => {}
        }
    }
    ColumnMapping::from_pairs(columns, pairs, ColumnLayout::Inferred)
}

/// Find the header row of `raw` and map `fields` onto it.
///
/// Fails with `ColumnNotFound` when a real header exists but the item field
/// cannot be mapped. Only when no offset yields a real header does the
/// positional layout from the config take over.
pub fn resolve_sheet(
    config: &EngineConfig,
    detector: &HeaderDetector,
    raw: &RawSheet,
    fields: &[String],
) -> MatchResult<ResolvedSheet> {
    for offset in 0..=config.header_retry_limit {
        let Some(sheet) = raw.with_header(offset) else {
            break;
        };

        match sheet.first_label() {
            Some(label) if !detector.is_placeholder(label) => {}
            first => {
                debug!(sheet = %raw.name, offset, first = ?first, "header looks auto-generated, retrying");
                continue;
            }
        }

        let mapping = infer_columns(config, &sheet.columns, fields)?;
        if mapping.get(&config.item_field).is_none() {
            return Err(MatchError::ColumnNotFound(raw.name.clone()));
        }
        debug!(sheet = %raw.name, offset, mapped = mapping.len(), "header resolved");
        return Ok(ResolvedSheet { sheet, mapping });
    }

    warn!(
        sheet = %raw.name,
        tried = config.header_retry_limit + 1,
        "no usable header row, using positional columns"
    );
    positional(config, raw, fields)
}

fn positional(config: &EngineConfig, raw: &RawSheet, fields: &[String]) -> MatchResult<ResolvedSheet> {
    let sheet = raw.headerless(&config.positional_fields);
    let pairs: Vec<(String, String)> = fields
        .iter()
        .filter_map(|field| {
            let index = config.positional_fields.iter().position(|f| f == field)?;
            (index < sheet.columns.len()).then(|| (field.clone(), sheet.columns[index].clone()))
        })
        .collect();

    let mapping = ColumnMapping::from_pairs(&sheet.columns, pairs, ColumnLayout::Positional)?;
    if mapping.get(&config.item_field).is_none() {
        return Err(MatchError::ColumnNotFound(raw.name.clone()));
    }
    Ok(ResolvedSheet { sheet, mapping })
}
