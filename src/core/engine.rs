//! Match engine: schema inference, then scoring, then assembly
//!
//! The engine is pure over an already decoded `Workbook`; it does no I/O and
//! keeps no state between requests beyond its configuration.

use tracing::{debug, info};

use super::matcher::{match_cells, match_column, select_sheet};
use super::schema::{resolve_sheet, HeaderDetector, ResolvedSheet};
use crate::config::EngineConfig;
use crate::error::{MatchError, MatchResult};
use crate::report::{project_by_label, project_mapped, Outcome, SheetMatch};
use crate::types::{Record, SearchMode, Workbook};

/// A validated search: the mode plus the term it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub mode: SearchMode,
    pub term: Option<String>,
}

impl SearchRequest {
    /// Resolve the effective mode and check the term is present when needed.
    ///
    /// Without an explicit mode, a non-blank term selects column search and
    /// no term selects list-all.
    pub fn new(mode: Option<SearchMode>, term: Option<String>) -> MatchResult<Self> {
        let term = term.filter(|t| !t.trim().is_empty());
        let mode = mode.unwrap_or(if term.is_some() {
            SearchMode::Column
        } else {
            SearchMode::List
        });

        match mode {
            SearchMode::List => Ok(Self { mode, term: None }),
            SearchMode::Column | SearchMode::Sheet if term.is_none() => {
                Err(MatchError::no_search_term())
            }
            _ => Ok(Self { mode, term }),
        }
    }

    pub fn list() -> Self {
        Self {
            mode: SearchMode::List,
            term: None,
        }
    }

    pub fn column(term: impl Into<String>) -> Self {
        Self {
            mode: SearchMode::Column,
            term: Some(term.into()),
        }
    }

    pub fn sheet(term: impl Into<String>) -> Self {
        Self {
            mode: SearchMode::Sheet,
            term: Some(term.into()),
        }
    }
}

pub struct MatchEngine {
    config: EngineConfig,
    detector: HeaderDetector,
}

impl MatchEngine {
    pub fn new(config: EngineConfig) -> MatchResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detector: HeaderDetector::new()?,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one request against a decoded workbook
    pub fn run(&self, workbook: &Workbook, request: &SearchRequest) -> MatchResult<Outcome> {
        let term = request.term.as_deref().unwrap_or_default();
        let outcome = match request.mode {
            SearchMode::List => Outcome::Projects(self.list_projects(workbook)?),
            SearchMode::Column => self.search_items(workbook, term)?,
            SearchMode::Sheet => Outcome::Matches(self.search_workbook(workbook, term)),
        };
        info!(mode = %request.mode, results = outcome.len(), "search complete");
        Ok(outcome)
    }

    /// Every data row of the first sheet, projected onto the project fields
    pub fn list_projects(&self, workbook: &Workbook) -> MatchResult<Vec<Record>> {
        let raw = workbook
            .first_sheet()
            .ok_or_else(|| MatchError::Parse("workbook contains no sheets".to_string()))?;
        let Some(sheet) = raw.with_header(0) else {
            return Ok(Vec::new());
        };

        Ok((0..sheet.rows.len())
            .map(|row| project_by_label(&sheet, row, &self.config.project_fields))
            .collect())
    }

    /// Locate the marker sheet and map its columns
    pub fn resolve_item_sheet(&self, workbook: &Workbook) -> MatchResult<ResolvedSheet> {
        let raw = select_sheet(workbook, &self.config.sheet_marker)?;
        debug!(sheet = %raw.name, "selected sheet");
        resolve_sheet(&self.config, &self.detector, raw, &self.config.item_fields)
    }

    /// Score the item column of the marker sheet
    pub fn search_items(&self, workbook: &Workbook, term: &str) -> MatchResult<Outcome> {
        let ResolvedSheet { sheet, mapping } = self.resolve_item_sheet(workbook)?;
        let item_label = mapping
            .get(&self.config.item_field)
            .ok_or_else(|| MatchError::ColumnNotFound(sheet.name.clone()))?;

        let items = match_column(&sheet, item_label, term, self.config.threshold)
            .into_iter()
            .map(|hit| project_mapped(&sheet, hit.row_index, &mapping, &self.config.item_fields))
            .collect();

        Ok(Outcome::Items {
            items,
            layout: mapping.layout(),
        })
    }

    /// Score every cell of every sheet, using each sheet's first row as header
    pub fn search_workbook(&self, workbook: &Workbook, term: &str) -> Vec<SheetMatch> {
        let mut matches = Vec::new();
        for raw in &workbook.sheets {
            let Some(sheet) = raw.with_header(0) else {
                continue;
            };
            for hit in match_cells(&sheet, term, self.config.threshold) {
                matches.push(SheetMatch::new(&sheet, hit));
            }
        }
        matches
    }
}
