//! Result assembly and the caller-facing response object
//!
//! Rows are projected onto a fixed field set. Any field the row or the
//! column mapping cannot supply becomes `"N/A"`; a row is never dropped
//! because an optional field is missing.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::MatchError;
use crate::types::{CellValue, ColumnLayout, ColumnMapping, Record, RowMatch, Sheet};

pub const NO_MATCH_MESSAGE: &str = "No matching item found";

/// Project `fields` by exact column label
pub fn project_by_label(sheet: &Sheet, row: usize, fields: &[String]) -> Record {
    let mut record = Record::new();
    for field in fields {
        let value = sheet.cell(row, field).cloned().unwrap_or(CellValue::Empty);
        record.push(field.clone(), value);
    }
    record
}

/// Project `fields` through an inferred (or positional) column mapping
pub fn project_mapped(
    sheet: &Sheet,
    row: usize,
    mapping: &ColumnMapping,
    fields: &[String],
) -> Record {
    let mut record = Record::new();
    for field in fields {
        let value = mapping
            .get(field)
            .and_then(|label| sheet.cell(row, label))
            .cloned()
            .unwrap_or(CellValue::Empty);
        record.push(field.clone(), value);
    }
    record
}

/// Every column of a row, keyed by its label
pub fn full_row(sheet: &Sheet, row: usize) -> Record {
    project_by_label(sheet, row, &sheet.columns)
}

/// A whole-sheet hit with its provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetMatch {
    pub sheet: String,
    pub row_index: usize,
    pub column: String,
    pub value: CellValue,
    pub score: u8,
    pub row: Record,
}

impl SheetMatch {
    pub fn new(sheet: &Sheet, hit: RowMatch) -> Self {
        let row = full_row(sheet, hit.row_index);
        Self {
            sheet: hit.sheet,
            row_index: hit.row_index,
            column: hit.column,
            value: hit.value,
            score: hit.score,
            row,
        }
    }
}

/// What a successful request produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Projects(Vec<Record>),
    Items {
        items: Vec<Record>,
        layout: ColumnLayout,
    },
    Matches(Vec<SheetMatch>),
}

impl Outcome {
    pub fn len(&self) -> usize {
        match self {
            Outcome::Projects(records) => records.len(),
            Outcome::Items { items, .. } => items.len(),
            Outcome::Matches(matches) => matches.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Projects(Vec<Record>),
    Items(Vec<Record>),
    Matches(Vec<SheetMatch>),
    Message(String),
}

/// `{"status": "success", ...}` or `{"status": "error", "message": ...}`
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    Success {
        payload: Payload,
        /// Present only when results came from positional columns
        layout: Option<ColumnLayout>,
    },
    Error {
        message: String,
    },
}

impl Serialize for SearchResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            SearchResponse::Success { payload, layout } => {
                map.serialize_entry("status", "success")?;
                match payload {
                    Payload::Projects(records) => map.serialize_entry("projects", records)?,
                    Payload::Items(records) => map.serialize_entry("items", records)?,
                    Payload::Matches(matches) => map.serialize_entry("matches", matches)?,
                    Payload::Message(message) => map.serialize_entry("message", message)?,
                }
                if let Some(layout) = layout {
                    map.serialize_entry("layout", layout)?;
                }
            }
            SearchResponse::Error { message } => {
                map.serialize_entry("status", "error")?;
                map.serialize_entry("message", message)?;
            }
        }
        map.end()
    }
}

impl SearchResponse {
    pub fn from_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Projects(records) => Self::success(Payload::Projects(records)),
            Outcome::Items { items, .. } if items.is_empty() => Self::no_match(),
            Outcome::Items { items, layout } => SearchResponse::Success {
                payload: Payload::Items(items),
                layout: (layout == ColumnLayout::Positional).then_some(layout),
            },
            Outcome::Matches(matches) if matches.is_empty() => Self::no_match(),
            Outcome::Matches(matches) => Self::success(Payload::Matches(matches)),
        }
    }

    pub fn from_result(result: Result<Outcome, MatchError>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome),
            Err(e) => Self::error(e.to_string()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        SearchResponse::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SearchResponse::Success { .. })
    }

    fn success(payload: Payload) -> Self {
        SearchResponse::Success {
            payload,
            layout: None,
        }
    }

    fn no_match() -> Self {
        Self::success(Payload::Message(NO_MATCH_MESSAGE.to_string()))
    }
}
