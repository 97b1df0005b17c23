use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{MatchError, MatchResult};

/// Placeholder rendered for any field a row does not provide.
pub const NOT_AVAILABLE: &str = "N/A";

//==============================================================================
// Cell values
//==============================================================================

/// A single decoded spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Text used for fuzzy scoring (empty string for `Empty`)
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Empty => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// True for `Empty` and for whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) if is_whole(*n) => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Empty => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) if is_whole(*n) => serializer.serialize_i64(*n as i64),
            CellValue::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            // Non-finite numbers would serialize as null
            CellValue::Number(_) | CellValue::Empty => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

fn is_whole(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15
}

//==============================================================================
// Workbook and sheets
//==============================================================================

/// A worksheet exactly as decoded, before any header row is chosen
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Widest row in the grid
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Interpret the row at `offset` as the header.
    ///
    /// Returns `None` when the sheet has no row at that offset.
    pub fn with_header(&self, offset: usize) -> Option<Sheet> {
        let header = self.rows.get(offset)?;
        let width = self.width();

        let mut columns: Vec<String> = Vec::with_capacity(width);
        for col in 0..width {
            let label = match header.get(col) {
                Some(cell) if !cell.is_blank() => cell.as_text().trim().to_string(),
                _ => format!("Unnamed: {}", col),
            };
            columns.push(dedupe_label(&columns, label));
        }

        Some(Sheet {
            name: self.name.clone(),
            header_offset: Some(offset),
            columns,
            rows: self.data_rows(offset + 1, width),
        })
    }

    /// Interpret every row as data, labelling columns by position.
    ///
    /// Columns beyond `labels` fall back to `Unnamed: <col>`.
    pub fn headerless(&self, labels: &[String]) -> Sheet {
        let width = self.width();
        let mut columns: Vec<String> = Vec::with_capacity(width);
        for col in 0..width {
            let label = labels
                .get(col)
                .cloned()
                .unwrap_or_else(|| format!("Unnamed: {}", col));
            columns.push(dedupe_label(&columns, label));
        }

        Sheet {
            name: self.name.clone(),
            header_offset: None,
            columns,
            rows: self.data_rows(0, width),
        }
    }

    fn data_rows(&self, start: usize, width: usize) -> Vec<Vec<CellValue>> {
        self.rows
            .iter()
            .skip(start)
            .filter(|row| !row.iter().all(CellValue::is_blank))
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, CellValue::Empty);
                row
            })
            .collect()
    }
}

/// `Cost`, `Cost` → `Cost`, `Cost.1`
fn dedupe_label(existing: &[String], label: String) -> String {
    if !existing.contains(&label) {
        return label;
    }
    (1..)
        .map(|n| format!("{}.{}", label, n))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or(label)
}

/// A worksheet with a header row applied: labelled columns over data rows
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// Row the labels came from; `None` for positional (headerless) sheets
    pub header_offset: Option<usize>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    pub fn cell(&self, row: usize, label: &str) -> Option<&CellValue> {
        let col = self.column_index(label)?;
        self.rows.get(row)?.get(col)
    }

    pub fn first_label(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }
}

/// All worksheets of one uploaded file, in workbook order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<RawSheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<RawSheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn first_sheet(&self) -> Option<&RawSheet> {
        self.sheets.first()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

//==============================================================================
// Column mapping
//==============================================================================

/// How a column mapping was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnLayout {
    /// Header labels matched against canonical field names
    Inferred,
    /// Degraded mode: fixed column indices, no usable header row
    Positional,
}

/// Canonical field name → actual column label, for one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    entries: Vec<(String, String)>,
    layout: ColumnLayout,
}

impl ColumnMapping {
    /// Build a mapping, rejecting any label the sheet does not have.
    pub fn from_pairs<I>(columns: &[String], pairs: I, layout: ColumnLayout) -> MatchResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries = Vec::new();
        for (field, label) in pairs {
            if !columns.contains(&label) {
                return Err(MatchError::Config(format!(
                    "column \"{}\" mapped to \"{}\" is not present in the sheet",
                    label, field
                )));
            }
            entries.push((field, label));
        }
        Ok(Self { entries, layout })
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, label)| label.as_str())
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//==============================================================================
// Matches and records
//==============================================================================

/// One row that cleared the threshold, plus where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct RowMatch {
    pub sheet: String,
    /// 0-based index into the sheet's data rows
    pub row_index: usize,
    pub column: String,
    pub value: CellValue,
    pub score: u8,
}

/// Ordered field → value projection of a row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, value: CellValue) {
        self.fields.push((field.into(), value));
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(f, _)| f == field).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

//==============================================================================
// Search mode
//==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// No search: list every row of the first sheet
    List,
    /// Score only the inferred item column of the marker sheet
    Column,
    /// Score every cell of every sheet
    Sheet,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" | "all" => Ok(SearchMode::List),
            "column" | "item" | "items" => Ok(SearchMode::Column),
            "sheet" | "whole-sheet" | "workbook" => Ok(SearchMode::Sheet),
            other => Err(format!(
                "unknown search mode '{}' (expected list, column or sheet)",
                other
            )),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMode::List => "list",
            SearchMode::Column => "column",
            SearchMode::Sheet => "sheet",
        };
        write!(f, "{}", name)
    }
}
