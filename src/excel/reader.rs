//! Spreadsheet reader: .xlsx / .xlsm / .xlsb / .xls / .ods → `Workbook`

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{MatchError, MatchResult};
use crate::types::{CellValue, RawSheet, Workbook};

/// File extensions calamine can decode
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Lowercased extension of `file_name` if it is a supported spreadsheet type
pub fn supported_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Reads every worksheet of a spreadsheet file into memory
pub struct WorkbookReader {
    path: PathBuf,
}

impl WorkbookReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Decode all sheets, in workbook order
    pub fn read(&self) -> MatchResult<Workbook> {
        let mut workbook =
            open_workbook_auto(&self.path).map_err(|e| MatchError::Parse(e.to_string()))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(sheet_names.len());

        for sheet_name in sheet_names {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| MatchError::Parse(format!("sheet \"{}\": {}", sheet_name, e)))?;
            let rows = grid_from_range(&range);
            debug!(sheet = %sheet_name, rows = rows.len(), "decoded sheet");
            sheets.push(RawSheet::new(sheet_name, rows));
        }

        Ok(Workbook::new(sheets))
    }
}

/// Convert a calamine range into rows of cells.
///
/// calamine trims leading empty columns; they are padded back so column
/// positions match the spreadsheet's own A, B, C... layout.
fn grid_from_range(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    if range.is_empty() {
        return Vec::new();
    }
    let leading = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    range
        .rows()
        .map(|row| {
            let mut cells = vec![CellValue::Empty; leading];
            cells.extend(row.iter().map(cell_value));
            cells
        })
        .collect()
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty => CellValue::Empty,
        // Dates, durations and error cells are searched by their display text
        other => CellValue::Text(other.to_string()),
    }
}
