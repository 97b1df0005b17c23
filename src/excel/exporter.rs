//! Excel exporter for search results

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

use crate::error::{MatchError, MatchResult};
use crate::report::Outcome;
use crate::types::{CellValue, Record, NOT_AVAILABLE};

const RESULTS_SHEET: &str = "Results";
const MATCH_COLUMNS: [&str; 5] = ["Sheet", "Row", "Column", "Value", "Score"];

/// Writes an `Outcome` to a single-sheet workbook
pub struct ResultExporter<'a> {
    outcome: &'a Outcome,
}

impl<'a> ResultExporter<'a> {
    pub fn new(outcome: &'a Outcome) -> Self {
        Self { outcome }
    }

    pub fn export(&self, output: &Path) -> MatchResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(RESULTS_SHEET)
            .map_err(|e| MatchError::Export(format!("Failed to name worksheet: {}", e)))?;

        match self.outcome {
            Outcome::Projects(records) => write_records(worksheet, records)?,
            Outcome::Items { items, .. } => write_records(worksheet, items)?,
            Outcome::Matches(matches) => {
                write_header(worksheet, MATCH_COLUMNS.iter().copied())?;
                for (idx, hit) in matches.iter().enumerate() {
                    let row = (idx + 1) as u32;
                    write_cell(worksheet, row, 0, &CellValue::Text(hit.sheet.clone()))?;
                    write_cell(worksheet, row, 1, &CellValue::Number(hit.row_index as f64))?;
                    write_cell(worksheet, row, 2, &CellValue::Text(hit.column.clone()))?;
                    write_cell(worksheet, row, 3, &hit.value)?;
                    write_cell(worksheet, row, 4, &CellValue::Number(f64::from(hit.score)))?;
                }
            }
        }

        workbook
            .save(output)
            .map_err(|e| MatchError::Export(format!("Failed to save Excel file: {}", e)))?;
        Ok(())
    }
}

fn write_records(worksheet: &mut Worksheet, records: &[Record]) -> MatchResult<()> {
    let Some(first) = records.first() else {
        return Ok(());
    };
    write_header(worksheet, first.fields().map(|(field, _)| field))?;

    for (idx, record) in records.iter().enumerate() {
        for (col, (_, value)) in record.fields().enumerate() {
            write_cell(worksheet, (idx + 1) as u32, col as u16, value)?;
        }
    }
    Ok(())
}

fn write_header<'h>(
    worksheet: &mut Worksheet,
    labels: impl Iterator<Item = &'h str>,
) -> MatchResult<()> {
    let bold = Format::new().set_bold();
    for (col, label) in labels.enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, label, &bold)
            .map_err(|e| MatchError::Export(format!("Failed to write header: {}", e)))?;
    }
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> MatchResult<()> {
    let result = match value {
        CellValue::Text(s) => worksheet.write_string(row, col, s),
        CellValue::Number(n) if n.is_finite() => worksheet.write_number(row, col, *n),
        CellValue::Bool(b) => worksheet.write_boolean(row, col, *b),
        CellValue::Number(_) | CellValue::Empty => worksheet.write_string(row, col, NOT_AVAILABLE),
    };
    result
        .map(|_| ())
        .map_err(|e| MatchError::Export(format!("Failed to write cell: {}", e)))
}
