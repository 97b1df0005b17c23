//! Sheet selection and row scoring
//!
//! Results always come back in scan order (sheet, then row, then column).
//! Scores only decide inclusion; they never reorder results.

use super::fuzzy::partial_ratio;
use crate::error::{MatchError, MatchResult};
use crate::types::{RawSheet, RowMatch, Sheet, Workbook};

/// First sheet whose name contains `marker`, in workbook order
pub fn select_sheet<'a>(workbook: &'a Workbook, marker: &str) -> MatchResult<&'a RawSheet> {
    workbook
        .sheets
        .iter()
        .find(|sheet| sheet.name.contains(marker))
        .ok_or_else(|| MatchError::SheetNotFound(marker.to_string()))
}

/// Score one column of `sheet`; one result per row above `threshold`.
///
/// A label the sheet does not have yields no matches.
pub fn match_column(sheet: &Sheet, column: &str, term: &str, threshold: u8) -> Vec<RowMatch> {
    let Some(col) = sheet.column_index(column) else {
        return Vec::new();
    };

    sheet
        .rows
        .iter()
        .enumerate()
        .filter_map(|(row_index, row)| {
            let value = row.get(col)?;
            let score = partial_ratio(term, &value.as_text());
            (score > threshold).then(|| RowMatch {
                sheet: sheet.name.clone(),
                row_index,
                column: column.to_string(),
                value: value.clone(),
                score,
            })
        })
        .collect()
}

/// Score every cell of `sheet`; one result per (row, column) above `threshold`.
pub fn match_cells(sheet: &Sheet, term: &str, threshold: u8) -> Vec<RowMatch> {
    let mut matches = Vec::new();
    for (row_index, row) in sheet.rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            let score = partial_ratio(term, &value.as_text());
            if score > threshold {
                matches.push(RowMatch {
                    sheet: sheet.name.clone(),
                    row_index,
                    column: sheet.columns[col].clone(),
                    value: value.clone(),
                    score,
                });
            }
        }
    }
    matches
}
