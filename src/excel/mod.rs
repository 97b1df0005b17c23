//! Spreadsheet I/O
//!
//! - Read: .xlsx / .xls / .ods → `Workbook` (all sheets, raw cells)
//! - Export: search results → .xlsx

mod exporter;
mod reader;

pub use exporter::ResultExporter;
pub use reader::{supported_extension, WorkbookReader, SUPPORTED_EXTENSIONS};
