//! Shared fixtures: small estimate workbooks written with rust_xlsxwriter

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// A fixture cell
pub enum Fx {
    T(&'static str),
    N(f64),
    Blank,
}

pub type FxSheet = (&'static str, Vec<Vec<Fx>>);

/// Write `sheets` to `dir/name` and return the path
pub fn write_workbook(dir: &Path, name: &str, sheets: Vec<FxSheet>) -> PathBuf {
    let path = dir.join(name);
    let mut workbook = Workbook::new();
    for (sheet_name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Fx::T(s) => {
                        worksheet.write_string(r as u32, c as u16, *s).unwrap();
                    }
                    Fx::N(n) => {
                        worksheet.write_number(r as u32, c as u16, *n).unwrap();
                    }
                    Fx::Blank => {}
                }
            }
        }
    }
    workbook.save(&path).unwrap();
    path
}

/// Scenario 1: one project sheet
pub fn projects_sheet() -> FxSheet {
    (
        "Projects",
        vec![
            vec![Fx::T("Project Name"), Fx::T("Square Footage"), Fx::T("Unit Cost")],
            vec![Fx::T("Lobby"), Fx::N(1200.0), Fx::N(50.0)],
        ],
    )
}

/// An item sheet with a clean header row
pub fn detail_sheet() -> FxSheet {
    (
        "Cost Detail",
        vec![
            vec![
                Fx::T("Item"),
                Fx::T("Unit"),
                Fx::T("Quantity"),
                Fx::T("Unit Cost"),
                Fx::T("Total Cost"),
            ],
            vec![
                Fx::T("Steel Pipe Fitting"),
                Fx::T("ea"),
                Fx::N(4.0),
                Fx::N(12.5),
                Fx::N(50.0),
            ],
            vec![
                Fx::T("Gypsum Drywall"),
                Fx::T("sf"),
                Fx::N(900.0),
                Fx::N(2.0),
                Fx::Blank,
            ],
            vec![
                Fx::T("Copper pipe, type L"),
                Fx::T("lf"),
                Fx::N(120.0),
                Fx::N(8.75),
                Fx::N(1050.0),
            ],
        ],
    )
}

/// Item sheet whose header sits under a title and a blank row
pub fn titled_detail_sheet() -> FxSheet {
    (
        "Detail (Phase 2)",
        vec![
            vec![Fx::Blank, Fx::T("Phase 2 estimate")],
            vec![],
            vec![Fx::T("Description"), Fx::T("Qty"), Fx::T("Cost Unit")],
            vec![Fx::T("Acoustic ceiling tile"), Fx::N(300.0), Fx::N(3.1)],
        ],
    )
}

/// Scenario 3: misspelled item header
pub fn misspelled_detail_sheet() -> FxSheet {
    (
        "Cost Detail",
        vec![
            vec![Fx::T("Itme"), Fx::T("Unit"), Fx::T("Quantity")],
            vec![Fx::T("Steel Pipe Fitting"), Fx::T("ea"), Fx::N(4.0)],
        ],
    )
}
