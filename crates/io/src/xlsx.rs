// Excel sources (xlsx, xlsm, xls, xlsb, ods) via calamine

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};

use crate::error::LoadError;
use crate::grid::Grid;

/// An open spreadsheet workbook. The file handle is released on drop.
pub struct ExcelBook {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
    sheet_names: Vec<String>,
}

impl ExcelBook {
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| LoadError::Open {
            path: path.to_path_buf(),
            message: format!("failed to open Excel file: {e}"),
        })?;
        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Err(LoadError::NoSheets { path: path.to_path_buf() });
        }
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
            sheet_names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names.iter().any(|s| s == name)
    }

    /// Read one worksheet into a grid.
    pub fn read_sheet(&mut self, name: &str) -> Result<Grid, LoadError> {
        let range = self.workbook.worksheet_range(name).map_err(|e| LoadError::Open {
            path: self.path.clone(),
            message: format!("failed to read sheet '{name}': {e}"),
        })?;
        Ok(range_to_grid(name, &range))
    }
}

/// Lay the range out at absolute positions (data may not begin at A1).
fn range_to_grid(name: &str, range: &Range<Data>) -> Grid {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_text));
        rows.push(cells);
    }

    Grid::new(name, rows)
}

/// Text of a cell as a reader would see it in the sheet.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Format nicely: integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        // Serial number; only ids and names are read from these sheets.
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
