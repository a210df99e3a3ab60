use std::fs::File;
use std::path::Path;

use log::warn;

use crate::csv;
use crate::error::LoadError;
use crate::grid::Grid;
use crate::xlsx::ExcelBook;

/// An input file: a workbook of named sheets, or a single delimited sheet.
pub enum SourceBook {
    Excel(ExcelBook),
    Delimited(Grid),
}

impl SourceBook {
    /// Open by extension: `.csv`/`.tsv` are delimited, everything else goes to calamine.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        check_readable(path)?;
        if csv::has_extension(path, "csv") || csv::has_extension(path, "tsv") {
            Ok(Self::Delimited(csv::import(path)?))
        } else {
            Ok(Self::Excel(ExcelBook::open(path)?))
        }
    }

    /// The sheet with exactly this name, if the source has one.
    ///
    /// A delimited file has a single sheet named after its file stem.
    pub fn sheet(&mut self, name: &str) -> Result<Option<Grid>, LoadError> {
        match self {
            Self::Excel(book) => {
                if book.has_sheet(name) {
                    book.read_sheet(name).map(Some)
                } else {
                    Ok(None)
                }
            }
            Self::Delimited(grid) => Ok((grid.name == name).then(|| grid.clone())),
        }
    }

    /// The named sheet, falling back to the first sheet when it is absent.
    ///
    /// Sheets named in `exclude` belong to other lists and never stand in for
    /// `name`. With nothing left to fall back to the load fails.
    pub fn sheet_or_first(&mut self, name: &str, exclude: &[&str]) -> Result<Grid, LoadError> {
        match self {
            Self::Excel(book) => {
                if book.has_sheet(name) {
                    return book.read_sheet(name);
                }
                let Some(first) = book
                    .sheet_names()
                    .iter()
                    .find(|s| !exclude.contains(&s.as_str()))
                    .cloned()
                else {
                    return Err(LoadError::MissingSheet {
                        path: book.path().to_path_buf(),
                        sheet: name.to_string(),
                    });
                };
                warn!("no sheet named '{name}', using first sheet '{first}'");
                book.read_sheet(&first)
            }
            Self::Delimited(grid) => Ok(grid.clone()),
        }
    }
}

/// Fail fast when a source is missing or locked, before any parsing starts.
pub fn check_readable(path: &Path) -> Result<(), LoadError> {
    if !path.exists() {
        return Err(LoadError::SourceNotFound { path: path.to_path_buf() });
    }
    File::open(path).map_err(|e| LoadError::from_io(path, e))?;
    Ok(())
}
