// Roster loader: member, alias, out-of-district and late-registration lists

use std::path::PathBuf;

use ballotcheck_recon::config::SheetNames;
use ballotcheck_recon::model::Roster;
use log::info;

use crate::error::LoadError;
use crate::grid::Grid;
use crate::source::SourceBook;

/// Read identities from column A, starting at row 1, sorted.
///
/// Stops at the first blank cell: anything below a gap is not read.
pub fn read_identity_column(grid: &Grid) -> Vec<String> {
    let mut names: Vec<String> = (0..grid.height())
        .map_while(|row| grid.cell(row, 0))
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

/// Where each roster category comes from. Categories without their own file
/// are looked up as sheets of the membership workbook.
#[derive(Debug, Clone)]
pub struct RosterSources {
    pub members: PathBuf,
    pub aliases: Option<PathBuf>,
    pub out_of_district: Option<PathBuf>,
    pub missed_deadline: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RosterLoad {
    pub roster: Roster,
    /// An out-of-district list was found (file or sheet).
    pub has_district: bool,
    /// A missed-deadline list was found (file or sheet).
    pub has_deadline: bool,
}

pub fn load_roster(sources: &RosterSources, sheets: &SheetNames) -> Result<RosterLoad, LoadError> {
    let mut book = SourceBook::open(&sources.members)?;
    let categories = [sheets.aliases.as_str(), sheets.outsiders.as_str(), sheets.late.as_str()];
    let members = read_identity_column(&book.sheet_or_first(&sheets.members, &categories)?);
    info!("{} members from {}", members.len(), sources.members.display());

    let aliases = optional_list(&mut book, sources.aliases.as_ref(), &sheets.aliases)?;
    let outsiders = optional_list(&mut book, sources.out_of_district.as_ref(), &sheets.outsiders)?;
    let late = optional_list(&mut book, sources.missed_deadline.as_ref(), &sheets.late)?;

    for (label, list) in [("aliases", &aliases), ("out-of-district", &outsiders), ("late registrants", &late)] {
        match list {
            Some(names) => info!("{} {label}", names.len()),
            None => info!("no {label} list found"),
        }
    }

    Ok(RosterLoad {
        has_district: outsiders.is_some(),
        has_deadline: late.is_some(),
        roster: Roster {
            members,
            aliases: aliases.unwrap_or_default(),
            out_of_district: outsiders.unwrap_or_default(),
            missed_deadline: late.unwrap_or_default(),
        },
    })
}

/// A dedicated file wins; otherwise look for the sheet in the membership workbook.
fn optional_list(
    membership: &mut SourceBook,
    file: Option<&PathBuf>,
    sheet: &str,
) -> Result<Option<Vec<String>>, LoadError> {
    match file {
        Some(path) => {
            let mut book = SourceBook::open(path)?;
            Ok(Some(read_identity_column(&book.sheet_or_first(sheet, &[])?)))
        }
        None => Ok(membership.sheet(sheet)?.map(|g| read_identity_column(&g))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::path::Path;
    use tempfile::tempdir;

    fn rows(cells: &[&str]) -> Grid {
        Grid::new("members", cells.iter().map(|c| vec![c.to_string()]).collect())
    }

    fn write_book(path: &Path, sheets: &[(&str, &[&str])]) {
        let mut wb = Workbook::new();
        for (name, names) in sheets {
            let ws = wb.add_worksheet();
            ws.set_name(*name).unwrap();
            for (i, n) in names.iter().enumerate() {
                ws.write_string(i as u32, 0, *n).unwrap();
            }
        }
        wb.save(path).unwrap();
    }

    #[test]
    fn identity_column_sorted() {
        assert_eq!(read_identity_column(&rows(&["Cy", "Ann", "Bob"])), vec!["Ann", "Bob", "Cy"]);
    }

    #[test]
    fn identity_column_stops_at_first_gap() {
        let names = read_identity_column(&rows(&["Ann", "Bob", "", "Cy"]));
        assert_eq!(names, vec!["Ann", "Bob"]);
    }

    #[test]
    fn identity_column_empty_sheet() {
        assert!(read_identity_column(&Grid::default()).is_empty());
        assert!(read_identity_column(&rows(&["", "Ann"])).is_empty());
    }

    #[test]
    fn identity_column_keeps_spacing() {
        assert_eq!(read_identity_column(&rows(&[" Ann "])), vec![" Ann "]);
    }

    #[test]
    fn all_categories_from_membership_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("membership.xlsx");
        write_book(
            &path,
            &[
                ("members", &["Bob", "Ann"]),
                ("aliases", &["Annie"]),
                ("outsiders", &["Cy"]),
                ("late", &["Dee"]),
            ],
        );

        let sources = RosterSources {
            members: path,
            aliases: None,
            out_of_district: None,
            missed_deadline: None,
        };
        let load = load_roster(&sources, &SheetNames::default()).unwrap();
        assert_eq!(load.roster.members, vec!["Ann", "Bob"]);
        assert_eq!(load.roster.aliases, vec!["Annie"]);
        assert_eq!(load.roster.out_of_district, vec!["Cy"]);
        assert_eq!(load.roster.missed_deadline, vec!["Dee"]);
        assert!(load.has_district);
        assert!(load.has_deadline);
    }

    #[test]
    fn missing_optional_lists_disable_checks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("membership.xlsx");
        write_book(&path, &[("members", &["Ann"])]);

        let sources = RosterSources {
            members: path,
            aliases: None,
            out_of_district: None,
            missed_deadline: None,
        };
        let load = load_roster(&sources, &SheetNames::default()).unwrap();
        assert!(load.roster.aliases.is_empty());
        assert!(!load.has_district);
        assert!(!load.has_deadline);
    }

    #[test]
    fn separate_files_win() {
        let dir = tempdir().unwrap();
        let members = dir.path().join("membership.xlsx");
        write_book(&members, &[("members", &["Ann"]), ("outsiders", &["Old Entry"])]);
        let outsiders = dir.path().join("outsiders.csv");
        std::fs::write(&outsiders, "Cy\nBo\n").unwrap();

        let sources = RosterSources {
            members,
            aliases: None,
            out_of_district: Some(outsiders),
            missed_deadline: None,
        };
        let load = load_roster(&sources, &SheetNames::default()).unwrap();
        assert_eq!(load.roster.out_of_district, vec!["Bo", "Cy"]);
        assert!(load.has_district);
    }

    #[test]
    fn members_fallback_skips_category_sheets() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("membership.xlsx");
        write_book(&path, &[("aliases", &["Annie"]), ("Roster", &["Ann", "Bob"])]);

        let sources = RosterSources {
            members: path,
            aliases: None,
            out_of_district: None,
            missed_deadline: None,
        };
        let load = load_roster(&sources, &SheetNames::default()).unwrap();
        assert_eq!(load.roster.members, vec!["Ann", "Bob"]);
        assert_eq!(load.roster.aliases, vec!["Annie"]);
    }

    #[test]
    fn only_category_sheets_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("membership.xlsx");
        write_book(&path, &[("aliases", &["Annie"]), ("outsiders", &["Cy"])]);

        let sources = RosterSources {
            members: path,
            aliases: None,
            out_of_district: None,
            missed_deadline: None,
        };
        match load_roster(&sources, &SheetNames::default()) {
            Err(LoadError::MissingSheet { sheet, .. }) => assert_eq!(sheet, "members"),
            other => panic!("expected MissingSheet, got {:?}", other.map(|l| l.roster.members)),
        }
    }

    #[test]
    fn missing_alias_file_is_an_error() {
        let dir = tempdir().unwrap();
        let members = dir.path().join("membership.xlsx");
        write_book(&members, &[("members", &["Ann"])]);

        let sources = RosterSources {
            members,
            aliases: Some(dir.path().join("aliases.xlsx")),
            out_of_district: None,
            missed_deadline: None,
        };
        let err = load_roster(&sources, &SheetNames::default()).unwrap_err();
        assert!(matches!(err, LoadError::SourceNotFound { .. }));
    }
}
