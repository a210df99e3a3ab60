// Ballot loader: manual-entry sheet and primary poll export

use std::path::PathBuf;

use ballotcheck_recon::config::{LayoutConfig, PrimaryColumns, SheetNames};
use ballotcheck_recon::model::Vote;
use log::info;

use crate::error::LoadError;
use crate::grid::{col_to_letter, Grid};
use crate::source::SourceBook;

/// Votes from the manual-entry sheet.
///
/// Ballot names sit in the header row from column B on; each voter row has the
/// voter in column A and one selection per ballot column. A row's scan ends at
/// the first empty selection or empty header, and the sheet ends at the first
/// empty voter.
pub fn read_manual_votes(grid: &Grid, layout: &LayoutConfig) -> Vec<Vote> {
    let header = layout.manual_header_row - 1;
    let mut votes = Vec::new();

    for row in (layout.manual_first_row - 1)..grid.height() {
        let Some(voter) = grid.cell(row, 0) else {
            break;
        };
        for col in 1.. {
            let (Some(ballot), Some(selection)) = (grid.cell(header, col), grid.cell(row, col)) else {
                break;
            };
            votes.push(Vote::manual(voter, ballot, selection));
        }
    }

    votes
}

/// Votes from the primary poll export, in sheet order.
///
/// The scan ends at the first row with an empty voter. A row that has a voter
/// but no usable id, ballot or selection is rejected.
pub fn read_primary_votes(
    grid: &Grid,
    first_row: usize,
    columns: &PrimaryColumns,
) -> Result<Vec<Vote>, LoadError> {
    let mut votes = Vec::new();

    for row in (first_row - 1)..grid.height() {
        let Some(voter) = grid.cell(row, columns.voter) else {
            break;
        };
        let malformed = |column: usize, problem: String| LoadError::MalformedRecord {
            sheet: grid.name.clone(),
            row: row + 1,
            column: col_to_letter(column),
            problem,
        };

        let id = match grid.cell(row, columns.id) {
            None => return Err(malformed(columns.id, "missing id".into())),
            Some(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| malformed(columns.id, format!("id '{text}' is not an integer")))?,
        };
        let ballot = grid
            .cell(row, columns.ballot)
            .ok_or_else(|| malformed(columns.ballot, "missing ballot".into()))?;
        let selection = grid
            .cell(row, columns.selection)
            .ok_or_else(|| malformed(columns.selection, "missing selection".into()))?;
        let email = grid.cell(row, columns.email).map(str::to_string);

        votes.push(Vote::primary(id, voter, email, ballot, selection));
    }

    Ok(votes)
}

#[derive(Debug, Clone)]
pub struct BallotSources {
    /// Poll results workbook; its `manual` sheet is used when no manual file is given.
    pub poll: PathBuf,
    pub manual: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct BallotLoad {
    pub manual: Vec<Vote>,
    pub primary: Vec<Vote>,
}

pub fn load_ballots(
    sources: &BallotSources,
    sheets: &SheetNames,
    layout: &LayoutConfig,
    columns: &PrimaryColumns,
) -> Result<BallotLoad, LoadError> {
    let mut poll = SourceBook::open(&sources.poll)?;
    let primary_grid = poll.sheet_or_first(&sheets.primary, &[sheets.manual.as_str()])?;
    let primary = read_primary_votes(&primary_grid, layout.primary_first_row, columns)?;
    info!("{} primary votes from {}", primary.len(), sources.poll.display());

    let manual_grid = match &sources.manual {
        Some(path) => Some(SourceBook::open(path)?.sheet_or_first(&sheets.manual, &[])?),
        None => poll.sheet(&sheets.manual)?,
    };
    let manual = match manual_grid {
        Some(grid) => read_manual_votes(&grid, layout),
        None => {
            info!("no manual votes sheet found");
            Vec::new()
        }
    };
    info!("{} manual votes", manual.len());

    Ok(BallotLoad { manual, primary })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(name: &str, rows: &[&[&str]]) -> Grid {
        Grid::new(
            name,
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn columns() -> PrimaryColumns {
        LayoutConfig::default().primary_columns().unwrap()
    }

    /// Six banner rows, then data from row 7.
    fn zoom(data: &[&[&str]]) -> Grid {
        let mut rows: Vec<&[&str]> = Vec::new();
        rows.push(&["Poll report"]);
        for _ in 0..4 {
            rows.push(&[]);
        }
        rows.push(&["#", "Name", "Email", "", "Question", "Answer"]);
        rows.extend_from_slice(data);
        grid("zoom", &rows)
    }

    #[test]
    fn manual_votes_by_header() {
        let g = grid(
            "manual",
            &[
                &["", "Chair", "Budget"],
                &["entered by clerk"],
                &["Ann", "Kim", "Yes"],
                &["Bob", "Lee"],
            ],
        );
        let votes = read_manual_votes(&g, &LayoutConfig::default());
        assert_eq!(
            votes,
            vec![
                Vote::manual("Ann", "Chair", "Kim"),
                Vote::manual("Ann", "Budget", "Yes"),
                Vote::manual("Bob", "Chair", "Lee"),
            ]
        );
    }

    #[test]
    fn manual_row_scan_stops_at_gap() {
        let g = grid(
            "manual",
            &[&["", "Chair", "Budget", "Dues"], &[], &["Ann", "Kim", "", "Up"]],
        );
        let votes = read_manual_votes(&g, &LayoutConfig::default());
        assert_eq!(votes, vec![Vote::manual("Ann", "Chair", "Kim")]);
    }

    #[test]
    fn manual_selection_without_header_ignored() {
        let g = grid("manual", &[&["", "Chair"], &[], &["Ann", "Kim", "Extra"]]);
        let votes = read_manual_votes(&g, &LayoutConfig::default());
        assert_eq!(votes, vec![Vote::manual("Ann", "Chair", "Kim")]);
    }

    #[test]
    fn manual_sheet_stops_at_empty_voter() {
        let g = grid(
            "manual",
            &[&["", "Chair"], &[], &["Ann", "Kim"], &[], &["Bob", "Lee"]],
        );
        assert_eq!(read_manual_votes(&g, &LayoutConfig::default()).len(), 1);
    }

    #[test]
    fn primary_votes_read_from_row_seven() {
        let g = zoom(&[
            &["1", "Ann", "ann@x.org", "", "Chair", "Kim"],
            &["2", "Bob", "", "", "Chair", "Lee"],
        ]);
        let votes = read_primary_votes(&g, 7, &columns()).unwrap();
        assert_eq!(
            votes,
            vec![
                Vote::primary(1, "Ann", Some("ann@x.org".into()), "Chair", "Kim"),
                Vote::primary(2, "Bob", None, "Chair", "Lee"),
            ]
        );
    }

    #[test]
    fn primary_stops_at_first_empty_voter() {
        let g = zoom(&[
            &["1", "Ann", "", "", "Chair", "Kim"],
            &["2", "", "", "", "Chair", "Lee"],
            &["3", "Cy", "", "", "Chair", "Kim"],
        ]);
        assert_eq!(read_primary_votes(&g, 7, &columns()).unwrap().len(), 1);
    }

    #[test]
    fn primary_missing_selection_is_malformed() {
        let g = zoom(&[
            &["1", "Ann", "", "", "Chair", "Kim"],
            &["2", "Bob", "", "", "Chair"],
        ]);
        match read_primary_votes(&g, 7, &columns()) {
            Err(LoadError::MalformedRecord { sheet, row, column, problem }) => {
                assert_eq!(sheet, "zoom");
                assert_eq!(row, 8);
                assert_eq!(column, "F");
                assert_eq!(problem, "missing selection");
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn malformed_row_mid_sheet_fails_whole_load() {
        let g = zoom(&[
            &["1", "Ann", "", "", "Chair", "Kim"],
            &["2", "Bob", "", "", "", "Lee"],
            &["3", "Cy", "", "", "Chair", "Kim"],
            &["4", "Dee", "", "", "Chair", "Lee"],
        ]);
        match read_primary_votes(&g, 7, &columns()) {
            Err(LoadError::MalformedRecord { row, column, .. }) => {
                assert_eq!(row, 8);
                assert_eq!(column, "E");
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn primary_bad_id_is_malformed() {
        let g = zoom(&[&["n/a", "Ann", "", "", "Chair", "Kim"]]);
        match read_primary_votes(&g, 7, &columns()) {
            Err(LoadError::MalformedRecord { row, column, problem, .. }) => {
                assert_eq!(row, 7);
                assert_eq!(column, "A");
                assert_eq!(problem, "id 'n/a' is not an integer");
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn primary_missing_ballot_is_malformed() {
        let g = zoom(&[&["4", "Ann", "", "", "", "Kim"]]);
        let err = read_primary_votes(&g, 7, &columns()).unwrap_err();
        assert_eq!(err.to_string(), "sheet 'zoom', row 7, column E: missing ballot");
    }

    #[test]
    fn custom_layout() {
        let layout = LayoutConfig {
            primary_first_row: 2,
            primary_id_column: "D".into(),
            primary_voter_column: "A".into(),
            primary_email_column: "E".into(),
            primary_ballot_column: "B".into(),
            primary_selection_column: "C".into(),
            ..LayoutConfig::default()
        };
        let g = grid("votes", &[&["Voter", "Ballot", "Choice", "Id"], &["Ann", "Chair", "Kim", "9"]]);
        let votes = read_primary_votes(&g, layout.primary_first_row, &layout.primary_columns().unwrap()).unwrap();
        assert_eq!(votes, vec![Vote::primary(9, "Ann", None, "Chair", "Kim")]);
    }

    #[test]
    fn primary_fallback_skips_manual_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poll.xlsx");
        let mut wb = rust_xlsxwriter::Workbook::new();
        let ws = wb.add_worksheet();
        ws.set_name("manual").unwrap();
        ws.write_string(0, 1, "Chair").unwrap();
        ws.write_string(2, 0, "Ann").unwrap();
        ws.write_string(2, 1, "Kim").unwrap();
        let ws = wb.add_worksheet();
        ws.set_name("Results").unwrap();
        ws.write_number(6, 0, 1.0).unwrap();
        ws.write_string(6, 1, "Bob").unwrap();
        ws.write_string(6, 4, "Chair").unwrap();
        ws.write_string(6, 5, "Lee").unwrap();
        wb.save(&path).unwrap();

        let layout = LayoutConfig::default();
        let load = load_ballots(
            &BallotSources { poll: path, manual: None },
            &SheetNames::default(),
            &layout,
            &columns(),
        )
        .unwrap();
        assert_eq!(load.primary, vec![Vote::primary(1, "Bob", None, "Chair", "Lee")]);
        assert_eq!(load.manual, vec![Vote::manual("Ann", "Chair", "Kim")]);
    }
}
