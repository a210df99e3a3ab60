// Report writer: xlsx workbook (suspects, tally, duplicates) or JSON

use std::path::Path;

use ballotcheck_recon::model::{BallotTally, Report, Suspect, Vote};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::csv::has_extension;
use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Json,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        if has_extension(path, "xlsx") {
            Ok(Self::Xlsx)
        } else if has_extension(path, "json") {
            Ok(Self::Json)
        } else {
            Err(LoadError::UnsupportedFormat { path: path.to_path_buf() })
        }
    }
}

pub const SUSPECTS_SHEET: &str = "suspects";
pub const TALLY_SHEET: &str = "tally";
pub const DUPLICATES_SHEET: &str = "duplicates";

/// Placeholder row written to an empty suspects sheet.
pub const NO_SUSPECTS: &str = "No suspects found";

/// Render the report workbook into memory.
pub fn render_xlsx(report: &Report) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = add_sheet(&mut workbook, SUSPECTS_SHEET)?;
    write_suspects(sheet, &report.results.suspects, &bold).map_err(|e| e.to_string())?;

    let sheet = add_sheet(&mut workbook, TALLY_SHEET)?;
    write_tally(sheet, &report.tally, &bold).map_err(|e| e.to_string())?;

    let sheet = add_sheet(&mut workbook, DUPLICATES_SHEET)?;
    write_duplicates(sheet, &report.results.duplicates, &bold).map_err(|e| e.to_string())?;

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Failed to build workbook: {}", e))
}

pub fn render_json(report: &Report) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|e| e.to_string())
}

/// Write the report in the format named by the path's extension.
///
/// The output is rendered completely before the file is created, so a render
/// failure leaves nothing on disk.
pub fn write_report(report: &Report, path: &Path) -> Result<ReportFormat, LoadError> {
    let format = ReportFormat::from_path(path)?;
    let bytes = match format {
        ReportFormat::Xlsx => render_xlsx(report),
        ReportFormat::Json => render_json(report).map(String::into_bytes),
    }
    .map_err(|message| LoadError::Write { path: path.to_path_buf(), message })?;

    std::fs::write(path, bytes).map_err(|e| LoadError::from_write(path, e))?;
    Ok(format)
}

fn add_sheet<'a>(workbook: &'a mut Workbook, name: &str) -> Result<&'a mut Worksheet, String> {
    workbook
        .add_worksheet()
        .set_name(name)
        .map_err(|e| format!("Failed to create sheet '{}': {}", name, e))
}

fn write_header(sheet: &mut Worksheet, headers: &[&str], bold: &Format) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, bold)?;
    }
    Ok(())
}

fn write_suspects(sheet: &mut Worksheet, suspects: &[Suspect], bold: &Format) -> Result<(), XlsxError> {
    write_header(sheet, &["Voter", "Ballot", "Selection", "Reason"], bold)?;

    if suspects.is_empty() {
        sheet.write_string(1, 0, NO_SUSPECTS)?;
    }
    for (i, s) in suspects.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &s.voter)?;
        sheet.write_string(row, 1, &s.ballot)?;
        sheet.write_string(row, 2, &s.selection)?;
        sheet.write_string(row, 3, s.reason.to_string())?;
    }

    sheet.autofit();
    Ok(())
}

/// Per ballot: a title row, a spacer, one row per selection, then a blank row.
fn write_tally(sheet: &mut Worksheet, tally: &[BallotTally], bold: &Format) -> Result<(), XlsxError> {
    let mut row = 0u32;
    for ballot in tally {
        sheet.write_string_with_format(row, 0, "Ballot:", bold)?;
        sheet.write_string_with_format(row, 1, &ballot.ballot, bold)?;
        row += 2;

        for s in &ballot.selections {
            sheet.write_string(row, 0, &s.selection)?;
            sheet.write_string(row, 1, "Sub Total")?;
            sheet.write_number(row, 2, s.votes as f64)?;
            if let Some(n) = s.suspect_votes {
                sheet.write_string(row, 3, "Suspect votes")?;
                sheet.write_number(row, 4, n as f64)?;
            }
            row += 1;
        }
        row += 1;
    }

    sheet.autofit();
    Ok(())
}

fn write_duplicates(sheet: &mut Worksheet, duplicates: &[Vote], bold: &Format) -> Result<(), XlsxError> {
    write_header(sheet, &["Id", "Voter", "Email", "Ballot", "Selection"], bold)?;

    for (i, v) in duplicates.iter().enumerate() {
        let row = i as u32 + 1;
        if let Some(id) = v.id {
            sheet.write_number(row, 0, id as f64)?;
        }
        sheet.write_string(row, 1, &v.voter)?;
        if let Some(email) = &v.email {
            sheet.write_string(row, 2, email)?;
        }
        sheet.write_string(row, 3, &v.ballot)?;
        sheet.write_string(row, 4, &v.selection)?;
    }

    sheet.autofit();
    Ok(())
}
