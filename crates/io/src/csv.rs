// CSV/TSV sources

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::LoadError;
use crate::grid::Grid;

/// Read a delimited file into a single grid named after the file stem.
pub fn import(path: &Path) -> Result<Grid, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = if has_extension(path, "tsv") {
        b'\t'
    } else {
        sniff_delimiter(&content).unwrap_or(WHOLE_LINE)
    };
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    import_from_string(&name, &content, delimiter)
        .map_err(|message| LoadError::Open { path: path.to_path_buf(), message })
}

pub(crate) fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Delimiter for files with no field separator: the ASCII unit separator, so
/// each line is one field and commas inside a name survive.
const WHOLE_LINE: u8 = 0x1f;

/// Lines sampled when guessing the delimiter. Poll exports open with a banner
/// of short key/value lines, so the sample reaches past it.
const SNIFF_LINES: usize = 20;

/// Guess the field delimiter from the most common field count per candidate.
///
/// A candidate scores `frequency * fields` for its most common field count
/// over the non-blank sample lines; counts of one field never score. `None`
/// means no candidate splits most lines, as with a one-name-per-line roster
/// where a stray comma belongs to the name.
fn sniff_delimiter(content: &str) -> Option<u8> {
    let sample: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    let mut best: Option<(u8, usize)> = None;
    for delim in [b'\t', b';', b',', b'|'] {
        let mut freq: HashMap<usize, usize> = HashMap::new();
        for line in &sample {
            *freq.entry(field_count(line, delim)).or_default() += 1;
        }
        let Some((fields, count)) = freq.into_iter().max_by_key(|&(f, c)| (c, f)) else {
            continue;
        };
        if fields <= 1 {
            continue;
        }
        let score = count * fields;
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((delim, score));
        }
    }

    best.map(|(delim, _)| delim)
}

fn field_count(line: &str, delim: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map_or(1, |r| r.len())
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let mut file = std::fs::File::open(path).map_err(|e| LoadError::from_io(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| LoadError::from_io(path, e))?;

    match String::from_utf8(bytes) {
        Ok(s) => {
            if let Some(rest) = s.strip_prefix('\u{feff}') {
                return Ok(rest.to_string());
            }
            Ok(s)
        }
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn import_from_string(name: &str, content: &str, delimiter: u8) -> Result<Grid, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Grid::new(name, rows))
}
