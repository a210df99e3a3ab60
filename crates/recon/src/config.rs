use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration, usually read from a `ballotcheck.toml`.
///
/// Every section is optional; an empty document yields the defaults, which
/// match the layout of the poll export and roster workbooks used so far.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    #[serde(default)]
    pub checks: ChecksConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
    #[serde(default)]
    pub tally: TallyConfig,
    #[serde(default)]
    pub sheets: SheetNames,
    #[serde(default)]
    pub layout: LayoutConfig,
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecksConfig {
    #[serde(default = "default_true")]
    pub membership: bool,
    #[serde(default = "default_true")]
    pub district: bool,
    #[serde(default = "default_true")]
    pub deadline: bool,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            membership: true,
            district: true,
            deadline: true,
        }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Dedup + Tally
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DedupConfig {
    /// Compare (voter, ballot) case-insensitively when detecting repeats.
    /// Off by default: repeat detection is a literal comparison.
    #[serde(default)]
    pub ignore_case: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TallyConfig {
    #[serde(default)]
    pub suspect_count: SuspectCount,
}

/// How suspect votes are counted per (ballot, selection) in the tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspectCount {
    /// A vote flagged by several rules counts once.
    #[default]
    DistinctVotes,
    /// Every suspect record counts, so a vote flagged twice counts twice.
    Records,
}

impl std::fmt::Display for SuspectCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DistinctVotes => write!(f, "distinct_votes"),
            Self::Records => write!(f, "records"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sheets + Layout
// ---------------------------------------------------------------------------

/// Worksheet names looked up in the roster and poll workbooks.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetNames {
    #[serde(default = "default_members_sheet")]
    pub members: String,
    #[serde(default = "default_aliases_sheet")]
    pub aliases: String,
    #[serde(default = "default_outsiders_sheet")]
    pub outsiders: String,
    #[serde(default = "default_late_sheet")]
    pub late: String,
    #[serde(default = "default_manual_sheet")]
    pub manual: String,
    #[serde(default = "default_primary_sheet")]
    pub primary: String,
}

fn default_members_sheet() -> String {
    "members".into()
}
fn default_aliases_sheet() -> String {
    "aliases".into()
}
fn default_outsiders_sheet() -> String {
    "outsiders".into()
}
fn default_late_sheet() -> String {
    "late".into()
}
fn default_manual_sheet() -> String {
    "manual".into()
}
fn default_primary_sheet() -> String {
    "zoom".into()
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            members: default_members_sheet(),
            aliases: default_aliases_sheet(),
            outsiders: default_outsiders_sheet(),
            late: default_late_sheet(),
            manual: default_manual_sheet(),
            primary: default_primary_sheet(),
        }
    }
}

/// Row offsets (1-based, as shown in a spreadsheet) and column letters.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    #[serde(default = "default_manual_header_row")]
    pub manual_header_row: usize,
    #[serde(default = "default_manual_first_row")]
    pub manual_first_row: usize,
    #[serde(default = "default_primary_first_row")]
    pub primary_first_row: usize,
    #[serde(default = "default_id_column")]
    pub primary_id_column: String,
    #[serde(default = "default_voter_column")]
    pub primary_voter_column: String,
    #[serde(default = "default_email_column")]
    pub primary_email_column: String,
    #[serde(default = "default_ballot_column")]
    pub primary_ballot_column: String,
    #[serde(default = "default_selection_column")]
    pub primary_selection_column: String,
}

fn default_manual_header_row() -> usize {
    1
}
fn default_manual_first_row() -> usize {
    3
}
fn default_primary_first_row() -> usize {
    7
}
fn default_id_column() -> String {
    "A".into()
}
fn default_voter_column() -> String {
    "B".into()
}
fn default_email_column() -> String {
    "C".into()
}
fn default_ballot_column() -> String {
    "E".into()
}
fn default_selection_column() -> String {
    "F".into()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            manual_header_row: default_manual_header_row(),
            manual_first_row: default_manual_first_row(),
            primary_first_row: default_primary_first_row(),
            primary_id_column: default_id_column(),
            primary_voter_column: default_voter_column(),
            primary_email_column: default_email_column(),
            primary_ballot_column: default_ballot_column(),
            primary_selection_column: default_selection_column(),
        }
    }
}

/// Zero-based column indexes of the primary poll export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryColumns {
    pub id: usize,
    pub voter: usize,
    pub email: usize,
    pub ballot: usize,
    pub selection: usize,
}

impl LayoutConfig {
    /// Resolve the primary column letters. Call after `validate`.
    pub fn primary_columns(&self) -> Result<PrimaryColumns, ReconError> {
        let col = |field: &str, letters: &str| {
            column_index(letters).ok_or_else(|| {
                ReconError::ConfigValidation(format!("layout.{field}: invalid column '{letters}'"))
            })
        };
        Ok(PrimaryColumns {
            id: col("primary_id_column", &self.primary_id_column)?,
            voter: col("primary_voter_column", &self.primary_voter_column)?,
            email: col("primary_email_column", &self.primary_email_column)?,
            ballot: col("primary_ballot_column", &self.primary_ballot_column)?,
            selection: col("primary_selection_column", &self.primary_selection_column)?,
        })
    }
}

/// Convert a column letter to a zero-based index (A -> 0, Z -> 25, AA -> 26).
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut n = 0usize;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        n = n * 26 + (ch.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    Some(n - 1)
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CheckConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CheckConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let layout = &self.layout;

        for (name, row) in [
            ("manual_header_row", layout.manual_header_row),
            ("manual_first_row", layout.manual_first_row),
            ("primary_first_row", layout.primary_first_row),
        ] {
            if row == 0 {
                return Err(ReconError::ConfigValidation(format!(
                    "layout.{name}: rows are 1-based, got 0"
                )));
            }
        }

        if layout.manual_first_row <= layout.manual_header_row {
            return Err(ReconError::ConfigValidation(format!(
                "layout.manual_first_row ({}) must be below manual_header_row ({})",
                layout.manual_first_row, layout.manual_header_row
            )));
        }

        let cols = layout.primary_columns()?;
        let mut seen = [cols.id, cols.voter, cols.email, cols.ballot, cols.selection];
        seen.sort_unstable();
        if seen.windows(2).any(|w| w[0] == w[1]) {
            return Err(ReconError::ConfigValidation(
                "layout: primary columns must be distinct".into(),
            ));
        }

        let sheets = &self.sheets;
        for (name, value) in [
            ("members", &sheets.members),
            ("aliases", &sheets.aliases),
            ("outsiders", &sheets.outsiders),
            ("late", &sheets.late),
            ("manual", &sheets.manual),
            ("primary", &sheets.primary),
        ] {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "sheets.{name}: sheet name cannot be empty"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
