// In-memory sheet values, as rows of cell text

/// Cell text of one worksheet, addressed by absolute zero-based position.
///
/// Blank cells are stored as empty strings and read back as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    pub name: String,
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self { name: name.into(), rows }
    }

    /// Cell text at (row, col), or `None` when blank or outside the data.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Convert a zero-based column index to its letter (0 -> A, 26 -> AA).
pub fn col_to_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}
