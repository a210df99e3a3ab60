use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum LoadError {
    /// A referenced input file does not exist.
    SourceNotFound { path: PathBuf },
    /// The file is locked by another process.
    Busy { path: PathBuf },
    /// The file exists but could not be opened or parsed.
    Open { path: PathBuf, message: String },
    /// The workbook has no worksheets.
    NoSheets { path: PathBuf },
    /// The named sheet is absent and no other sheet may stand in for it.
    MissingSheet { path: PathBuf, sheet: String },
    /// A data row is present but structurally incomplete.
    MalformedRecord {
        sheet: String,
        row: usize,
        column: String,
        problem: String,
    },
    /// Output extension is not one we can write.
    UnsupportedFormat { path: PathBuf },
    /// Rendering or writing the output failed.
    Write { path: PathBuf, message: String },
}

impl LoadError {
    /// Classify an OS error raised while touching `path`.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::SourceNotFound { path: path.to_path_buf() }
        } else if is_busy(&err) {
            Self::Busy { path: path.to_path_buf() }
        } else {
            Self::Open { path: path.to_path_buf(), message: err.to_string() }
        }
    }

    /// Classify an OS error raised while writing output to `path`.
    pub fn from_write(path: &Path, err: std::io::Error) -> Self {
        if is_busy(&err) {
            Self::Busy { path: path.to_path_buf() }
        } else {
            Self::Write { path: path.to_path_buf(), message: err.to_string() }
        }
    }
}

/// Sharing/lock violations (Windows) and EBUSY/ETXTBSY (Unix).
fn is_busy(err: &std::io::Error) -> bool {
    if err.kind() == std::io::ErrorKind::WouldBlock {
        return true;
    }
    #[cfg(windows)]
    {
        matches!(err.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        matches!(err.raw_os_error(), Some(16) | Some(26))
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotFound { path } => write!(f, "file not found: {}", path.display()),
            Self::Busy { path } => {
                write!(f, "{} is in use by another process; close it and try again", path.display())
            }
            Self::Open { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::NoSheets { path } => write!(f, "{} contains no worksheets", path.display()),
            Self::MissingSheet { path, sheet } => {
                write!(f, "{} has no sheet '{sheet}'", path.display())
            }
            Self::MalformedRecord { sheet, row, column, problem } => {
                write!(f, "sheet '{sheet}', row {row}, column {column}: {problem}")
            }
            Self::UnsupportedFormat { path } => write!(
                f,
                "cannot write {}: output must end in .xlsx or .json",
                path.display()
            ),
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
        }
    }
}

impl std::error::Error for LoadError {}
