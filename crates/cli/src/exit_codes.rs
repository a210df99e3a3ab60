//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success (suspects found is still success) |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, output type)  |
//! | 60-69   | check            | Config, source and output failures       |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Map it in `load_exit_code` if it comes from a `LoadError`

use ballotcheck_io::LoadError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unsupported output extension.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Check (60-69)
// =============================================================================

/// Config file failed to parse or validate.
pub const EXIT_CHECK_CONFIG: u8 = 60;

/// An input file (or the config file) does not exist.
pub const EXIT_CHECK_NOT_FOUND: u8 = 61;

/// A file is locked by another process (typically open in Excel).
pub const EXIT_CHECK_BUSY: u8 = 62;

/// A data row is present but missing a required field.
pub const EXIT_CHECK_MALFORMED: u8 = 63;

/// Any other failure reading a source.
pub const EXIT_CHECK_READ: u8 = 64;

/// Rendering or writing the report failed.
pub const EXIT_CHECK_WRITE: u8 = 65;

/// Map a LoadError to its exit code.
pub fn load_exit_code(err: &LoadError) -> u8 {
    match err {
        LoadError::SourceNotFound { .. } => EXIT_CHECK_NOT_FOUND,
        LoadError::Busy { .. } => EXIT_CHECK_BUSY,
        LoadError::MalformedRecord { .. } => EXIT_CHECK_MALFORMED,
        LoadError::Open { .. } | LoadError::NoSheets { .. } | LoadError::MissingSheet { .. } => {
            EXIT_CHECK_READ
        }
        LoadError::UnsupportedFormat { .. } => EXIT_USAGE,
        LoadError::Write { .. } => EXIT_CHECK_WRITE,
    }
}
