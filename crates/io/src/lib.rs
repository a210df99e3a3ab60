//! `ballotcheck-io`: loaders for roster and ballot workbooks, and the report writer.
//!
//! Sources are Excel workbooks (read with calamine) or CSV/TSV files. Every
//! loader returns plain `ballotcheck-recon` model types; failures are
//! `LoadError`s that name the offending file, sheet, row or column.

pub mod ballots;
pub mod csv;
pub mod error;
pub mod grid;
pub mod report;
pub mod roster;
pub mod source;
pub mod xlsx;

pub use error::LoadError;
