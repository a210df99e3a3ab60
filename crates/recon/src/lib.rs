//! `ballotcheck-recon`: Roster vs. ballot reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded roster and vote records, returns
//! deduplicated votes, suspect records and a tally. No CLI or IO dependencies.

pub mod classify;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod identity;
pub mod model;
pub mod tally;

pub use config::CheckConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{ReconInput, Report, Results, Roster, Suspect, SuspectReason, Vote};
