use std::collections::BTreeMap;

use crate::config::ChecksConfig;
use crate::model::{BallotTally, ChecksRun, ReconSummary, Results};
use crate::tally::distinct_suspect_votes;

/// Compute summary statistics from a finished run.
pub fn compute_summary(
    results: &Results,
    tally: &[BallotTally],
    manual_votes: usize,
    checks: &ChecksConfig,
) -> ReconSummary {
    let mut reason_counts: BTreeMap<String, usize> = BTreeMap::new();
    for s in &results.suspects {
        *reason_counts.entry(s.reason.to_string()).or_insert(0) += 1;
    }

    ReconSummary {
        votes: results.votes.len(),
        manual_votes,
        duplicates: results.duplicates.len(),
        ballots: tally.len(),
        suspect_records: results.suspects.len(),
        suspect_votes: distinct_suspect_votes(&results.suspects),
        reason_counts,
        checks: ChecksRun {
            membership: checks.membership,
            district: checks.district,
            deadline: checks.deadline,
        },
    }
}
