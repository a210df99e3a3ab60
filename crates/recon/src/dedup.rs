use std::collections::HashSet;

use log::debug;

use crate::identity::fold;
use crate::model::Vote;

/// Merged votes plus the primary votes rejected as repeats.
#[derive(Debug, Clone, Default)]
pub struct MergeOutput {
    pub votes: Vec<Vote>,
    pub duplicates: Vec<Vote>,
}

/// Merge primary votes into the manual votes, one vote per (voter, ballot).
///
/// Manual votes are taken first, then primary votes in source order. The first
/// vote for a (voter, ballot) pair wins and every later one goes to
/// `duplicates`, whatever its selection or source. Keys compare literally
/// unless `ignore_case` is set. Both lists come back stably sorted by voter.
pub fn merge_votes(manual: Vec<Vote>, primary: Vec<Vote>, ignore_case: bool) -> MergeOutput {
    let key = |v: &Vote| -> (String, String) {
        if ignore_case {
            (fold(&v.voter), fold(&v.ballot))
        } else {
            (v.voter.clone(), v.ballot.clone())
        }
    };

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut votes = Vec::with_capacity(manual.len() + primary.len());
    let mut duplicates = Vec::new();

    for vote in manual.into_iter().chain(primary) {
        if seen.insert(key(&vote)) {
            votes.push(vote);
        } else {
            debug!(
                "duplicate ballot: voter '{}', ballot '{}', selection '{}'",
                vote.voter, vote.ballot, vote.selection
            );
            duplicates.push(vote);
        }
    }

    votes.sort_by(|a, b| a.voter.cmp(&b.voter));
    duplicates.sort_by(|a, b| a.voter.cmp(&b.voter));

    MergeOutput { votes, duplicates }
}
