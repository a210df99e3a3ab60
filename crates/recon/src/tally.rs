use std::collections::{HashMap, HashSet};

use crate::config::SuspectCount;
use crate::model::{BallotTally, SelectionTally, Suspect, Vote};

/// Count votes per ballot and selection, annotated with suspect counts.
///
/// Ballots appear in order of first appearance in `votes`, and selections in
/// order of first appearance within their ballot. `suspect_votes` is set only
/// when nonzero.
pub fn compute_tally(votes: &[Vote], suspects: &[Suspect], policy: SuspectCount) -> Vec<BallotTally> {
    let suspect_counts = count_suspects(suspects, policy);

    let mut ballots: Vec<BallotTally> = Vec::new();
    let mut ballot_idx: HashMap<&str, usize> = HashMap::new();
    let mut selection_idx: HashMap<(&str, &str), usize> = HashMap::new();

    for vote in votes {
        let bi = *ballot_idx.entry(vote.ballot.as_str()).or_insert_with(|| {
            ballots.push(BallotTally {
                ballot: vote.ballot.clone(),
                selections: Vec::new(),
            });
            ballots.len() - 1
        });
        let selections = &mut ballots[bi].selections;
        let si = *selection_idx
            .entry((vote.ballot.as_str(), vote.selection.as_str()))
            .or_insert_with(|| {
                selections.push(SelectionTally {
                    selection: vote.selection.clone(),
                    votes: 0,
                    suspect_votes: None,
                });
                selections.len() - 1
            });
        selections[si].votes += 1;
    }

    for ballot in &mut ballots {
        for sel in &mut ballot.selections {
            let n = suspect_counts
                .get(&(ballot.ballot.as_str(), sel.selection.as_str()))
                .copied()
                .unwrap_or(0);
            if n > 0 {
                sel.suspect_votes = Some(n);
            }
        }
    }

    ballots
}

/// Suspect count per (ballot, selection) under the given policy.
fn count_suspects(suspects: &[Suspect], policy: SuspectCount) -> HashMap<(&str, &str), usize> {
    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    let mut seen: HashSet<(&str, &str, &str)> = HashSet::new();

    for s in suspects {
        if policy == SuspectCount::DistinctVotes
            && !seen.insert((s.voter.as_str(), s.ballot.as_str(), s.selection.as_str()))
        {
            continue;
        }
        *counts.entry((s.ballot.as_str(), s.selection.as_str())).or_insert(0) += 1;
    }

    counts
}

/// Number of distinct (voter, ballot, selection) among suspect records.
pub fn distinct_suspect_votes(suspects: &[Suspect]) -> usize {
    suspects
        .iter()
        .map(|s| (s.voter.as_str(), s.ballot.as_str(), s.selection.as_str()))
        .collect::<HashSet<_>>()
        .len()
}
