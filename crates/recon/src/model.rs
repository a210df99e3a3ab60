use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single cast vote, from either the primary poll export or manual entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vote {
    /// Row id from the primary poll export. Manual votes have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub voter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub ballot: String,
    pub selection: String,
}

impl Vote {
    /// A manually entered vote (no id, no email).
    pub fn manual(voter: impl Into<String>, ballot: impl Into<String>, selection: impl Into<String>) -> Self {
        Self {
            id: None,
            voter: voter.into(),
            email: None,
            ballot: ballot.into(),
            selection: selection.into(),
        }
    }

    /// A vote from the primary poll export.
    pub fn primary(
        id: i64,
        voter: impl Into<String>,
        email: Option<String>,
        ballot: impl Into<String>,
        selection: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            voter: voter.into(),
            email,
            ballot: ballot.into(),
            selection: selection.into(),
        }
    }
}

/// Identity lists used to judge eligibility.
///
/// The four categories are not required to be disjoint. Members and aliases
/// together form the eligible set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Roster {
    pub members: Vec<String>,
    pub aliases: Vec<String>,
    pub out_of_district: Vec<String>,
    pub missed_deadline: Vec<String>,
}

/// Pre-loaded records for one run.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub roster: Roster,
    /// Manual votes, seeded into the merged list before primary votes.
    pub manual_votes: Vec<Vote>,
    /// Primary votes in source order.
    pub primary_votes: Vec<Vote>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SuspectReason {
    #[serde(rename = "Not a member")]
    NotAMember,
    #[serde(rename = "Lives outside district")]
    OutsideDistrict,
    #[serde(rename = "Missed registration deadline")]
    MissedDeadline,
}

impl std::fmt::Display for SuspectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAMember => write!(f, "Not a member"),
            Self::OutsideDistrict => write!(f, "Lives outside district"),
            Self::MissedDeadline => write!(f, "Missed registration deadline"),
        }
    }
}

/// A vote flagged for manual review, one record per triggered rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suspect {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub voter: String,
    pub ballot: String,
    pub selection: String,
    pub reason: SuspectReason,
}

impl Suspect {
    pub fn from_vote(vote: &Vote, reason: SuspectReason) -> Self {
        Self {
            id: vote.id,
            voter: vote.voter.clone(),
            ballot: vote.ballot.clone(),
            selection: vote.selection.clone(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Results {
    /// Merged votes, unique per (voter, ballot), sorted by voter.
    pub votes: Vec<Vote>,
    /// Primary votes rejected as repeats, sorted by voter.
    pub duplicates: Vec<Vote>,
    pub suspects: Vec<Suspect>,
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionTally {
    pub selection: String,
    pub votes: usize,
    /// Present only when at least one vote for this selection is suspect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspect_votes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BallotTally {
    pub ballot: String,
    pub selections: Vec<SelectionTally>,
}

impl BallotTally {
    pub fn total_votes(&self) -> usize {
        self.selections.iter().map(|s| s.votes).sum()
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecksRun {
    pub membership: bool,
    pub district: bool,
    pub deadline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub votes: usize,
    pub manual_votes: usize,
    pub duplicates: usize,
    pub ballots: usize,
    pub suspect_records: usize,
    /// Distinct (voter, ballot, selection) among suspect records.
    pub suspect_votes: usize,
    pub reason_counts: BTreeMap<String, usize>,
    pub checks: ChecksRun,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub suspect_count: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub results: Results,
    pub tally: Vec<BallotTally>,
}
