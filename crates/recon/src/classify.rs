use log::debug;

use crate::config::ChecksConfig;
use crate::identity::IdentitySet;
use crate::model::{Roster, Suspect, SuspectReason, Vote};

/// Flag votes whose voter is not in members ∪ aliases.
pub fn check_membership(votes: &[Vote], roster: &Roster, suspects: &mut Vec<Suspect>) {
    let eligible = IdentitySet::new(roster.members.iter().chain(roster.aliases.iter()));
    flag(votes, suspects, SuspectReason::NotAMember, |voter| !eligible.contains(voter));
}

/// Flag votes whose voter is listed as living outside the district.
pub fn check_district(votes: &[Vote], roster: &Roster, suspects: &mut Vec<Suspect>) {
    let outsiders = IdentitySet::new(&roster.out_of_district);
    flag(votes, suspects, SuspectReason::OutsideDistrict, |voter| outsiders.contains(voter));
}

/// Flag votes whose voter registered after the deadline.
pub fn check_deadline(votes: &[Vote], roster: &Roster, suspects: &mut Vec<Suspect>) {
    let late = IdentitySet::new(&roster.missed_deadline);
    flag(votes, suspects, SuspectReason::MissedDeadline, |voter| late.contains(voter));
}

/// Run every enabled rule, membership then district then deadline.
///
/// Rules are independent full passes; a vote hit by two rules yields two
/// records. Inputs are only read, so repeated calls give the same list.
pub fn classify(votes: &[Vote], roster: &Roster, checks: &ChecksConfig) -> Vec<Suspect> {
    let mut suspects = Vec::new();
    if checks.membership {
        check_membership(votes, roster, &mut suspects);
    }
    if checks.district {
        check_district(votes, roster, &mut suspects);
    }
    if checks.deadline {
        check_deadline(votes, roster, &mut suspects);
    }
    suspects
}

fn flag(
    votes: &[Vote],
    suspects: &mut Vec<Suspect>,
    reason: SuspectReason,
    hit: impl Fn(&str) -> bool,
) {
    for vote in votes {
        if hit(&vote.voter) {
            debug!("suspect: '{}' on '{}': {reason}", vote.voter, vote.ballot);
            suspects.push(Suspect::from_vote(vote, reason));
        }
    }
}
