use log::info;

use crate::classify::classify;
use crate::config::CheckConfig;
use crate::dedup::merge_votes;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::model::{ReconInput, ReconMeta, Report, Results, Vote};
use crate::tally::compute_tally;

/// Run the pipeline per config: dedupe, classify, tally, summarize.
pub fn run(config: &CheckConfig, input: &ReconInput) -> Result<Report, ReconError> {
    check_votes(&input.manual_votes)?;
    check_votes(&input.primary_votes)?;

    let merged = merge_votes(
        input.manual_votes.clone(),
        input.primary_votes.clone(),
        config.dedup.ignore_case,
    );
    info!(
        "merged {} manual + {} primary votes: {} kept, {} duplicates",
        input.manual_votes.len(),
        input.primary_votes.len(),
        merged.votes.len(),
        merged.duplicates.len()
    );

    let suspects = classify(&merged.votes, &input.roster, &config.checks);
    info!("{} suspect records", suspects.len());

    let results = Results {
        votes: merged.votes,
        duplicates: merged.duplicates,
        suspects,
    };

    let tally = compute_tally(&results.votes, &results.suspects, config.tally.suspect_count);
    let summary = compute_summary(&results, &tally, input.manual_votes.len(), &config.checks);

    Ok(Report {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            suspect_count: config.tally.suspect_count.to_string(),
        },
        summary,
        results,
        tally,
    })
}

/// Every vote needs a voter and a ballot to be keyed.
fn check_votes(votes: &[Vote]) -> Result<(), ReconError> {
    for vote in votes {
        if vote.voter.is_empty() {
            return Err(ReconError::EmptyVoter { ballot: vote.ballot.clone() });
        }
        if vote.ballot.is_empty() {
            return Err(ReconError::EmptyBallot { voter: vote.voter.clone() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Roster, SuspectReason};

    fn input(members: &[&str], outsiders: &[&str], primary: Vec<Vote>) -> ReconInput {
        ReconInput {
            roster: Roster {
                members: members.iter().map(|s| s.to_string()).collect(),
                out_of_district: outsiders.iter().map(|s| s.to_string()).collect(),
                ..Roster::default()
            },
            manual_votes: vec![],
            primary_votes: primary,
        }
    }

    #[test]
    fn duplicates_are_not_classified() {
        let input = input(
            &[],
            &[],
            vec![
                Vote::primary(1, "X", None, "B1", "Yes"),
                Vote::primary(2, "X", None, "B1", "No"),
            ],
        );
        let report = run(&CheckConfig::default(), &input).unwrap();
        assert_eq!(report.results.votes.len(), 1);
        assert_eq!(report.results.duplicates.len(), 1);
        assert_eq!(report.results.suspects.len(), 1);
        assert_eq!(report.results.suspects[0].id, Some(1));
        assert_eq!(report.tally[0].selections.len(), 1);
        assert_eq!(report.tally[0].selections[0].selection, "Yes");
    }

    #[test]
    fn tally_uses_distinct_votes_by_default() {
        let input = input(&[], &["Bob Jones"], vec![Vote::primary(1, "Bob Jones", None, "B1", "No")]);
        let report = run(&CheckConfig::default(), &input).unwrap();
        let reasons: Vec<SuspectReason> =
            report.results.suspects.iter().map(|s| s.reason).collect();
        assert_eq!(reasons, vec![SuspectReason::NotAMember, SuspectReason::OutsideDistrict]);
        assert_eq!(report.tally[0].selections[0].suspect_votes, Some(1));
        assert_eq!(report.summary.suspect_votes, 1);
        assert_eq!(report.meta.suspect_count, "distinct_votes");
    }

    #[test]
    fn empty_voter_rejected() {
        let input = input(&[], &[], vec![Vote::primary(1, "", None, "B1", "No")]);
        let err = run(&CheckConfig::default(), &input).unwrap_err();
        assert!(matches!(err, ReconError::EmptyVoter { .. }));
    }

    #[test]
    fn empty_ballot_rejected() {
        let mut input = input(&[], &[], vec![]);
        input.manual_votes.push(Vote::manual("Ann", "", "Yes"));
        let err = run(&CheckConfig::default(), &input).unwrap_err();
        assert!(matches!(err, ReconError::EmptyBallot { .. }));
    }

    #[test]
    fn meta_has_version() {
        let report = run(&CheckConfig::default(), &ReconInput::default()).unwrap();
        assert_eq!(report.meta.engine_version, env!("CARGO_PKG_VERSION"));
        assert!(report.results.suspects.is_empty());
        assert!(report.tally.is_empty());
    }
}
