use chrono::{DateTime, Utc};
use rocket::http::Status;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::Post,
    db::{candidate::Candidate, election::Election, vote::Vote},
    mongodb::Id,
};

/// A vote that a member wishes to cast: a specific candidate for a specific
/// post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSpec {
    pub candidate_id: Id,
    pub post: Post,
}

/// An API-friendly view of a recorded vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteDescription {
    pub id: Id,
    pub election_id: Id,
    pub candidate_id: Id,
    pub post: Post,
    pub created_at: DateTime<Utc>,
}

impl From<Vote> for VoteDescription {
    fn from(vote: Vote) -> Self {
        Self {
            id: vote.id,
            election_id: vote.vote.election_id,
            candidate_id: vote.vote.candidate_id,
            post: vote.vote.post,
            created_at: vote.vote.created_at,
        }
    }
}

/// Has this member already voted for the given post in the given election?
///
/// This check over the member's vote history is an early exit; the composite
/// unique index on the votes collection is the actual guarantee.
pub fn already_voted(history: &[Vote], election_id: Id, post: Post) -> bool {
    history
        .iter()
        .any(|vote| vote.election_id == election_id && vote.post == post)
}

/// Every pre-write check for a ballot, in order. The route must not write
/// anything if this fails; in particular a duplicate vote is rejected here,
/// before the transaction, so a failed cast leaves every `votes_count`
/// untouched. The candidate is assumed to already belong to the election
/// (the lookup query filters on `election_id`).
pub fn validate_ballot(
    election: &Election,
    candidate: &Candidate,
    spec: &VoteSpec,
    history: &[Vote],
) -> Result<()> {
    if candidate.post != spec.post {
        return Err(Error::Status(
            Status::BadRequest,
            format!(
                "Candidate {} is standing for {}, not {}",
                candidate.id, candidate.post, spec.post
            ),
        ));
    }
    if !candidate.is_approved {
        return Err(Error::Status(
            Status::BadRequest,
            format!("Candidate {} is not approved", candidate.id),
        ));
    }
    if already_voted(history, election.id, spec.post) {
        return Err(Error::DuplicateVote);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_post_is_not_voted() {
        let election_id = Id::new();
        let voter_id = Id::new();
        let history = vec![Vote::example(election_id, voter_id, Id::new(), Post::Provost)];

        assert!(!already_voted(&history, election_id, Post::CdsPresident));
    }

    #[test]
    fn voted_post_is_detected() {
        let election_id = Id::new();
        let voter_id = Id::new();
        let history = vec![Vote::example(election_id, voter_id, Id::new(), Post::Provost)];

        assert!(already_voted(&history, election_id, Post::Provost));
    }

    #[test]
    fn same_post_in_other_election_does_not_count() {
        let election_id = Id::new();
        let voter_id = Id::new();
        let history = vec![Vote::example(election_id, voter_id, Id::new(), Post::Provost)];

        assert!(!already_voted(&history, Id::new(), Post::Provost));
    }

    #[test]
    fn duplicate_vote_is_rejected_before_any_write() {
        let election = Election::example_active();
        let candidate = Candidate::example_approved(election.id, Post::Provost, 3);
        let voter_id = Id::new();
        let spec = VoteSpec {
            candidate_id: candidate.id,
            post: Post::Provost,
        };
        let history = vec![Vote::example(
            election.id,
            voter_id,
            candidate.id,
            Post::Provost,
        )];

        assert!(matches!(
            validate_ballot(&election, &candidate, &spec, &history),
            Err(Error::DuplicateVote)
        ));
        // Rejection happens before the transaction; no tally moved.
        assert_eq!(candidate.votes_count, 3);
    }

    #[test]
    fn post_mismatch_is_rejected() {
        let election = Election::example_active();
        let candidate = Candidate::example_approved(election.id, Post::Provost, 0);
        let spec = VoteSpec {
            candidate_id: candidate.id,
            post: Post::CdsPresident,
        };

        assert!(matches!(
            validate_ballot(&election, &candidate, &spec, &[]),
            Err(Error::Status(status, _)) if status == Status::BadRequest
        ));
    }

    #[test]
    fn unapproved_candidate_is_rejected() {
        let election = Election::example_active();
        let candidate = Candidate::example_pending(election.id, Post::Provost);
        let spec = VoteSpec {
            candidate_id: candidate.id,
            post: Post::Provost,
        };

        assert!(matches!(
            validate_ballot(&election, &candidate, &spec, &[]),
            Err(Error::Status(status, _)) if status == Status::BadRequest
        ));
    }

    #[test]
    fn fresh_ballot_passes_validation() {
        let election = Election::example_active();
        let candidate = Candidate::example_approved(election.id, Post::Provost, 0);
        let spec = VoteSpec {
            candidate_id: candidate.id,
            post: Post::Provost,
        };
        // A vote for a different post does not block this one.
        let history = vec![Vote::example(
            election.id,
            Id::new(),
            Id::new(),
            Post::CdsPresident,
        )];

        assert!(validate_ballot(&election, &candidate, &spec, &history).is_ok());
    }
}
