use mongodb::{bson::doc, Client};
use rocket::{futures::TryStreamExt, http::Status, serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::vote::{validate_ballot, VoteDescription, VoteSpec},
    auth::{AuthToken, Member},
    db::{
        candidate::Candidate,
        election::Election,
        vote::{NewVote, Vote, VoteCore},
    },
    mongodb::{is_duplicate_key_error, Coll, Id},
};

use super::common::votable_election_by_id;

pub fn routes() -> Vec<Route> {
    routes![get_my_votes, cast_vote]
}

/// The caller's vote history for an election; feeds the ballot UI's
/// "already voted" state.
#[get("/elections/<election_id>/votes/mine")]
async fn get_my_votes(
    token: AuthToken<Member>,
    election_id: Id,
    votes: Coll<Vote>,
) -> Result<Json<Vec<VoteDescription>>> {
    let filter = doc! {
        "election_id": election_id,
        "voter_id": token.id,
    };
    let history: Vec<Vote> = votes.find(filter, None).await?.try_collect().await?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}

/// Cast a vote: at most one per (voter, election, post).
///
/// The vote insert and the candidate's `votes_count` increment happen in one
/// transaction, so a failure at any point leaves no partial state. The
/// duplicate check against the member's history is an early exit only; the
/// composite unique index enforces the invariant even across racing requests.
#[post("/elections/<election_id>/votes", data = "<spec>", format = "json")]
async fn cast_vote(
    token: AuthToken<Member>,
    election_id: Id,
    spec: Json<VoteSpec>,
    elections: Coll<Election>,
    candidates: Coll<Candidate>,
    votes: Coll<Vote>,
    new_votes: Coll<NewVote>,
    db_client: &State<Client>,
) -> Result<Json<VoteDescription>> {
    if !token.role.can_vote() {
        return Err(Error::Status(
            Status::Forbidden,
            format!("Role {} may not vote", token.role),
        ));
    }

    // The election must be open for voting.
    let election = votable_election_by_id(election_id, &elections).await?;

    // The candidate must exist in this election.
    let candidate = candidates
        .find_one(
            doc! {
                "_id": spec.candidate_id,
                "election_id": election.id,
            },
            None,
        )
        .await?
        .ok_or_else(|| Error::not_found(format!("Candidate {}", spec.candidate_id)))?;

    // Post match, approval gate, and the duplicate-vote early exit, all
    // before anything is written.
    let history: Vec<Vote> = votes
        .find(
            doc! {
                "election_id": election.id,
                "voter_id": token.id,
            },
            None,
        )
        .await?
        .try_collect()
        .await?;
    validate_ballot(&election, &candidate, &spec, &history)?;

    // Atomically record the vote and bump the candidate's tally.
    let vote = VoteCore::new(election.id, token.id, candidate.id, spec.post);
    let new_id: Id = {
        let mut session = db_client.start_session(None).await?;
        session.start_transaction(None).await?;

        let inserted = new_votes
            .insert_one_with_session(&vote, None, &mut session)
            .await;
        let new_id: Id = match inserted {
            Ok(result) => result
                .inserted_id
                .as_object_id()
                .unwrap() // Valid because the ID comes directly from the DB.
                .into(),
            // A racing request won; the unique index kept the invariant.
            Err(ref e) if is_duplicate_key_error(e) => return Err(Error::DuplicateVote),
            Err(e) => return Err(e.into()),
        };

        let update = doc! {
            "$inc": { "votes_count": 1 },
        };
        let result = candidates
            .update_one_with_session(candidate.id.as_doc(), update, None, &mut session)
            .await?;
        assert_eq!(result.modified_count, 1);

        session.commit_transaction().await?;
        new_id
    };

    let vote = votes
        .find_one(new_id.as_doc(), None)
        .await?
        .unwrap(); // Present because the transaction committed.

    Ok(Json(vote.into()))
}
