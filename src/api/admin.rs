use mongodb::{bson::doc, options::FindOptions, Client};
use rocket::{futures::TryStreamExt, serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        candidate::{ApprovalRequest, CandidateDescription},
        election::{ElectionDescription, ElectionSpec, StatusUpdate},
    },
    auth::{Admin, AuthToken},
    db::{
        candidate::Candidate,
        election::{Election, NewElection},
        profile::Profile,
        vote::Vote,
    },
    mongodb::{Coll, Id},
};

use super::common::{election_by_id, profiles_by_ids};

pub fn routes() -> Vec<Route> {
    routes![
        create_election,
        set_election_status,
        delete_election,
        get_all_elections,
        get_all_candidates,
        set_candidate_approval,
    ]
}

/// Create an election. The initial status derives from the start date:
/// upcoming if it is in the future, otherwise immediately active.
#[post("/elections", data = "<spec>", format = "json")]
async fn create_election(
    _token: AuthToken<Admin>,
    spec: Json<ElectionSpec>,
    new_elections: Coll<NewElection>,
    elections: Coll<Election>,
) -> Result<Json<ElectionDescription>> {
    let election: NewElection = spec.0.into();
    let new_id: Id = new_elections
        .insert_one(&election, None)
        .await?
        .inserted_id
        .as_object_id()
        .unwrap() // Valid because the ID comes directly from the DB.
        .into();

    let election = elections
        .find_one(new_id.as_doc(), None)
        .await?
        .unwrap(); // Present because we just inserted it.

    Ok(Json(election.into()))
}

/// Set an election's lifecycle status. Deliberately unconditional: admins
/// may move an election to any state at any time.
#[put("/elections/<election_id>/status", data = "<update>", format = "json")]
async fn set_election_status(
    _token: AuthToken<Admin>,
    election_id: Id,
    update: Json<StatusUpdate>,
    elections: Coll<Election>,
) -> Result<()> {
    let set_status = doc! {
        "$set": { "status": update.status },
    };
    let result = elections
        .update_one(election_id.as_doc(), set_status, None)
        .await?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!("Election {}", election_id)));
    }
    Ok(())
}

/// Delete an election and, atomically, everything that hangs off it.
/// Orphaned candidates and votes are worse than a slower delete.
#[delete("/elections/<election_id>")]
async fn delete_election(
    _token: AuthToken<Admin>,
    election_id: Id,
    elections: Coll<Election>,
    candidates: Coll<Candidate>,
    votes: Coll<Vote>,
    db_client: &State<Client>,
) -> Result<()> {
    // Check it exists first so a bad ID is a 404, not a silent no-op.
    let election = election_by_id(election_id, &elections).await?;

    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;

    let result = elections
        .delete_one_with_session(election.id.as_doc(), None, &mut session)
        .await?;
    assert_eq!(result.deleted_count, 1);

    let dependents = doc! {
        "election_id": election.id,
    };
    candidates
        .delete_many_with_session(dependents.clone(), None, &mut session)
        .await?;
    votes
        .delete_many_with_session(dependents, None, &mut session)
        .await?;

    session.commit_transaction().await?;
    Ok(())
}

/// Every election, including deactivated ones, newest first.
#[get("/elections/all")]
async fn get_all_elections(
    _token: AuthToken<Admin>,
    elections: Coll<Election>,
) -> Result<Json<Vec<ElectionDescription>>> {
    let newest_first = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();
    let all: Vec<Election> = elections
        .find(None, newest_first)
        .await?
        .try_collect()
        .await?;
    Ok(Json(all.into_iter().map(Into::into).collect()))
}

/// Every candidate of an election, pending registrations included, with
/// their profiles embedded (moderation view).
#[get("/elections/<election_id>/candidates/all")]
async fn get_all_candidates(
    _token: AuthToken<Admin>,
    election_id: Id,
    elections: Coll<Election>,
    candidates: Coll<Candidate>,
    profiles: Coll<Profile>,
) -> Result<Json<Vec<CandidateDescription>>> {
    let election = election_by_id(election_id, &elections).await?;

    let filter = doc! {
        "election_id": election.id,
    };
    let by_post = FindOptions::builder().sort(doc! { "post": 1 }).build();
    let all: Vec<Candidate> = candidates.find(filter, by_post).await?.try_collect().await?;

    let owners = profiles_by_ids(all.iter().map(|c| c.user_id).collect(), &profiles).await?;
    let described = all
        .into_iter()
        .map(|candidate| {
            let profile = owners.get(&candidate.user_id);
            CandidateDescription::new(candidate, profile)
        })
        .collect();

    Ok(Json(described))
}

/// Approve or reject a candidate registration: a bare boolean flip, no
/// approval history is kept.
#[post("/candidates/<candidate_id>/approval", data = "<request>", format = "json")]
async fn set_candidate_approval(
    _token: AuthToken<Admin>,
    candidate_id: Id,
    request: Json<ApprovalRequest>,
    candidates: Coll<Candidate>,
) -> Result<()> {
    let set_approval = doc! {
        "$set": { "is_approved": request.approved },
    };
    let result = candidates
        .update_one(candidate_id.as_doc(), set_approval, None)
        .await?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!("Candidate {}", candidate_id)));
    }
    Ok(())
}
