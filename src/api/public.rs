use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::error::Result;
use crate::model::{
    api::{candidate::CandidateDescription, election::ElectionDescription, tally::PostTally},
    common::Post,
    db::{candidate::Candidate, election::Election, profile::Profile},
    mongodb::{Coll, Id},
};

use super::common::{election_by_id, profiles_by_ids};

pub fn routes() -> Vec<Route> {
    routes![
        get_elections,
        get_election,
        get_candidates,
        get_tally,
        get_tallies,
    ]
}

/// Elections visible to members, newest first.
#[get("/elections")]
async fn get_elections(elections: Coll<Election>) -> Result<Json<Vec<ElectionDescription>>> {
    let filter = doc! {
        "is_active": true,
    };
    let newest_first = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();
    let all: Vec<Election> = elections
        .find(filter, newest_first)
        .await?
        .try_collect()
        .await?;
    Ok(Json(all.into_iter().map(Into::into).collect()))
}

#[get("/elections/<election_id>")]
async fn get_election(
    election_id: Id,
    elections: Coll<Election>,
) -> Result<Json<ElectionDescription>> {
    let election = election_by_id(election_id, &elections).await?;
    Ok(Json(election.into()))
}

/// The ballot view: approved candidates for an election, ordered by post,
/// with their profiles embedded.
#[get("/elections/<election_id>/candidates")]
async fn get_candidates(
    election_id: Id,
    elections: Coll<Election>,
    candidates: Coll<Candidate>,
    profiles: Coll<Profile>,
) -> Result<Json<Vec<CandidateDescription>>> {
    let election = election_by_id(election_id, &elections).await?;

    let filter = doc! {
        "election_id": election.id,
        "is_approved": true,
    };
    let by_post = FindOptions::builder().sort(doc! { "post": 1 }).build();
    let approved: Vec<Candidate> = candidates
        .find(filter, by_post)
        .await?
        .try_collect()
        .await?;

    let owners = profiles_by_ids(approved.iter().map(|c| c.user_id).collect(), &profiles).await?;
    let described = approved
        .into_iter()
        .map(|candidate| {
            let profile = owners.get(&candidate.user_id);
            CandidateDescription::new(candidate, profile)
        })
        .collect();

    Ok(Json(described))
}

/// Live tally for a single post.
#[get("/elections/<election_id>/tallies/<post>")]
async fn get_tally(
    election_id: Id,
    post: Post,
    elections: Coll<Election>,
    candidates: Coll<Candidate>,
) -> Result<Json<PostTally>> {
    let election = election_by_id(election_id, &elections).await?;
    let standing = approved_candidates(election.id, &candidates).await?;
    Ok(Json(PostTally::compute(post, &standing)))
}

/// Live tallies for every post (results view).
#[get("/elections/<election_id>/tallies")]
async fn get_tallies(
    election_id: Id,
    elections: Coll<Election>,
    candidates: Coll<Candidate>,
) -> Result<Json<Vec<PostTally>>> {
    let election = election_by_id(election_id, &elections).await?;
    let standing = approved_candidates(election.id, &candidates).await?;
    Ok(Json(PostTally::compute_all(&standing)))
}

async fn approved_candidates(
    election_id: Id,
    candidates: &Coll<Candidate>,
) -> Result<Vec<Candidate>> {
    let filter = doc! {
        "election_id": election_id,
        "is_approved": true,
    };
    Ok(candidates.find(filter, None).await?.try_collect().await?)
}
