use std::collections::HashMap;

use mongodb::bson::doc;
use rocket::{futures::TryStreamExt, http::Status};

use crate::error::{Error, Result};
use crate::model::{
    db::{election::Election, profile::Profile},
    mongodb::{Coll, Id},
};

/// Look up an election by ID.
pub async fn election_by_id(election_id: Id, elections: &Coll<Election>) -> Result<Election> {
    elections
        .find_one(election_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Election {}", election_id)))
}

/// Look up an election by ID and check it is currently accepting votes.
pub async fn votable_election_by_id(
    election_id: Id,
    elections: &Coll<Election>,
) -> Result<Election> {
    let election = election_by_id(election_id, elections).await?;
    if !election.accepts_votes() {
        return Err(Error::Status(
            Status::BadRequest,
            format!("Election {} is not accepting votes", election_id),
        ));
    }
    Ok(election)
}

/// Fetch the profiles for the given IDs, keyed by ID. Used to embed owner
/// details into candidate listings.
pub async fn profiles_by_ids(
    ids: Vec<Id>,
    profiles: &Coll<Profile>,
) -> Result<HashMap<Id, Profile>> {
    let filter = doc! {
        "_id": { "$in": ids },
    };
    let found: Vec<Profile> = profiles.find(filter, None).await?.try_collect().await?;
    Ok(found.into_iter().map(|p| (p.id, p)).collect())
}
