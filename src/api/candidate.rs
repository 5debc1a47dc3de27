use mongodb::bson::doc;
use rocket::{futures::TryStreamExt, http::Status, serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::candidate::{CandidateDescription, RegistrationRequest},
    auth::{AuthToken, Member},
    db::{
        candidate::{Candidate, CandidateCore, NewCandidate},
        election::Election,
        profile::Profile,
    },
    mongodb::{is_duplicate_key_error, Coll, Id},
};

use super::common::election_by_id;

pub fn routes() -> Vec<Route> {
    routes![register_candidate, get_my_registrations]
}

/// Self-register as a candidate for a post, pending admin approval.
///
/// Only members with the candidate role may apply. The registration starts
/// unapproved with zero votes and is invisible to voters until approved.
#[post("/elections/<election_id>/candidates", data = "<request>", format = "json")]
async fn register_candidate(
    token: AuthToken<Member>,
    election_id: Id,
    request: Json<RegistrationRequest>,
    elections: Coll<Election>,
    candidates: Coll<Candidate>,
    new_candidates: Coll<NewCandidate>,
    profiles: Coll<Profile>,
) -> Result<Json<CandidateDescription>> {
    if !token.role.can_stand_for_election() {
        return Err(Error::Status(
            Status::Forbidden,
            format!("Role {} may not stand for election", token.role),
        ));
    }
    request.validate()?;

    let election = election_by_id(election_id, &elections).await?;

    // Early exit on an existing registration; the unique index is the
    // actual guarantee.
    let existing = candidates
        .find_one(
            doc! {
                "election_id": election.id,
                "user_id": token.id,
                "post": request.post,
            },
            None,
        )
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateRegistration);
    }

    let registration = CandidateCore::new(
        election.id,
        token.id,
        request.post,
        request.manifesto.clone(),
    );
    let new_id: Id = match new_candidates.insert_one(&registration, None).await {
        Ok(result) => result
            .inserted_id
            .as_object_id()
            .unwrap() // Valid because the ID comes directly from the DB.
            .into(),
        Err(ref e) if is_duplicate_key_error(e) => return Err(Error::DuplicateRegistration),
        Err(e) => return Err(e.into()),
    };

    let candidate = candidates
        .find_one(new_id.as_doc(), None)
        .await?
        .unwrap(); // Present because we just inserted it.
    let profile = profiles.find_one(token.id.as_doc(), None).await?;

    Ok(Json(CandidateDescription::new(candidate, profile.as_ref())))
}

/// The caller's own registrations for an election, approved or not.
#[get("/elections/<election_id>/candidates/mine")]
async fn get_my_registrations(
    token: AuthToken<Member>,
    election_id: Id,
    candidates: Coll<Candidate>,
    profiles: Coll<Profile>,
) -> Result<Json<Vec<CandidateDescription>>> {
    let filter = doc! {
        "election_id": election_id,
        "user_id": token.id,
    };
    let mine: Vec<Candidate> = candidates.find(filter, None).await?.try_collect().await?;
    let profile = profiles.find_one(token.id.as_doc(), None).await?;

    Ok(Json(
        mine.into_iter()
            .map(|candidate| CandidateDescription::new(candidate, profile.as_ref()))
            .collect(),
    ))
}
