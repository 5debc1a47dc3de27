use std::ops::Deref;

use mongodb::{
    bson::doc, error::Error as DbError, options::IndexOptions, Collection, Database, IndexModel,
};
use rocket::{
    request::{self, FromRequest, Request},
    State,
};

use crate::model::db::{
    candidate::{Candidate, NewCandidate},
    election::{Election, NewElection},
    profile::{NewProfile, Profile},
    suggestion::{NewSuggestion, NewSuggestionReaction, Suggestion, SuggestionReaction},
    vote::{NewVote, Vote},
};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r, T> FromRequest<'r> for Coll<T>
where
    T: MongoCollection,
{
    type Error = ();

    /// Get the database connection from the managed state and wrap it in a collection.
    ///
    /// Panics iff the [`Database`] is not managed by [`rocket::Rocket`].
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let db = req.guard::<&State<Database>>().await.unwrap();
        request::Outcome::Success(Coll::from_db(db))
    }
}

// Profile collections
const PROFILES: &str = "profiles";
impl MongoCollection for Profile {
    const NAME: &'static str = PROFILES;
}
impl MongoCollection for NewProfile {
    const NAME: &'static str = PROFILES;
}

// Election collections
const ELECTIONS: &str = "elections";
impl MongoCollection for Election {
    const NAME: &'static str = ELECTIONS;
}
impl MongoCollection for NewElection {
    const NAME: &'static str = ELECTIONS;
}

// Candidate collections
const CANDIDATES: &str = "candidates";
impl MongoCollection for Candidate {
    const NAME: &'static str = CANDIDATES;
}
impl MongoCollection for NewCandidate {
    const NAME: &'static str = CANDIDATES;
}

// Vote collections
const VOTES: &str = "votes";
impl MongoCollection for Vote {
    const NAME: &'static str = VOTES;
}
impl MongoCollection for NewVote {
    const NAME: &'static str = VOTES;
}

// Suggestion collections
const SUGGESTIONS: &str = "suggestions";
impl MongoCollection for Suggestion {
    const NAME: &'static str = SUGGESTIONS;
}
impl MongoCollection for NewSuggestion {
    const NAME: &'static str = SUGGESTIONS;
}

const SUGGESTION_REACTIONS: &str = "suggestion_reactions";
impl MongoCollection for SuggestionReaction {
    const NAME: &'static str = SUGGESTION_REACTIONS;
}
impl MongoCollection for NewSuggestionReaction {
    const NAME: &'static str = SUGGESTION_REACTIONS;
}

/// Ensure that all the required indexes exist on the given database.
///
/// The composite unique indexes are what actually guarantee the one-vote and
/// one-registration invariants; the pre-insert checks in the API layer are
/// just early exits. This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    let unique = IndexOptions::builder().unique(true).build();

    // Profile collection: one account per email address.
    let profile_index = IndexModel::builder()
        .keys(doc! {"email": 1})
        .options(unique.clone())
        .build();
    Coll::<Profile>::from_db(db)
        .create_index(profile_index, None)
        .await?;

    // Vote collection: at most one vote per (voter, election, post).
    let vote_index = IndexModel::builder()
        .keys(doc! {"election_id": 1, "voter_id": 1, "post": 1})
        .options(unique.clone())
        .build();
    Coll::<Vote>::from_db(db)
        .create_index(vote_index, None)
        .await?;

    // Candidate collection: one registration per (election, user, post).
    let candidate_index = IndexModel::builder()
        .keys(doc! {"election_id": 1, "user_id": 1, "post": 1})
        .options(unique.clone())
        .build();
    Coll::<Candidate>::from_db(db)
        .create_index(candidate_index, None)
        .await?;

    // Suggestion reaction collection: one reaction per (suggestion, user, emoji).
    let reaction_index = IndexModel::builder()
        .keys(doc! {"suggestion_id": 1, "user_id": 1, "emoji": 1})
        .options(unique)
        .build();
    Coll::<SuggestionReaction>::from_db(db)
        .create_index(reaction_index, None)
        .await?;

    Ok(())
}
