use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{common::Post, mongodb::Id};

/// Core candidate registration data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCore {
    /// The election this registration belongs to.
    pub election_id: Id,
    /// The member standing for election.
    pub user_id: Id,
    /// The post being contested.
    pub post: Post,
    pub manifesto: String,
    /// The approval gate: unapproved candidates are invisible to voters.
    pub is_approved: bool,
    /// Denormalised vote tally, incremented in the same transaction as each
    /// vote insert.
    pub votes_count: u64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl CandidateCore {
    /// Create a fresh, unapproved registration with no votes.
    pub fn new(election_id: Id, user_id: Id, post: Post, manifesto: String) -> Self {
        Self {
            election_id,
            user_id,
            post,
            manifesto,
            is_approved: false,
            votes_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// A candidate without an ID.
pub type NewCandidate = CandidateCore;

/// A candidate from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub candidate: CandidateCore,
}

impl Deref for Candidate {
    type Target = CandidateCore;

    fn deref(&self) -> &Self::Target {
        &self.candidate
    }
}

impl DerefMut for Candidate {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.candidate
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Candidate {
        pub fn example_approved(election_id: Id, post: Post, votes_count: u64) -> Self {
            let mut core = CandidateCore::new(
                election_id,
                Id::new(),
                post,
                "My manifesto: service with accountability.".to_string(),
            );
            core.is_approved = true;
            core.votes_count = votes_count;
            Self {
                id: Id::new(),
                candidate: core,
            }
        }

        pub fn example_pending(election_id: Id, post: Post) -> Self {
            Self {
                id: Id::new(),
                candidate: CandidateCore::new(
                    election_id,
                    Id::new(),
                    post,
                    "Awaiting approval.".to_string(),
                ),
            }
        }
    }
}
