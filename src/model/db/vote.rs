use std::ops::Deref;

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{common::Post, mongodb::Id};

/// Core vote data, as stored in the database.
///
/// Votes are insert-only: there is deliberately no update or delete surface,
/// and no `DerefMut` on the wrapper. The composite unique index on
/// `(election_id, voter_id, post)` enforces one vote per voter per post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCore {
    pub election_id: Id,
    pub voter_id: Id,
    pub candidate_id: Id,
    pub post: Post,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl VoteCore {
    /// Record a vote cast right now.
    pub fn new(election_id: Id, voter_id: Id, candidate_id: Id, post: Post) -> Self {
        Self {
            election_id,
            voter_id,
            candidate_id,
            post,
            created_at: Utc::now(),
        }
    }
}

/// A vote without an ID.
pub type NewVote = VoteCore;

/// A vote from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub vote: VoteCore,
}

impl Deref for Vote {
    type Target = VoteCore;

    fn deref(&self) -> &Self::Target {
        &self.vote
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Vote {
        pub fn example(election_id: Id, voter_id: Id, candidate_id: Id, post: Post) -> Self {
            Self {
                id: Id::new(),
                vote: VoteCore::new(election_id, voter_id, candidate_id, post),
            }
        }
    }
}
