use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{common::ElectionStatus, mongodb::Id};

/// Core election data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionCore {
    /// Election title.
    pub title: String,
    /// Free-text description shown to voters.
    pub description: String,
    /// When voting opens.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub start_date: DateTime<Utc>,
    /// When voting is scheduled to close. Closing is a policy decision made
    /// by an admin; nothing fires automatically when this passes.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub end_date: DateTime<Utc>,
    /// Lifecycle state.
    pub status: ElectionStatus,
    /// Whether the election is visible to members at all.
    pub is_active: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl ElectionCore {
    /// Create a new election, deriving the initial status from the start date.
    pub fn new(
        title: String,
        description: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            title,
            description,
            start_date,
            end_date,
            status: ElectionStatus::derive(start_date, now),
            is_active: true,
            created_at: now,
        }
    }

    /// Is this election currently accepting votes?
    pub fn accepts_votes(&self) -> bool {
        self.is_active && self.status == ElectionStatus::Active
    }
}

/// An election without an ID.
pub type NewElection = ElectionCore;

/// An election from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub election: ElectionCore,
}

impl Deref for Election {
    type Target = ElectionCore;

    fn deref(&self) -> &Self::Target {
        &self.election
    }
}

impl DerefMut for Election {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.election
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    use chrono::Duration;

    impl ElectionCore {
        pub fn example_active() -> Self {
            Self::new(
                "2026 CDS Executive Election".to_string(),
                "Elect the next set of CDS executives.".to_string(),
                Utc::now() - Duration::days(1),
                Utc::now() + Duration::days(13),
            )
        }

        pub fn example_upcoming() -> Self {
            Self::new(
                "2027 CDS Executive Election".to_string(),
                "Next service year's executive election.".to_string(),
                Utc::now() + Duration::days(30),
                Utc::now() + Duration::days(44),
            )
        }

        pub fn example_completed() -> Self {
            let mut election = Self::new(
                "2025 CDS Executive Election".to_string(),
                "Last service year's executive election.".to_string(),
                Utc::now() - Duration::days(400),
                Utc::now() - Duration::days(386),
            );
            election.status = ElectionStatus::Completed;
            election
        }
    }

    impl Election {
        pub fn example_active() -> Self {
            Self {
                id: Id::new(),
                election: ElectionCore::example_active(),
            }
        }

        pub fn example_upcoming() -> Self {
            Self {
                id: Id::new(),
                election: ElectionCore::example_upcoming(),
            }
        }

        pub fn example_completed() -> Self {
            Self {
                id: Id::new(),
                election: ElectionCore::example_completed(),
            }
        }
    }
}
