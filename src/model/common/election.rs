use chrono::{DateTime, Utc};
use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

/// States in the Election lifecycle.
///
/// The normal progression is upcoming -> active -> completed, driven by
/// admins. The system deliberately does not validate transitions (an admin
/// may set any state at any time); this matches the moderation contract.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionStatus {
    /// Scheduled but not yet open for voting.
    Upcoming,
    /// Open for voting.
    Active,
    /// Closed; results are final.
    Completed,
}

impl ElectionStatus {
    /// The status a newly created election gets: upcoming if it starts in
    /// the future, otherwise immediately active.
    pub fn derive(start_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if start_date > now {
            Self::Upcoming
        } else {
            Self::Active
        }
    }
}

impl From<ElectionStatus> for Bson {
    fn from(status: ElectionStatus) -> Self {
        to_bson(&status).expect("Serialisation is infallible")
    }
}
