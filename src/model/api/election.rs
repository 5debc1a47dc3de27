use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::ElectionStatus,
    db::election::{Election, ElectionCore, NewElection},
    mongodb::Id,
};

/// An election specification, as submitted by an admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionSpec {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<ElectionSpec> for NewElection {
    /// Convert the spec into a storable election; the initial status is
    /// derived from the start date.
    fn from(spec: ElectionSpec) -> Self {
        ElectionCore::new(spec.title, spec.description, spec.start_date, spec.end_date)
    }
}

/// A requested status change for an election.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ElectionStatus,
}

/// An API-friendly election description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionDescription {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: ElectionStatus,
    pub is_active: bool,
}

impl From<Election> for ElectionDescription {
    fn from(election: Election) -> Self {
        Self {
            id: election.id,
            title: election.election.title,
            description: election.election.description,
            start_date: election.election.start_date,
            end_date: election.election.end_date,
            status: election.election.status,
            is_active: election.election.is_active,
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    use chrono::Duration;

    impl ElectionSpec {
        pub fn example_current() -> Self {
            Self {
                title: "2026 CDS Executive Election".into(),
                description: "Elect the next set of CDS executives.".into(),
                start_date: Utc::now() - Duration::hours(1),
                end_date: Utc::now() + Duration::days(14),
            }
        }

        pub fn example_future() -> Self {
            Self {
                title: "2027 CDS Executive Election".into(),
                description: "Next service year's executive election.".into(),
                start_date: Utc::now() + Duration::days(30),
                end_date: Utc::now() + Duration::days(44),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_spec_becomes_active() {
        let election: NewElection = ElectionSpec::example_current().into();
        assert_eq!(election.status, ElectionStatus::Active);
        assert!(election.is_active);
    }

    #[test]
    fn future_spec_becomes_upcoming() {
        let election: NewElection = ElectionSpec::example_future().into();
        assert_eq!(election.status, ElectionStatus::Upcoming);
    }
}
