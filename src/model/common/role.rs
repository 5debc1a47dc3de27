use std::fmt::{Display, Formatter};

use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

/// The closed set of member roles. Capability checks go through the
/// predicates below rather than comparing role strings at call sites.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// An ordinary corps member; may vote.
    Voter,
    /// A member cleared to stand for election.
    Candidate,
    /// A serving executive; votes like any other member.
    Executive,
    /// Full administrative access.
    SuperAdmin,
}

impl Role {
    /// Every authenticated member may cast votes.
    pub fn can_vote(&self) -> bool {
        true
    }

    /// May this role self-register as a candidate?
    pub fn can_stand_for_election(&self) -> bool {
        matches!(self, Self::Candidate)
    }

    /// May this role approve candidates, manage elections, and moderate?
    pub fn can_moderate(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Voter => "voter",
                Self::Candidate => "candidate",
                Self::Executive => "executive",
                Self::SuperAdmin => "super_admin",
            }
        )
    }
}

impl From<Role> for Bson {
    fn from(role: Role) -> Self {
        to_bson(&role).expect("Serialisation is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_candidates_stand() {
        assert!(Role::Candidate.can_stand_for_election());
        assert!(!Role::Voter.can_stand_for_election());
        assert!(!Role::Executive.can_stand_for_election());
        assert!(!Role::SuperAdmin.can_stand_for_election());
    }

    #[test]
    fn only_super_admins_moderate() {
        assert!(Role::SuperAdmin.can_moderate());
        assert!(!Role::Voter.can_moderate());
        assert!(!Role::Candidate.can_moderate());
        assert!(!Role::Executive.can_moderate());
    }

    #[test]
    fn everyone_votes() {
        for role in [Role::Voter, Role::Candidate, Role::Executive, Role::SuperAdmin] {
            assert!(role.can_vote());
        }
    }
}
