use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::Post,
    db::{candidate::Candidate, profile::Profile},
    mongodb::Id,
};

/// A member's application to stand for a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub post: Post,
    pub manifesto: String,
}

impl RegistrationRequest {
    /// Reject registrations with nothing behind them before anything is
    /// written. The post itself is already validated by parsing into [`Post`].
    pub fn validate(&self) -> Result<()> {
        if self.manifesto.trim().is_empty() {
            return Err(Error::Validation("manifesto must not be empty".to_string()));
        }
        Ok(())
    }
}

/// An admin's approval decision on a registration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub approved: bool,
}

/// An API-friendly candidate description, with the owning profile embedded
/// when it could be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDescription {
    pub id: Id,
    pub election_id: Id,
    pub user_id: Id,
    pub post: Post,
    pub post_label: String,
    pub manifesto: String,
    pub is_approved: bool,
    pub votes_count: u64,
    pub created_at: DateTime<Utc>,
    pub full_name: Option<String>,
    pub state_code: Option<String>,
}

impl CandidateDescription {
    /// Describe a candidate, embedding profile details if present.
    pub fn new(candidate: Candidate, profile: Option<&Profile>) -> Self {
        Self {
            id: candidate.id,
            election_id: candidate.candidate.election_id,
            user_id: candidate.candidate.user_id,
            post: candidate.candidate.post,
            post_label: candidate.candidate.post.label().to_string(),
            manifesto: candidate.candidate.manifesto,
            is_approved: candidate.candidate.is_approved,
            votes_count: candidate.candidate.votes_count,
            created_at: candidate.candidate.created_at,
            full_name: profile.map(|p| p.full_name.clone()),
            state_code: profile.and_then(|p| p.state_code.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifesto_is_rejected() {
        let request = RegistrationRequest {
            post: Post::Provost,
            manifesto: "   ".into(),
        };
        assert!(matches!(request.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn non_empty_manifesto_passes() {
        let request = RegistrationRequest {
            post: Post::Provost,
            manifesto: "Accountability first.".into(),
        };
        assert!(request.validate().is_ok());
    }
}
