use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    db::suggestion::{NewSuggestion, Suggestion, SuggestionCore, SuggestionReaction},
    mongodb::Id,
};

/// A new suggestion, as submitted by a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionSpec {
    pub content: String,
    pub category: String,
    pub is_anonymous: bool,
}

impl SuggestionSpec {
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(Error::Validation("suggestion content must not be empty".to_string()));
        }
        Ok(())
    }

    /// Convert into a storable suggestion by the given author.
    pub fn into_suggestion(self, author_id: Id) -> NewSuggestion {
        SuggestionCore::new(self.content, self.category, self.is_anonymous, author_id)
    }
}

/// A reaction toggle request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionSpec {
    pub emoji: String,
}

impl ReactionSpec {
    pub fn validate(&self) -> Result<()> {
        if self.emoji.trim().is_empty() {
            return Err(Error::Validation("emoji must not be empty".to_string()));
        }
        Ok(())
    }
}

/// The outcome of a reaction toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionToggle {
    /// True if the reaction now exists, false if it was removed.
    pub reacted: bool,
    pub reactions_count: u64,
}

impl ReactionToggle {
    /// The state after toggling: an existing reaction is removed and the
    /// tally decremented, otherwise one is added and the tally incremented.
    /// Saturates at zero so a drifted counter cannot underflow.
    pub fn after(existing: bool, reactions_count: u64) -> Self {
        if existing {
            Self {
                reacted: false,
                reactions_count: reactions_count.saturating_sub(1),
            }
        } else {
            Self {
                reacted: true,
                reactions_count: reactions_count + 1,
            }
        }
    }
}

/// An API-friendly suggestion description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionDescription {
    pub id: Id,
    pub content: String,
    pub category: String,
    pub is_anonymous: bool,
    /// Absent for anonymous suggestions.
    pub author_id: Option<Id>,
    pub reactions_count: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Suggestion> for SuggestionDescription {
    fn from(suggestion: Suggestion) -> Self {
        Self {
            id: suggestion.id,
            content: suggestion.suggestion.content,
            category: suggestion.suggestion.category,
            is_anonymous: suggestion.suggestion.is_anonymous,
            author_id: suggestion.suggestion.author_id,
            reactions_count: suggestion.suggestion.reactions_count,
            created_at: suggestion.suggestion.created_at,
        }
    }
}

/// An API-friendly view of a member's own reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionDescription {
    pub id: Id,
    pub suggestion_id: Id,
    pub emoji: String,
}

impl From<SuggestionReaction> for ReactionDescription {
    fn from(reaction: SuggestionReaction) -> Self {
        Self {
            id: reaction.id,
            suggestion_id: reaction.reaction.suggestion_id,
            emoji: reaction.reaction.emoji,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_is_rejected() {
        let spec = SuggestionSpec {
            content: " ".into(),
            category: "general".into(),
            is_anonymous: false,
        };
        assert!(matches!(spec.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn anonymous_spec_produces_authorless_suggestion() {
        let spec = SuggestionSpec {
            content: "Water supply at the lodge.".into(),
            category: "welfare".into(),
            is_anonymous: true,
        };
        let suggestion = spec.into_suggestion(Id::new());
        assert!(suggestion.author_id.is_none());
        assert_eq!(suggestion.reactions_count, 0);
    }

    #[test]
    fn toggling_a_fresh_reaction_increments() {
        let toggle = ReactionToggle::after(false, 4);
        assert!(toggle.reacted);
        assert_eq!(toggle.reactions_count, 5);
    }

    #[test]
    fn toggling_an_existing_reaction_decrements() {
        let toggle = ReactionToggle::after(true, 4);
        assert!(!toggle.reacted);
        assert_eq!(toggle.reactions_count, 3);
    }

    #[test]
    fn removal_saturates_at_zero() {
        let toggle = ReactionToggle::after(true, 0);
        assert_eq!(toggle.reactions_count, 0);
    }
}
