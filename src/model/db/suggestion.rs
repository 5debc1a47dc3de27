use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Core suggestion data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionCore {
    pub content: String,
    /// Free-form category tag, e.g. "general" or "welfare".
    pub category: String,
    /// Anonymous suggestions never expose their author.
    pub is_anonymous: bool,
    /// Absent for anonymous suggestions.
    pub author_id: Option<Id>,
    /// Denormalised reaction tally, kept in step with the
    /// `suggestion_reactions` collection transactionally.
    pub reactions_count: u64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl SuggestionCore {
    /// Create a new suggestion. The author is recorded only when the
    /// suggestion is not anonymous.
    pub fn new(content: String, category: String, is_anonymous: bool, author_id: Id) -> Self {
        Self {
            content,
            category,
            is_anonymous,
            author_id: (!is_anonymous).then_some(author_id),
            reactions_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// A suggestion without an ID.
pub type NewSuggestion = SuggestionCore;

/// A suggestion from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub suggestion: SuggestionCore,
}

impl Deref for Suggestion {
    type Target = SuggestionCore;

    fn deref(&self) -> &Self::Target {
        &self.suggestion
    }
}

impl DerefMut for Suggestion {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.suggestion
    }
}

/// Core reaction data: one member's emoji on one suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionReactionCore {
    pub suggestion_id: Id,
    pub user_id: Id,
    pub emoji: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl SuggestionReactionCore {
    pub fn new(suggestion_id: Id, user_id: Id, emoji: String) -> Self {
        Self {
            suggestion_id,
            user_id,
            emoji,
            created_at: Utc::now(),
        }
    }
}

/// A reaction without an ID.
pub type NewSuggestionReaction = SuggestionReactionCore;

/// A reaction from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionReaction {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub reaction: SuggestionReactionCore,
}

impl Deref for SuggestionReaction {
    type Target = SuggestionReactionCore;

    fn deref(&self) -> &Self::Target {
        &self.reaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_suggestions_drop_the_author() {
        let suggestion =
            SuggestionCore::new("Fix the borehole.".to_string(), "welfare".to_string(), true, Id::new());
        assert!(suggestion.author_id.is_none());
    }

    #[test]
    fn named_suggestions_keep_the_author() {
        let author = Id::new();
        let suggestion =
            SuggestionCore::new("More CDS days.".to_string(), "general".to_string(), false, author);
        assert_eq!(suggestion.author_id, Some(author));
    }
}
