use mongodb::{bson::doc, options::FindOptions, Client};
use rocket::{futures::TryStreamExt, http::Status, serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::suggestion::{
        ReactionDescription, ReactionSpec, ReactionToggle, SuggestionDescription, SuggestionSpec,
    },
    auth::{AuthToken, Member},
    db::suggestion::{
        NewSuggestion, NewSuggestionReaction, Suggestion, SuggestionReaction,
        SuggestionReactionCore,
    },
    mongodb::{is_duplicate_key_error, Coll, Id},
};

pub fn routes() -> Vec<Route> {
    routes![
        get_suggestions,
        create_suggestion,
        toggle_reaction,
        get_my_reactions,
    ]
}

/// All suggestions, newest first.
#[get("/suggestions")]
async fn get_suggestions(
    _token: AuthToken<Member>,
    suggestions: Coll<Suggestion>,
) -> Result<Json<Vec<SuggestionDescription>>> {
    let newest_first = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();
    let all: Vec<Suggestion> = suggestions
        .find(None, newest_first)
        .await?
        .try_collect()
        .await?;
    Ok(Json(all.into_iter().map(Into::into).collect()))
}

/// Post a suggestion, optionally anonymous. Anonymous suggestions never
/// store the author's ID at all.
#[post("/suggestions", data = "<spec>", format = "json")]
async fn create_suggestion(
    token: AuthToken<Member>,
    spec: Json<SuggestionSpec>,
    suggestions: Coll<Suggestion>,
    new_suggestions: Coll<NewSuggestion>,
) -> Result<Json<SuggestionDescription>> {
    spec.validate()?;

    let suggestion = spec.0.into_suggestion(token.id);
    let new_id: Id = new_suggestions
        .insert_one(&suggestion, None)
        .await?
        .inserted_id
        .as_object_id()
        .unwrap() // Valid because the ID comes directly from the DB.
        .into();

    let suggestion = suggestions
        .find_one(new_id.as_doc(), None)
        .await?
        .unwrap(); // Present because we just inserted it.

    Ok(Json(suggestion.into()))
}

/// Toggle the caller's emoji reaction on a suggestion. The reaction row and
/// the denormalised `reactions_count` move together in one transaction,
/// mirroring how votes maintain `votes_count`.
#[post("/suggestions/<suggestion_id>/reactions", data = "<spec>", format = "json")]
async fn toggle_reaction(
    token: AuthToken<Member>,
    suggestion_id: Id,
    spec: Json<ReactionSpec>,
    suggestions: Coll<Suggestion>,
    reactions: Coll<SuggestionReaction>,
    new_reactions: Coll<NewSuggestionReaction>,
    db_client: &State<Client>,
) -> Result<Json<ReactionToggle>> {
    spec.validate()?;

    let suggestion = suggestions
        .find_one(suggestion_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Suggestion {}", suggestion_id)))?;

    let mine = doc! {
        "suggestion_id": suggestion.id,
        "user_id": token.id,
        "emoji": &spec.emoji,
    };
    let existing = reactions.find_one(mine.clone(), None).await?;

    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;

    let toggle = ReactionToggle::after(existing.is_some(), suggestion.reactions_count);
    if let Some(reaction) = existing {
        // Remove the reaction and decrement the tally.
        let result = reactions
            .delete_one_with_session(reaction.id.as_doc(), None, &mut session)
            .await?;
        assert_eq!(result.deleted_count, 1);
        let update = doc! {
            "$inc": { "reactions_count": -1 },
        };
        suggestions
            .update_one_with_session(suggestion.id.as_doc(), update, None, &mut session)
            .await?;
    } else {
        // Add the reaction and increment the tally. A racing duplicate is
        // caught by the unique index.
        let reaction = SuggestionReactionCore::new(suggestion.id, token.id, spec.emoji.clone());
        match new_reactions
            .insert_one_with_session(&reaction, None, &mut session)
            .await
        {
            Ok(_) => {}
            Err(ref e) if is_duplicate_key_error(e) => {
                return Err(Error::Status(
                    Status::Conflict,
                    "Reaction already recorded".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }
        let update = doc! {
            "$inc": { "reactions_count": 1 },
        };
        suggestions
            .update_one_with_session(suggestion.id.as_doc(), update, None, &mut session)
            .await?;
    }

    session.commit_transaction().await?;
    Ok(Json(toggle))
}

/// The caller's reactions across all suggestions; drives the toggle UI.
#[get("/suggestions/reactions/mine")]
async fn get_my_reactions(
    token: AuthToken<Member>,
    reactions: Coll<SuggestionReaction>,
) -> Result<Json<Vec<ReactionDescription>>> {
    let filter = doc! {
        "user_id": token.id,
    };
    let mine: Vec<SuggestionReaction> = reactions.find(filter, None).await?.try_collect().await?;
    Ok(Json(mine.into_iter().map(Into::into).collect()))
}
