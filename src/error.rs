use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use mongodb::error::Error as DbError;
use rocket::{http::Status, response::Responder, Request};
use std::fmt::Display;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The member has already voted for this post in this election.
    #[error("Already voted for this post in this election")]
    DuplicateVote,
    /// The member has already registered for this post in this election.
    #[error("Already registered for this post in this election")]
    DuplicateRegistration,
    /// A required field was missing or malformed.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// A persistence gateway call failed.
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    /// Catch-all for a specific status with a message.
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    /// Shorthand for a 404 about the given resource.
    pub fn not_found(what: impl Display) -> Self {
        Self::Status(Status::NotFound, format!("{} not found", what))
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'o> {
        let status = match &self {
            Self::DuplicateVote | Self::DuplicateRegistration => Status::Conflict,
            Self::Validation(_) => Status::UnprocessableEntity,
            Self::Db(_) => Status::InternalServerError,
            Self::Jwt(err) => match err.kind() {
                JwtErrorKind::ExpiredSignature | JwtErrorKind::ImmatureSignature => {
                    Status::Unauthorized
                }
                _ => Status::BadRequest,
            },
            Self::Status(status, _) => *status,
        };
        if status.class().is_server_error() {
            error!("{self}");
        } else {
            warn!("{self}");
        }
        Err(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_the_resource_name() {
        let err = Error::not_found("Election 42");
        assert_eq!(err.to_string(), "Election 42 not found");
        assert!(matches!(err, Error::Status(status, _) if status == Status::NotFound));
    }
}
