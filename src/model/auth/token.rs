use std::marker::PhantomData;

use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use rocket::{
    http::{Cookie, SameSite, Status},
    outcome::{try_outcome, IntoOutcome},
    request::{FromRequest, Outcome},
    time::Duration,
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::model::{
    common::Role,
    db::profile::Profile,
    mongodb::{Coll, Id},
};

use super::user::Access;

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// An authentication token representing a specific member with a specific role.
#[derive(Serialize, Deserialize)]
pub struct AuthToken<A> {
    pub id: Id,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(skip)]
    phantom: PhantomData<A>,
}

impl<A> AuthToken<A> {
    /// Create a new [`AuthToken`] for the given profile.
    pub fn new(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            role: profile.role,
            phantom: PhantomData,
        }
    }

    /// Does this token satisfy the access level `A`?
    pub fn permitted(&self) -> bool
    where
        A: Access,
    {
        A::permits(self.role)
    }

    /// Serialize this token into a cookie.
    pub fn into_cookie(self, config: &Config) -> Cookie<'static> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings");

        Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(Duration::seconds(config.auth_ttl().num_seconds()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .finish()
    }

    /// Deserialize a token from a cookie.
    pub fn from_cookie(cookie: &Cookie<'static>, config: &Config) -> Result<Self, Error> {
        let token = jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims<A>>| claims.claims.token)?;
        Ok(token)
    }
}

/// Cookie claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims<A> {
    #[serde(flatten, bound = "")]
    token: AuthToken<A>,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r, A> FromRequest<'r> for AuthToken<A>
where
    A: Access + Send,
{
    type Error = Error;

    /// Get an [`AuthToken`] from the cookie and verify that its role satisfies
    /// the access level `A`.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Unwrap is safe as `Config` is always managed.
        let config = req.guard::<&State<Config>>().await.unwrap();

        // Forward to any routes that do not require an authentication token.
        let cookie = try_outcome!(req.cookies().get(AUTH_TOKEN_COOKIE).or_forward(()));

        // Decode the token.
        let token: Self = try_outcome!(Self::from_cookie(cookie, config).or_forward(()));

        // Check it represents a sufficient role.
        if !token.permitted() {
            return Outcome::Forward(());
        }

        // Check the member actually still exists.
        let db = req.guard::<&State<mongodb::Database>>().await.unwrap();
        let profile = Coll::<Profile>::from_db(db)
            .find_one(token.id.as_doc(), None)
            .await;
        match profile {
            Ok(Some(_)) => Outcome::Success(token),
            Ok(None) => Outcome::Forward(()),
            Err(e) => Outcome::Failure((Status::InternalServerError, e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::auth::{Admin, Member};

    #[test]
    fn member_tokens_never_pass_admin_checks() {
        let profile = Profile::example_voter();
        let member_token = AuthToken::<Member>::new(&profile);
        let admin_token = AuthToken::<Admin>::new(&profile);
        assert!(member_token.permitted());
        assert!(!admin_token.permitted());
    }

    #[test]
    fn cookie_round_trip_preserves_identity() {
        let config = Config::example();
        let profile = Profile::example_voter();
        let token = AuthToken::<Member>::new(&profile);
        let (id, role) = (token.id, token.role);

        let cookie = token.into_cookie(&config);
        let decoded = AuthToken::<Member>::from_cookie(&cookie, &config).unwrap();
        assert_eq!(decoded.id, id);
        assert_eq!(decoded.role, role);
    }
}
