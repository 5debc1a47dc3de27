use mongodb::bson::doc;
use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::Json,
    Route, State,
};

use crate::{
    config::Config,
    error::{Error, Result},
    model::{
        api::auth::{Credentials, ProfileResponse, SignupRequest},
        auth::{AuthToken, Member, AUTH_TOKEN_COOKIE},
        db::profile::{NewProfile, Profile},
        mongodb::{is_duplicate_key_error, Coll, Id},
    },
};

pub fn routes() -> Vec<Route> {
    routes![signup, signin, whoami, logout]
}

#[post("/auth/signup", data = "<request>", format = "json")]
async fn signup(
    cookies: &CookieJar<'_>,
    request: Json<SignupRequest>,
    profiles: Coll<Profile>,
    new_profiles: Coll<NewProfile>,
    config: &State<Config>,
) -> Result<Json<ProfileResponse>> {
    // Hash the password and validate the request.
    let profile: NewProfile = request.0.try_into()?;

    // The unique index on `email` is the real guarantee of one account per
    // address; a racing duplicate surfaces as a duplicate-key error below.
    let new_id: Id = match new_profiles.insert_one(&profile, None).await {
        Ok(result) => result
            .inserted_id
            .as_object_id()
            .unwrap() // Valid because the ID comes directly from the DB.
            .into(),
        Err(ref e) if is_duplicate_key_error(e) => {
            return Err(Error::Status(
                Status::BadRequest,
                format!("Email already registered: {}", profile.email),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let profile = profiles
        .find_one(new_id.as_doc(), None)
        .await?
        .unwrap(); // Present because we just inserted it.

    let token = AuthToken::<Member>::new(&profile);
    cookies.add(token.into_cookie(config));

    Ok(Json(profile.into()))
}

#[post("/auth/signin", data = "<credentials>", format = "json")]
async fn signin(
    cookies: &CookieJar<'_>,
    credentials: Json<Credentials>,
    profiles: Coll<Profile>,
    config: &State<Config>,
) -> Result<Json<ProfileResponse>> {
    let with_email = doc! {
        "email": &credentials.email,
    };

    let profile = profiles
        .find_one(with_email, None)
        .await?
        .filter(|profile| profile.verify_password(&credentials.password))
        .ok_or_else(|| {
            Error::Status(
                Status::Unauthorized,
                "No member found with the provided email and password combination.".to_string(),
            )
        })?;

    let token = AuthToken::<Member>::new(&profile);
    cookies.add(token.into_cookie(config));

    Ok(Json(profile.into()))
}

#[get("/auth/me")]
async fn whoami(
    token: AuthToken<Member>,
    profiles: Coll<Profile>,
) -> Result<Json<ProfileResponse>> {
    let profile = profiles
        .find_one(token.id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Profile {}", token.id)))?;
    Ok(Json(profile.into()))
}

#[delete("/auth")]
fn logout(cookies: &CookieJar) -> Status {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Status::Ok
}
