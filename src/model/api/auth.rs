use argon2::Config;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{
    common::Role,
    db::profile::{NewProfile, Profile},
    mongodb::Id,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A new member signing up. Never stored directly, since the password is in
/// plaintext.
#[derive(Clone, Deserialize, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub state_code: Option<String>,
    pub phone: Option<String>,
}

impl TryFrom<SignupRequest> for NewProfile {
    type Error = Error;

    /// Convert a [`SignupRequest`] to a new [`Profile`] by hashing the
    /// password. Enforces a plausible email, a non-empty name, and the
    /// minimum password length. New members always start as voters;
    /// role changes are an admin concern.
    fn try_from(request: SignupRequest) -> Result<Self, Self::Error> {
        if !request.email.contains('@') {
            return Err(Error::Validation("a valid email address is required".to_string()));
        }
        if request.full_name.trim().is_empty() {
            return Err(Error::Validation("full name must not be empty".to_string()));
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(Error::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        // 16 bytes is recommended for password hashing:
        //  https://en.wikipedia.org/wiki/Argon2
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash =
            argon2::hash_encoded(request.password.as_bytes(), &salt, &Config::default())
                .expect("The default argon2 config is valid");

        Ok(Self {
            email: request.email,
            password_hash,
            full_name: request.full_name,
            state_code: request.state_code,
            phone: request.phone,
            role: Role::Voter,
            is_verified: false,
            created_at: Utc::now(),
        })
    }
}

/// Raw sign-in credentials, received from a member.
#[derive(Clone, Deserialize, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// An API-friendly view of a profile, omitting the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Id,
    pub email: String,
    pub full_name: String,
    pub state_code: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.profile.email,
            full_name: profile.profile.full_name,
            state_code: profile.profile.state_code,
            phone: profile.profile.phone,
            role: profile.profile.role,
            is_verified: profile.profile.is_verified,
            created_at: profile.profile.created_at,
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl SignupRequest {
        pub fn example() -> Self {
            Self {
                email: "tamara.west@example.com".into(),
                password: "service-year-2026".into(),
                full_name: "Tamara West".into(),
                state_code: Some("BY/24A/0042".into()),
                phone: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_hashes_and_defaults_to_voter() {
        let request = SignupRequest::example();
        let password = request.password.clone();
        let profile = NewProfile::try_from(request).unwrap();
        assert_eq!(profile.role, Role::Voter);
        assert!(!profile.is_verified);
        assert_ne!(profile.password_hash, password);
        assert!(profile.verify_password(&password));
    }

    #[test]
    fn signup_rejects_short_passwords() {
        let request = SignupRequest {
            password: "short".into(),
            ..SignupRequest::example()
        };
        assert!(matches!(
            NewProfile::try_from(request),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn signup_rejects_bad_emails() {
        let request = SignupRequest {
            email: "not-an-email".into(),
            ..SignupRequest::example()
        };
        assert!(matches!(
            NewProfile::try_from(request),
            Err(Error::Validation(_))
        ));
    }
}
