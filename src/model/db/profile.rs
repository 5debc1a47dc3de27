use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{common::Role, mongodb::Id};

/// Core member profile data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCore {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    /// NYSC state code, e.g. "BY/24A/1234".
    pub state_code: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl ProfileCore {
    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // Unwrap safe because the only way to create a ProfileCore is via
        // TryFrom<SignupRequest>, so the hash is always well-formed.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap()
    }
}

/// A profile without an ID.
pub type NewProfile = ProfileCore;

/// A member profile from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub profile: ProfileCore,
}

impl Deref for Profile {
    type Target = ProfileCore;

    fn deref(&self) -> &Self::Target {
        &self.profile
    }
}

impl DerefMut for Profile {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.profile
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl ProfileCore {
        pub fn example_voter() -> Self {
            Self {
                email: "tamara.west@example.com".to_string(),
                password_hash: "$argon2i$v=19$m=4096,t=3,p=1$c29tZXNhbHR5c2FsdA$L5Gz0Qp+aL8JY0m5ZS8rTO9C7pGfc0kV0D0U8DqVNCo".to_string(),
                full_name: "Tamara West".to_string(),
                state_code: Some("BY/24A/0042".to_string()),
                phone: Some("+2348012345678".to_string()),
                role: Role::Voter,
                is_verified: true,
                created_at: Utc::now(),
            }
        }

        pub fn example_candidate() -> Self {
            Self {
                email: "preye.okoro@example.com".to_string(),
                role: Role::Candidate,
                full_name: "Preye Okoro".to_string(),
                ..Self::example_voter()
            }
        }

        pub fn example_admin() -> Self {
            Self {
                email: "coordinator@example.com".to_string(),
                role: Role::SuperAdmin,
                full_name: "State Coordinator".to_string(),
                ..Self::example_voter()
            }
        }
    }

    impl Profile {
        pub fn example_voter() -> Self {
            Self {
                id: Id::new(),
                profile: ProfileCore::example_voter(),
            }
        }

        pub fn example_candidate() -> Self {
            Self {
                id: Id::new(),
                profile: ProfileCore::example_candidate(),
            }
        }
    }
}
