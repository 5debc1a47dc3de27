use std::fmt::{Display, Formatter};
use std::str::FromStr;

use mongodb::bson::{to_bson, Bson};
use rocket::request::FromParam;
use serde::{Deserialize, Serialize};

/// The fixed set of elected positions.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Post {
    /// Corps Liaison Officer.
    Clo,
    CdsPresident,
    FinancialSecretary,
    GeneralSecretary,
    MarshallMale,
    MarshallFemale,
    Provost,
}

impl Post {
    /// Every post, in ballot display order.
    pub const ALL: [Post; 7] = [
        Post::Clo,
        Post::CdsPresident,
        Post::FinancialSecretary,
        Post::GeneralSecretary,
        Post::MarshallMale,
        Post::MarshallFemale,
        Post::Provost,
    ];

    /// The wire value, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clo => "clo",
            Self::CdsPresident => "cds_president",
            Self::FinancialSecretary => "financial_secretary",
            Self::GeneralSecretary => "general_secretary",
            Self::MarshallMale => "marshall_male",
            Self::MarshallFemale => "marshall_female",
            Self::Provost => "provost",
        }
    }

    /// Human-readable name of the post.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clo => "CLO (Corps Liaison Officer)",
            Self::CdsPresident => "CDS President",
            Self::FinancialSecretary => "Financial Secretary",
            Self::GeneralSecretary => "General Secretary",
            Self::MarshallMale => "Marshall (Male)",
            Self::MarshallFemale => "Marshall (Female)",
            Self::Provost => "Provost",
        }
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Post {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Post::ALL
            .into_iter()
            .find(|post| post.as_str() == s)
            .ok_or(())
    }
}

impl<'a> FromParam<'a> for Post {
    type Error = &'a str;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse::<Post>().map_err(|_| param)
    }
}

impl From<Post> for Bson {
    fn from(post: Post) -> Self {
        to_bson(&post).expect("Serialisation is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_wire_value() {
        for post in Post::ALL {
            assert_eq!(post.as_str().parse::<Post>(), Ok(post));
        }
    }

    #[test]
    fn rejects_unrecognised_posts() {
        assert!("treasurer".parse::<Post>().is_err());
        assert!("".parse::<Post>().is_err());
    }

    #[test]
    fn wire_value_matches_serde() {
        let json = rocket::serde::json::serde_json::to_string(&Post::CdsPresident).unwrap();
        assert_eq!(json, "\"cds_president\"");
    }
}
