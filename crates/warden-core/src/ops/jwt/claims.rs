use serde::{Deserialize, Serialize};

///
/// Audience
/// `aud` is either a single string or an array.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::One(aud) => aud == value,
            Self::Many(auds) => auds.iter().any(|aud| aud == value),
        }
    }

    /// True when the audience is exactly `value`.
    #[must_use]
    pub fn is_exactly(&self, value: &str) -> bool {
        match self {
            Self::One(aud) => aud == value,
            Self::Many(auds) => auds.len() == 1 && auds[0] == value,
        }
    }
}

///
/// TokenClaims
/// Time claims shared by every verified token, in seconds.
///

pub trait TokenClaims {
    fn iat(&self) -> Option<u64>;
    fn nbf(&self) -> Option<u64>;
}

///
/// OpenIdClaims
/// End-user identity token.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OpenIdClaims {
    pub iss: String,
    pub sub: String,
    pub aud: Option<Audience>,
    pub iat: Option<u64>,
    pub nbf: Option<u64>,
    pub exp: Option<u64>,
    pub nonce: Option<String>,

    pub email: Option<String>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
}

impl TokenClaims for OpenIdClaims {
    fn iat(&self) -> Option<u64> {
        self.iat
    }

    fn nbf(&self) -> Option<u64> {
        self.nbf
    }
}

///
/// AutomationClaims
/// CI workload token; `aud` carries the caller-derived nonce.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AutomationClaims {
    pub iss: String,
    pub sub: String,
    pub aud: Option<Audience>,
    pub iat: Option<u64>,
    pub nbf: Option<u64>,
    pub exp: Option<u64>,
    pub jti: Option<String>,

    /// `owner/name`
    pub repository: Option<String>,
    pub repository_owner: Option<String>,
    #[serde(rename = "ref")]
    pub r#ref: Option<String>,
    pub run_id: Option<String>,
    pub run_number: Option<String>,
    pub run_attempt: Option<String>,
    pub workflow: Option<String>,
    pub event_name: Option<String>,
    pub sha: Option<String>,
    pub actor: Option<String>,
}

impl TokenClaims for AutomationClaims {
    fn iat(&self) -> Option<u64> {
        self.iat
    }

    fn nbf(&self) -> Option<u64> {
        self.nbf
    }
}

///
/// TESTS
///
