use crate::dto::prelude::*;

///
/// UserProfile
/// Identity document of an authenticated user, as returned to callers.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UserProfile {
    pub principal: Principal,
    pub provider: OpenIdProvider,
    pub email: Option<String>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
    pub version: u64,
    pub created_at: u64,
    pub updated_at: u64,
}
