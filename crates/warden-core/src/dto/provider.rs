use crate::dto::prelude::*;

///
/// OpenIdProvider
///
/// Identity providers whose tokens the core accepts. `Google` and
/// `GitHubAuth` authenticate end users; `GitHubActions` authenticates CI
/// workloads.
///

#[derive(
    CandidType,
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[remain::sorted]
pub enum OpenIdProvider {
    GitHubActions,
    GitHubAuth,
    Google,
}

impl OpenIdProvider {
    pub const ALL: [Self; 3] = [Self::Google, Self::GitHubAuth, Self::GitHubActions];
}
