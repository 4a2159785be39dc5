use crate::dto::{document::UserProfile, prelude::*};

/// Caller-chosen salt mixed into the nonce.
pub type Salt = [u8; 32];

/// DER-encoded public key.
pub type PublicKey = ByteBuf;

/// Session public key supplied by the frontend.
pub type SessionKey = PublicKey;

/// Canister-signature public key of the authenticated user.
pub type UserKey = PublicKey;

///
/// OpenIdPrepareDelegationArgs
///

#[derive(CandidType, Clone, Debug, Deserialize, Serialize)]
pub struct OpenIdPrepareDelegationArgs {
    pub jwt: String,
    pub session_key: SessionKey,
    pub salt: Salt,
    /// Requested delegation lifetime in nanoseconds.
    pub max_time_to_live: Option<u64>,
}

///
/// OpenIdGetDelegationArgs
///

#[derive(CandidType, Clone, Debug, Deserialize, Serialize)]
pub struct OpenIdGetDelegationArgs {
    pub jwt: String,
    pub session_key: SessionKey,
    pub salt: Salt,
    pub expiration: u64,
}

///
/// OpenIdAutomationArgs
///

#[derive(CandidType, Clone, Debug, Deserialize, Serialize)]
pub struct OpenIdAutomationArgs {
    pub jwt: String,
    pub salt: Salt,
}

///
/// PreparedDelegation
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PreparedDelegation {
    pub user_key: UserKey,
    pub expiration: u64,
}

///
/// Authentication
/// Result of `authenticate_user`: the prepared delegation and the caller's
/// identity document.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Authentication {
    pub delegation: PreparedDelegation,
    pub profile: UserProfile,
}

///
/// Delegation
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Delegation {
    pub pubkey: PublicKey,
    pub expiration: u64,
    pub targets: Option<Vec<Principal>>,
}

///
/// SignedDelegation
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SignedDelegation {
    pub delegation: Delegation,
    pub signature: ByteBuf,
}
