use crate::dto::prelude::*;
use std::fmt::{self, Display};
use thiserror::Error as ThisError;

///
/// Error
/// Public error envelope for admin and configuration endpoints.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    #[must_use]
    pub const fn new(code: ErrorCode, message: String) -> Self {
        Self { code, message }
    }

    /// 409
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message.into())
    }

    /// 500-class failures
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message.into())
    }

    /// 400-class failures
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message.into())
    }

    /// 404
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message.into())
    }

    /// 401 / 403
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message.into())
    }
}

///
/// ErrorCode
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[non_exhaustive]
#[remain::sorted]
pub enum ErrorCode {
    Conflict,
    Internal,
    InvalidInput,
    InvariantViolation,
    NotFound,
    ResourceExhausted,
    Unauthorized,
}

// -----------------------------------------------------------------------------
// Token verification taxonomy
// -----------------------------------------------------------------------------

///
/// JwtFindProvider
/// Failures before a provider and key were located.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
pub enum JwtFindProvider {
    #[error("malformed token: {0}")]
    BadSig(String),

    #[error("invalid header claim: {0}")]
    BadClaim(String),

    #[error("no enabled provider for issuer {0}")]
    NoMatchingProvider(String),
}

///
/// GetOrFetchJwks
/// Failures while resolving the signing key.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
pub enum GetOrFetchJwks {
    #[error("no certificate cached for provider")]
    CertificateNotFound,

    #[error("key not found; certificate fetched recently")]
    KeyNotFoundCooldown,

    #[error("key not found")]
    KeyNotFound,

    #[error("token header has no kid")]
    MissingKid,

    #[error("certificate fetch failed: {0}")]
    FetchFailed(String),

    #[error("certificate fetch rate limit reached")]
    FetchRateLimited,
}

///
/// JwtVerify
/// Failures of the signature or claim checks.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
pub enum JwtVerify {
    #[error("signature rejected: {0}")]
    BadSig(String),

    #[error("invalid claim: {0}")]
    BadClaim(String),

    #[error("key type is not RSA")]
    WrongKeyType,
}

///
/// SaveUniqueJtiToken
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
pub enum SaveUniqueJtiToken {
    #[error("token has no jti")]
    MissingJti,

    #[error("token already used")]
    TokenReused,
}

// -----------------------------------------------------------------------------
// Flow errors
// -----------------------------------------------------------------------------

///
/// AuthenticationError
/// Returned by `authenticate_user`.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
pub enum AuthenticationError {
    #[error("anonymous caller")]
    AnonymousCaller,

    #[error("authentication is not configured")]
    NotConfigured,

    #[error("openid authentication is disabled")]
    OpenIdDisabled,

    #[error("rate limit reached")]
    RateLimited,

    #[error("canister salt is not initialized")]
    SaltNotInitialized,

    #[error(transparent)]
    JwtFindProvider(JwtFindProvider),

    #[error(transparent)]
    GetOrFetchJwks(GetOrFetchJwks),

    #[error(transparent)]
    JwtVerify(JwtVerify),

    #[error("cannot save user: {0}")]
    SaveUser(String),

    #[error("cannot prepare delegation: {0}")]
    PrepareDelegation(String),
}

///
/// GetDelegationError
/// Returned by `get_delegation`.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
pub enum GetDelegationError {
    #[error("anonymous caller")]
    AnonymousCaller,

    #[error("authentication is not configured")]
    NotConfigured,

    #[error("openid authentication is disabled")]
    OpenIdDisabled,

    #[error("canister salt is not initialized")]
    SaltNotInitialized,

    #[error(transparent)]
    JwtFindProvider(JwtFindProvider),

    #[error(transparent)]
    GetOrFetchJwks(GetOrFetchJwks),

    #[error(transparent)]
    JwtVerify(JwtVerify),

    #[error("no such delegation")]
    NoSuchDelegation,
}

///
/// AutomationError
/// Returned by `authenticate_automation`.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
pub enum AutomationError {
    #[error("anonymous caller")]
    AnonymousCaller,

    #[error("authentication is not configured")]
    NotConfigured,

    #[error("automation authentication is disabled")]
    AutomationDisabled,

    #[error("rate limit reached")]
    RateLimited,

    #[error(transparent)]
    JwtFindProvider(JwtFindProvider),

    #[error(transparent)]
    GetOrFetchJwks(GetOrFetchJwks),

    #[error(transparent)]
    JwtVerify(JwtVerify),

    #[error("caller is already a controller")]
    ControllerAlreadyExists,

    #[error("repository not allowed: {0}")]
    RepositoryNotAllowed(String),

    #[error("ref not allowed: {0}")]
    RefNotAllowed(String),

    #[error(transparent)]
    SaveUniqueJtiToken(SaveUniqueJtiToken),

    #[error("cannot save workflow: {0}")]
    SaveWorkflow(String),
}

///
/// MonitoringError
/// Returned by the monitoring start/stop endpoints.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
pub enum MonitoringError {
    #[error("monitoring already running for {0}")]
    AlreadyRunning(OpenIdProvider),

    #[error("monitoring not running for {0}")]
    NotRunning(OpenIdProvider),

    #[error("unauthorized: {0}")]
    Unauthorized(String),
}
