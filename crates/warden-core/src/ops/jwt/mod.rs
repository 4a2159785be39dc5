//! Token verification.
//!
//! The pipeline stops at the first failure: header, provider lookup by
//! issuer, key resolution through the certificate cache, signature, then
//! the claims the flow cares about. No step performs network I/O except
//! the cache's bounded refetch, and the `*_cached` variants skip even that.

pub mod claims;
pub mod nonce;

use crate::{
    domain::{
        policy::token::{check_iat, is_immature},
        provider::provider_for_issuer,
    },
    dto::{
        certificate::{Jwk, JwkParams, JwkType},
        config::OpenIdConfig,
        error::{
            AuthenticationError, AutomationError, GetDelegationError, GetOrFetchJwks,
            JwtFindProvider, JwtVerify,
        },
    },
    ops::{
        certificate::{CertificateOps, JwksFetcher},
        prelude::*,
    },
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use claims::{AutomationClaims, OpenIdClaims, TokenClaims};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::de::DeserializeOwned;
use std::collections::HashSet;

const RS256: &str = "RS256";

///
/// VerifyTokenError
/// Verification failures shared by every flow.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum VerifyTokenError {
    #[error(transparent)]
    JwtFindProvider(#[from] JwtFindProvider),

    #[error(transparent)]
    GetOrFetchJwks(#[from] GetOrFetchJwks),

    #[error(transparent)]
    JwtVerify(#[from] JwtVerify),
}

impl From<VerifyTokenError> for AuthenticationError {
    fn from(err: VerifyTokenError) -> Self {
        match err {
            VerifyTokenError::JwtFindProvider(e) => Self::JwtFindProvider(e),
            VerifyTokenError::GetOrFetchJwks(e) => Self::GetOrFetchJwks(e),
            VerifyTokenError::JwtVerify(e) => Self::JwtVerify(e),
        }
    }
}

impl From<VerifyTokenError> for GetDelegationError {
    fn from(err: VerifyTokenError) -> Self {
        match err {
            VerifyTokenError::JwtFindProvider(e) => Self::JwtFindProvider(e),
            VerifyTokenError::GetOrFetchJwks(e) => Self::GetOrFetchJwks(e),
            VerifyTokenError::JwtVerify(e) => Self::JwtVerify(e),
        }
    }
}

impl From<VerifyTokenError> for AutomationError {
    fn from(err: VerifyTokenError) -> Self {
        match err {
            VerifyTokenError::JwtFindProvider(e) => Self::JwtFindProvider(e),
            VerifyTokenError::GetOrFetchJwks(e) => Self::GetOrFetchJwks(e),
            VerifyTokenError::JwtVerify(e) => Self::JwtVerify(e),
        }
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: Option<String>,
    typ: Option<String>,
    kid: Option<String>,
}

#[derive(Deserialize)]
struct RawIssuer {
    iss: Option<String>,
}

fn decode_segment<T: DeserializeOwned>(segment: &str, what: &str) -> Result<T, JwtFindProvider> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| JwtFindProvider::BadSig(format!("{what}: {e}")))?;

    serde_json::from_slice(&bytes).map_err(|e| JwtFindProvider::BadSig(format!("{what}: {e}")))
}

///
/// TokenTarget
/// Provider and key a token claims to be signed by, before any check.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenTarget {
    pub provider: OpenIdProvider,
    pub kid: String,
}

///
/// JwtOps
///

pub struct JwtOps;

impl JwtOps {
    /// Read the header and the unverified issuer, and pick the provider
    /// among `candidates` that issued the token.
    pub fn find_provider(
        jwt: &str,
        candidates: impl IntoIterator<Item = OpenIdProvider>,
    ) -> Result<TokenTarget, VerifyTokenError> {
        let mut segments = jwt.split('.');
        let (Some(header), Some(payload), Some(_), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(JwtFindProvider::BadSig("token must have three segments".into()).into());
        };

        let header: RawHeader = decode_segment(header, "header")?;
        if header.alg.as_deref() != Some(RS256) {
            return Err(JwtFindProvider::BadClaim("alg".into()).into());
        }
        if header.typ.as_deref().is_some_and(|typ| typ != "JWT") {
            return Err(JwtFindProvider::BadClaim("typ".into()).into());
        }
        let kid = header.kid.ok_or(GetOrFetchJwks::MissingKid)?;

        let payload: RawIssuer = decode_segment(payload, "payload")?;
        let issuer = payload
            .iss
            .ok_or_else(|| JwtFindProvider::BadClaim("iss".into()))?;
        let provider = provider_for_issuer(&issuer, candidates)
            .ok_or(JwtFindProvider::NoMatchingProvider(issuer))?;

        Ok(TokenTarget { provider, kid })
    }

    /// Resolve the signing key and check the RS256 signature and `nbf`.
    pub async fn verify_signature<C>(
        jwt: &str,
        target: &TokenTarget,
        fetcher: &dyn JwksFetcher,
        now: u64,
    ) -> Result<C, VerifyTokenError>
    where
        C: TokenClaims + DeserializeOwned + Clone,
    {
        let jwk = CertificateOps::get_or_fetch(target.provider, &target.kid, fetcher, now).await?;

        Self::check_signature(jwt, &jwk, now)
    }

    /// [`Self::verify_signature`] against cached keys only.
    pub fn verify_signature_cached<C>(
        jwt: &str,
        target: &TokenTarget,
        now: u64,
    ) -> Result<C, VerifyTokenError>
    where
        C: TokenClaims + DeserializeOwned + Clone,
    {
        let jwk = CertificateOps::get_cached(target.provider, &target.kid)?;

        Self::check_signature(jwt, &jwk, now)
    }

    fn check_signature<C>(jwt: &str, jwk: &Jwk, now: u64) -> Result<C, VerifyTokenError>
    where
        C: TokenClaims + DeserializeOwned + Clone,
    {
        let (JwkType::Rsa, JwkParams::Rsa { n, e }) = (jwk.kty, &jwk.params) else {
            return Err(JwtVerify::WrongKeyType.into());
        };
        if jwk.alg.as_deref().is_some_and(|alg| alg != RS256) {
            return Err(JwtVerify::WrongKeyType.into());
        }

        let key = DecodingKey::from_rsa_components(n, e)
            .map_err(|err| JwtVerify::BadSig(format!("{:?}", err.kind())))?;

        // time and audience rules are applied by the flows
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        let claims = decode::<C>(jwt, &key, &validation)
            .map_err(|err| JwtVerify::BadSig(format!("{:?}", err.kind())))?
            .claims;

        if claims.nbf().is_some_and(|nbf| is_immature(nbf, now)) {
            return Err(JwtVerify::BadSig("ImmatureSignature".into()).into());
        }

        Ok(claims)
    }

    pub fn check_iat(iat: Option<u64>, now: u64) -> Result<(), JwtVerify> {
        let iat = iat.ok_or_else(|| JwtVerify::BadClaim("iat".into()))?;

        check_iat(iat, now).map_err(|violation| JwtVerify::BadClaim(violation.claim().into()))
    }

    /// `aud` must name the configured client and `nonce` the caller.
    pub fn check_user_claims(
        claims: &OpenIdClaims,
        client_id: &str,
        nonce: &str,
    ) -> Result<(), JwtVerify> {
        if !claims.aud.as_ref().is_some_and(|aud| aud.contains(client_id)) {
            return Err(JwtVerify::BadClaim("aud".into()));
        }
        if claims.nonce.as_deref() != Some(nonce) {
            return Err(JwtVerify::BadClaim("nonce".into()));
        }

        Ok(())
    }

    /// Automation tokens carry the caller's nonce as their only audience.
    pub fn check_automation_audience(
        claims: &AutomationClaims,
        nonce: &str,
    ) -> Result<(), JwtVerify> {
        if claims.aud.as_ref().is_some_and(|aud| aud.is_exactly(nonce)) {
            Ok(())
        } else {
            Err(JwtVerify::BadClaim("aud".into()))
        }
    }

    /// Full end-user verification against the enabled providers.
    pub async fn verify_user(
        jwt: &str,
        config: &OpenIdConfig,
        nonce: &str,
        fetcher: &dyn JwksFetcher,
        now: u64,
    ) -> Result<(OpenIdProvider, OpenIdClaims), VerifyTokenError> {
        let target = Self::find_provider(jwt, config.providers.keys().copied())?;
        let claims: OpenIdClaims = Self::verify_signature(jwt, &target, fetcher, now).await?;

        Self::check_user(config, target.provider, &claims, nonce, now)?;

        Ok((target.provider, claims))
    }

    /// [`Self::verify_user`] for query calls: cached keys, no refetch.
    pub fn verify_user_cached(
        jwt: &str,
        config: &OpenIdConfig,
        nonce: &str,
        now: u64,
    ) -> Result<(OpenIdProvider, OpenIdClaims), VerifyTokenError> {
        let target = Self::find_provider(jwt, config.providers.keys().copied())?;
        let claims: OpenIdClaims = Self::verify_signature_cached(jwt, &target, now)?;

        Self::check_user(config, target.provider, &claims, nonce, now)?;

        Ok((target.provider, claims))
    }

    fn check_user(
        config: &OpenIdConfig,
        provider: OpenIdProvider,
        claims: &OpenIdClaims,
        nonce: &str,
        now: u64,
    ) -> Result<(), JwtVerify> {
        // find_provider only returns configured providers
        let client_id = config
            .providers
            .get(&provider)
            .map(|provider| provider.client_id.as_str())
            .unwrap_or_default();

        Self::check_user_claims(claims, client_id, nonce)?;
        Self::check_iat(claims.iat, now)
    }
}

///
/// TESTS
///
