//! End-user sign-in: verify an identity token bound to the caller, then
//! prepare (and later hand out) a canister-signed delegation to the
//! caller's session key.
//!
//! The second phase runs as a query, since canister signatures are only
//! readable with a data certificate; it verifies against cached keys.

use crate::{
    domain::policy::delegation::{delegation_expiration, delegation_targets},
    dto::{
        auth::{Authentication, OpenIdGetDelegationArgs, OpenIdPrepareDelegationArgs, SignedDelegation},
        config::OpenIdConfig,
        error::{AuthenticationError, GetDelegationError},
        provider::OpenIdProvider,
    },
    log,
    log::Topic,
    ops::{
        certificate::JwksFetcher,
        delegation::{DelegationOps, DelegationOpsError, DelegationRequest},
        jwt::{JwtOps, claims::OpenIdClaims, nonce::build_nonce},
        rate::{RateLimitOps, RateOperation},
        storage::{
            config::AuthConfigOps,
            document::user::{UserData, UserDocumentOps},
            salt::SaltOps,
        },
    },
    workflow::CallContext,
};
use candid::Principal;

///
/// OpenIdUnavailable
///

enum OpenIdUnavailable {
    NotConfigured,
    Disabled,
}

impl From<OpenIdUnavailable> for AuthenticationError {
    fn from(err: OpenIdUnavailable) -> Self {
        match err {
            OpenIdUnavailable::NotConfigured => Self::NotConfigured,
            OpenIdUnavailable::Disabled => Self::OpenIdDisabled,
        }
    }
}

impl From<OpenIdUnavailable> for GetDelegationError {
    fn from(err: OpenIdUnavailable) -> Self {
        match err {
            OpenIdUnavailable::NotConfigured => Self::NotConfigured,
            OpenIdUnavailable::Disabled => Self::OpenIdDisabled,
        }
    }
}

fn openid_config() -> Result<OpenIdConfig, OpenIdUnavailable> {
    let config = AuthConfigOps::get().ok_or(OpenIdUnavailable::NotConfigured)?;

    config
        .openid
        .filter(|openid| !openid.providers.is_empty())
        .ok_or(OpenIdUnavailable::Disabled)
}

fn delegation_request<'a>(
    ctx: &CallContext,
    openid: &OpenIdConfig,
    salt: &[u8; 32],
    provider: OpenIdProvider,
    claims: &OpenIdClaims,
    session_key: &'a [u8],
    expiration: u64,
) -> DelegationRequest<'a> {
    let targets = openid
        .delegation
        .as_ref()
        .and_then(|delegation| delegation.targets.as_deref());

    DelegationRequest {
        canister_id: ctx.canister_id,
        seed: DelegationOps::seed(salt, provider, &claims.sub),
        session_key,
        expiration,
        targets: delegation_targets(targets, ctx.canister_id),
    }
}

/// Verify the token, record the user and prepare a delegation.
pub async fn authenticate_user(
    ctx: &CallContext,
    args: &OpenIdPrepareDelegationArgs,
    fetcher: &dyn JwksFetcher,
) -> Result<Authentication, AuthenticationError> {
    if ctx.caller == Principal::anonymous() {
        return Err(AuthenticationError::AnonymousCaller);
    }

    let openid = openid_config()?;

    if !RateLimitOps::try_consume(
        RateOperation::AuthenticateUser,
        Some(ctx.caller),
        openid.rate.as_ref(),
        ctx.now,
        1,
    ) {
        return Err(AuthenticationError::RateLimited);
    }

    let nonce = build_nonce(&args.salt, &ctx.caller);
    let (provider, claims) = JwtOps::verify_user(&args.jwt, &openid, &nonce, fetcher, ctx.now).await?;

    let salt = SaltOps::get().ok_or(AuthenticationError::SaltNotInitialized)?;

    let configured_ttl = openid
        .delegation
        .as_ref()
        .and_then(|delegation| delegation.max_time_to_live);
    let expiration = delegation_expiration(ctx.now, args.max_time_to_live, configured_ttl);
    let request = delegation_request(
        ctx,
        &openid,
        &salt,
        provider,
        &claims,
        &args.session_key,
        expiration,
    );

    let user = DelegationOps::user_principal(&request.user_key());
    let profile = UserDocumentOps::upsert(
        user,
        UserData {
            provider,
            sub: claims.sub.clone(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            given_name: claims.given_name.clone(),
            family_name: claims.family_name.clone(),
            picture: claims.picture.clone(),
            locale: claims.locale.clone(),
        },
        ctx.now,
    )
    .map_err(|err| AuthenticationError::SaveUser(err.to_string()))?;

    let delegation = DelegationOps::prepare(&request, ctx.now)
        .map_err(|err| AuthenticationError::PrepareDelegation(err.to_string()))?;

    log!(Topic::Auth, Ok, "{provider} user {user} authenticated");

    Ok(Authentication {
        delegation,
        profile,
    })
}

/// Re-verify the token and return the delegation prepared for it.
pub fn get_delegation(
    ctx: &CallContext,
    args: &OpenIdGetDelegationArgs,
) -> Result<SignedDelegation, GetDelegationError> {
    if ctx.caller == Principal::anonymous() {
        return Err(GetDelegationError::AnonymousCaller);
    }

    let openid = openid_config()?;

    let nonce = build_nonce(&args.salt, &ctx.caller);
    let (provider, claims) = JwtOps::verify_user_cached(&args.jwt, &openid, &nonce, ctx.now)?;

    let salt = SaltOps::get().ok_or(GetDelegationError::SaltNotInitialized)?;
    let request = delegation_request(
        ctx,
        &openid,
        &salt,
        provider,
        &claims,
        &args.session_key,
        args.expiration,
    );

    DelegationOps::get(&request, ctx.now).map_err(|err| match err {
        DelegationOpsError::NoSuchDelegation => GetDelegationError::NoSuchDelegation,
    })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dto::{
            config::{DelegationConfig, OpenIdProviderConfig, RateConfig, SetAuthenticationConfig},
            error::{GetOrFetchJwks, JwtFindProvider, JwtVerify},
        },
        storage::stable::{certificate::CertificateStore, config::AuthConfigStore, salt::SaltStore},
        test::{KID, MockFetcher, caller, canister_id, jwks_body, mint, reset_state, seed_certificate},
    };
    use futures::executor::block_on;
    use serde_bytes::ByteBuf;
    use serde_json::json;
    use std::collections::BTreeMap;

    const NOW_SECS: u64 = 1_700_000_000;
    const NOW: u64 = NOW_SECS * 1_000_000_000;
    const MINUTE: u64 = 60 * 1_000_000_000;
    const CLIENT_ID: &str = "client-1";
    const SALT: [u8; 32] = [3; 32];

    fn ctx(now: u64) -> CallContext {
        CallContext {
            caller: caller(),
            canister_id: canister_id(),
            now,
        }
    }

    fn configure(delegation: Option<DelegationConfig>, rate: Option<RateConfig>) {
        AuthConfigOps::set(
            SetAuthenticationConfig {
                openid: Some(OpenIdConfig {
                    providers: BTreeMap::from([(
                        OpenIdProvider::Google,
                        OpenIdProviderConfig {
                            client_id: CLIENT_ID.into(),
                        },
                    )]),
                    delegation,
                    rate,
                }),
                ..Default::default()
            },
            NOW,
        )
        .unwrap();
    }

    fn setup() {
        reset_state();
        configure(None, None);
        SaltStore::set([9; 32]);
        seed_certificate(OpenIdProvider::Google, &jwks_body(&[KID]), NOW);
    }

    fn token(sub: &str, name: &str) -> String {
        mint(&json!({
            "iss": "https://accounts.google.com",
            "sub": sub,
            "aud": CLIENT_ID,
            "iat": NOW_SECS - 5 * 60,
            "nonce": build_nonce(&SALT, &caller()),
            "name": name,
        }))
    }

    fn prepare_args(jwt: String) -> OpenIdPrepareDelegationArgs {
        OpenIdPrepareDelegationArgs {
            jwt,
            session_key: ByteBuf::from(b"session-key".to_vec()),
            salt: SALT,
            max_time_to_live: None,
        }
    }

    fn get_args(jwt: String, session_key: &[u8], expiration: u64) -> OpenIdGetDelegationArgs {
        OpenIdGetDelegationArgs {
            jwt,
            session_key: ByteBuf::from(session_key.to_vec()),
            salt: SALT,
            expiration,
        }
    }

    fn authenticate(args: &OpenIdPrepareDelegationArgs) -> Result<Authentication, AuthenticationError> {
        block_on(authenticate_user(&ctx(NOW), args, &MockFetcher::err("offline")))
    }

    fn delegation(args: &OpenIdGetDelegationArgs) -> Result<SignedDelegation, GetDelegationError> {
        get_delegation(&ctx(NOW), args)
    }

    #[test]
    fn unconfigured_or_disabled() {
        reset_state();
        assert_eq!(
            authenticate(&prepare_args(token("1", "Ada"))),
            Err(AuthenticationError::NotConfigured)
        );

        AuthConfigStore::set(crate::dto::config::AuthenticationConfig::default());
        assert_eq!(
            authenticate(&prepare_args(token("1", "Ada"))),
            Err(AuthenticationError::OpenIdDisabled)
        );
    }

    #[test]
    fn two_phase_flow_issues_delegation() {
        setup();
        let jwt = token("1", "Ada");

        let auth = authenticate(&prepare_args(jwt.clone())).unwrap();
        let expiration = auth.delegation.expiration;
        assert_eq!(expiration, NOW + 24 * 60 * MINUTE);
        assert_eq!(auth.profile.name.as_deref(), Some("Ada"));
        assert_eq!(
            auth.profile.principal,
            DelegationOps::user_principal(&auth.delegation.user_key)
        );

        let signed = delegation(&get_args(jwt, b"session-key", expiration)).unwrap();
        assert_eq!(signed.delegation.pubkey.as_ref(), b"session-key");
        assert_eq!(signed.delegation.expiration, expiration);
        assert!(signed.delegation.targets.is_none());
    }

    #[test]
    fn get_delegation_requires_matching_prepare() {
        setup();
        let jwt = token("1", "Ada");

        assert_eq!(
            delegation(&get_args(jwt.clone(), b"session-key", NOW + MINUTE)),
            Err(GetDelegationError::NoSuchDelegation)
        );

        let auth = authenticate(&prepare_args(jwt.clone())).unwrap();
        let expiration = auth.delegation.expiration;

        assert_eq!(
            delegation(&get_args(jwt.clone(), b"other-key", expiration)),
            Err(GetDelegationError::NoSuchDelegation)
        );
        assert_eq!(
            delegation(&get_args(jwt, b"session-key", expiration + 1)),
            Err(GetDelegationError::NoSuchDelegation)
        );
    }

    #[test]
    fn user_key_is_stable_across_logins() {
        setup();

        let first = authenticate(&prepare_args(token("1", "Ada"))).unwrap();
        let second = authenticate(&prepare_args(token("1", "Ada L."))).unwrap();
        let other = authenticate(&prepare_args(token("2", "Bob"))).unwrap();

        assert_eq!(first.delegation.user_key, second.delegation.user_key);
        assert_ne!(first.delegation.user_key, other.delegation.user_key);
        assert_eq!(second.profile.version, 2);
        assert_eq!(second.profile.name.as_deref(), Some("Ada L."));
    }

    #[test]
    fn configured_targets_are_signed() {
        setup();
        let target = candid::Principal::from_slice(&[42]);

        for (configured, expected) in [
            (Some(vec![]), Some(vec![canister_id()])),
            (Some(vec![target]), Some(vec![target])),
        ] {
            AuthConfigStore::reset_for_tests();
            configure(
                Some(DelegationConfig {
                    targets: configured,
                    max_time_to_live: None,
                }),
                None,
            );
            let jwt = token("1", "Ada");
            let auth = authenticate(&prepare_args(jwt.clone())).unwrap();

            let signed =
                delegation(&get_args(jwt, b"session-key", auth.delegation.expiration)).unwrap();
            assert_eq!(signed.delegation.targets, expected);
        }
    }

    #[test]
    fn requested_ttl_is_capped_by_config() {
        setup();
        AuthConfigStore::reset_for_tests();
        configure(
            Some(DelegationConfig {
                targets: None,
                max_time_to_live: Some(30 * MINUTE),
            }),
            None,
        );
        let mut args = prepare_args(token("1", "Ada"));
        args.max_time_to_live = Some(120 * MINUTE);

        let auth = authenticate(&args).unwrap();

        assert_eq!(auth.delegation.expiration, NOW + 30 * MINUTE);
    }

    #[test]
    fn token_for_another_caller_is_rejected() {
        setup();
        let mut args = prepare_args(token("1", "Ada"));
        args.salt = [4; 32];

        assert_eq!(
            authenticate(&args),
            Err(AuthenticationError::JwtVerify(JwtVerify::BadClaim("nonce".into())))
        );
    }

    #[test]
    fn missing_salt_is_reported_after_verification() {
        setup();
        SaltStore::reset_for_tests();

        assert_eq!(
            authenticate(&prepare_args(token("1", "Ada"))),
            Err(AuthenticationError::SaltNotInitialized)
        );
        assert_eq!(
            authenticate(&prepare_args("garbage".into())),
            Err(AuthenticationError::JwtFindProvider(JwtFindProvider::BadSig(
                "token must have three segments".into()
            )))
        );
    }

    #[test]
    fn rate_limit_applies_regardless_of_token() {
        setup();
        AuthConfigStore::reset_for_tests();
        configure(
            None,
            Some(RateConfig {
                max_tokens: 1,
                time_per_token_ns: 60 * MINUTE,
            }),
        );

        assert!(matches!(
            authenticate(&prepare_args("garbage".into())),
            Err(AuthenticationError::JwtFindProvider(_))
        ));
        assert_eq!(
            authenticate(&prepare_args(token("1", "Ada"))),
            Err(AuthenticationError::RateLimited)
        );
    }

    #[test]
    fn get_delegation_uses_cached_keys_only() {
        setup();
        let jwt = token("1", "Ada");
        let auth = authenticate(&prepare_args(jwt.clone())).unwrap();
        let expiration = auth.delegation.expiration;

        // the key set rotated away from the token's kid
        seed_certificate(OpenIdProvider::Google, &jwks_body(&["rotated"]), NOW);
        assert_eq!(
            delegation(&get_args(jwt.clone(), b"session-key", expiration)),
            Err(GetDelegationError::GetOrFetchJwks(GetOrFetchJwks::KeyNotFound))
        );

        CertificateStore::reset_for_tests();
        assert_eq!(
            delegation(&get_args(jwt, b"session-key", expiration)),
            Err(GetDelegationError::GetOrFetchJwks(GetOrFetchJwks::CertificateNotFound))
        );
    }

    #[test]
    fn anonymous_caller_is_refused() {
        setup();
        let anonymous = CallContext {
            caller: Principal::anonymous(),
            ..ctx(NOW)
        };
        let jwt = mint(&json!({
            "iss": "https://accounts.google.com",
            "sub": "1",
            "aud": CLIENT_ID,
            "iat": NOW_SECS - 5 * 60,
            "nonce": build_nonce(&SALT, &Principal::anonymous()),
        }));

        assert_eq!(
            block_on(authenticate_user(
                &anonymous,
                &prepare_args(jwt.clone()),
                &MockFetcher::err("offline")
            )),
            Err(AuthenticationError::AnonymousCaller)
        );
        assert_eq!(
            get_delegation(&anonymous, &get_args(jwt, b"session-key", NOW + MINUTE)),
            Err(GetDelegationError::AnonymousCaller)
        );
    }
}
