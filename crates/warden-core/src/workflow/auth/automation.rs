//! CI sign-in: a workload token whose audience is the caller's nonce grants
//! the caller a short-lived controller record, once per token.

use crate::{
    domain::policy::delegation::controller_expiration,
    dto::{
        auth::OpenIdAutomationArgs,
        config::{AutomationConfig, AutomationRepository},
        controller::{ControllerKind, ControllerScope},
        error::{AutomationError, JwtVerify},
    },
    log,
    log::Topic,
    ops::{
        certificate::JwksFetcher,
        jwt::{JwtOps, claims::AutomationClaims, nonce::build_nonce},
        rate::{RateLimitOps, RateOperation},
        storage::{
            config::AuthConfigOps,
            controller::{ControllerGrant, ControllerOps},
            document::workflow::{WorkflowData, WorkflowDocumentOps},
            unique_token::UniqueTokenOps,
        },
    },
    workflow::CallContext,
};
use candid::Principal;
use std::collections::BTreeMap;

fn automation_config() -> Result<AutomationConfig, AutomationError> {
    let config = AuthConfigOps::get().ok_or(AutomationError::NotConfigured)?;

    config
        .automation
        .filter(|automation| !automation.providers.is_empty())
        .ok_or(AutomationError::AutomationDisabled)
}

/// Match the token's repository and ref against the allow-list.
fn allowed_repository<'a>(
    repositories: &'a [AutomationRepository],
    claims: &AutomationClaims,
) -> Result<&'a AutomationRepository, AutomationError> {
    let repository = claims.repository.as_deref().unwrap_or_default();

    let allowed = repositories
        .iter()
        .find(|repo| format!("{}/{}", repo.owner, repo.name) == repository)
        .ok_or_else(|| AutomationError::RepositoryNotAllowed(repository.to_string()))?;

    if let Some(refs) = &allowed.refs {
        let git_ref = claims.r#ref.as_deref().unwrap_or_default();
        if !refs.iter().any(|r| r == git_ref) {
            return Err(AutomationError::RefNotAllowed(git_ref.to_string()));
        }
    }

    Ok(allowed)
}

/// Authenticate the caller as an automation controller.
pub async fn authenticate_automation(
    ctx: &CallContext,
    args: &OpenIdAutomationArgs,
    fetcher: &dyn JwksFetcher,
) -> Result<(), AutomationError> {
    let result = authenticate(ctx, args, fetcher).await;

    if let Err(err) = &result {
        log!(
            Topic::Automation,
            Warn,
            "automation login by {} rejected: {err:?}",
            ctx.caller
        );
    }

    result
}

async fn authenticate(
    ctx: &CallContext,
    args: &OpenIdAutomationArgs,
    fetcher: &dyn JwksFetcher,
) -> Result<(), AutomationError> {
    if ctx.caller == Principal::anonymous() {
        return Err(AutomationError::AnonymousCaller);
    }

    let automation = automation_config()?;

    if !RateLimitOps::try_consume(
        RateOperation::AuthenticateAutomation,
        Some(ctx.caller),
        automation.rate.as_ref(),
        ctx.now,
        1,
    ) {
        return Err(AutomationError::RateLimited);
    }

    let target = JwtOps::find_provider(&args.jwt, automation.providers.keys().copied())?;
    let claims: AutomationClaims =
        JwtOps::verify_signature(&args.jwt, &target, fetcher, ctx.now).await?;

    let nonce = build_nonce(&args.salt, &ctx.caller);
    JwtOps::check_automation_audience(&claims, &nonce).map_err(AutomationError::JwtVerify)?;

    // a replay is reported as such even while the first grant is live
    let token_hash = UniqueTokenOps::check(claims.jti.as_deref())
        .map_err(AutomationError::SaveUniqueJtiToken)?;

    if ControllerOps::is_active(&ctx.caller, ctx.now) {
        return Err(AutomationError::ControllerAlreadyExists);
    }

    JwtOps::check_iat(claims.iat, ctx.now).map_err(AutomationError::JwtVerify)?;

    let run_id = claims
        .run_id
        .clone()
        .ok_or_else(|| AutomationError::JwtVerify(JwtVerify::BadClaim("run_id".into())))?;

    let repositories = automation
        .providers
        .get(&target.provider)
        .map(|config| config.repositories.as_slice())
        .unwrap_or_default();
    let repository = allowed_repository(repositories, &claims)?;
    let full_name = format!("{}/{}", repository.owner, repository.name);

    // the only fallible write goes first; grant and ledger entry follow together
    let workflow = WorkflowData {
        provider: target.provider,
        repository: full_name.clone(),
        r#ref: claims.r#ref.clone(),
        run_id: run_id.clone(),
        run_number: claims.run_number,
        run_attempt: claims.run_attempt,
        workflow: claims.workflow,
        event_name: claims.event_name,
        sha: claims.sha,
        actor: claims.actor,
    };
    let key = WorkflowDocumentOps::record(ctx.caller, &workflow, ctx.now)
        .map_err(|err| AutomationError::SaveWorkflow(err.to_string()))?;

    let mut metadata = BTreeMap::from([
        ("provider".to_string(), target.provider.to_string()),
        ("repository".to_string(), full_name),
        ("run_id".to_string(), run_id),
    ]);
    if let Some(git_ref) = claims.r#ref {
        metadata.insert("ref".to_string(), git_ref);
    }

    let expires_at = controller_expiration(ctx.now, repository.max_time_to_live);
    ControllerOps::grant(
        &[ctx.caller],
        &ControllerGrant {
            scope: repository.scope.unwrap_or(ControllerScope::Write),
            kind: ControllerKind::Automation,
            metadata,
            expires_at: Some(expires_at),
        },
        ctx.now,
    );

    UniqueTokenOps::record(token_hash, target.provider, ctx.now);

    log!(
        Topic::Automation,
        Ok,
        "{} authenticated for {key} until {expires_at}",
        ctx.caller
    );

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::policy::delegation::MAX_AUTOMATION_TTL,
        dto::{
            config::{AutomationProviderConfig, SetAuthenticationConfig},
            error::{JwtFindProvider, SaveUniqueJtiToken},
            provider::OpenIdProvider,
        },
        ops::storage::document::{DocumentOps, workflow::AUTOMATION_WORKFLOW_COLLECTION},
        test::{KID, MockFetcher, caller, canister_id, jwks_body, mint, reset_state, seed_certificate},
    };
    use futures::executor::block_on;
    use serde_json::{Value, json};
    use warden_cdk::utils::time::duration_nanos;

    const NOW_SECS: u64 = 1_700_000_000;
    const NOW: u64 = NOW_SECS * 1_000_000_000;
    const SALT: [u8; 32] = [8; 32];

    fn ctx(now: u64) -> CallContext {
        CallContext {
            caller: caller(),
            canister_id: canister_id(),
            now,
        }
    }

    fn repository() -> AutomationRepository {
        AutomationRepository {
            owner: "octo-org".into(),
            name: "site".into(),
            refs: Some(vec!["refs/heads/main".into()]),
            scope: None,
            max_time_to_live: None,
        }
    }

    fn configure(repository: AutomationRepository) {
        AuthConfigOps::set(
            SetAuthenticationConfig {
                automation: Some(AutomationConfig {
                    providers: BTreeMap::from([(
                        OpenIdProvider::GitHubActions,
                        AutomationProviderConfig {
                            repositories: vec![repository],
                        },
                    )]),
                    rate: None,
                }),
                ..Default::default()
            },
            NOW,
        )
        .unwrap();
    }

    fn setup() {
        reset_state();
        configure(repository());
        seed_certificate(OpenIdProvider::GitHubActions, &jwks_body(&[KID]), NOW);
    }

    fn claims() -> Value {
        json!({
            "iss": "https://token.actions.githubusercontent.com",
            "sub": "repo:octo-org/site:ref:refs/heads/main",
            "aud": build_nonce(&SALT, &caller()),
            "iat": NOW_SECS - 60,
            "jti": "c0ffee",
            "repository": "octo-org/site",
            "repository_owner": "octo-org",
            "ref": "refs/heads/main",
            "run_id": "12345",
            "run_attempt": "1",
            "event_name": "push",
        })
    }

    fn with(overrides: Value) -> Value {
        let mut base = claims();
        for (k, v) in overrides.as_object().unwrap() {
            base[k] = v.clone();
        }
        base
    }

    fn run(claims: &Value) -> Result<(), AutomationError> {
        run_at(claims, NOW)
    }

    fn run_at(claims: &Value, now: u64) -> Result<(), AutomationError> {
        let args = OpenIdAutomationArgs {
            jwt: mint(claims),
            salt: SALT,
        };

        block_on(authenticate_automation(&ctx(now), &args, &MockFetcher::err("offline")))
    }

    #[test]
    fn first_use_grants_write_controller_and_records_run() {
        setup();

        run(&claims()).unwrap();

        let controllers = ControllerOps::list();
        assert_eq!(controllers.len(), 1);
        assert_eq!(controllers[0].principal, caller());
        assert_eq!(controllers[0].scope, ControllerScope::Write);
        assert_eq!(controllers[0].kind, ControllerKind::Automation);
        assert_eq!(
            controllers[0].expires_at,
            Some(NOW + duration_nanos(MAX_AUTOMATION_TTL))
        );

        let key = "GitHubActions#octo-org/site#12345";
        assert!(DocumentOps::get(AUTOMATION_WORKFLOW_COLLECTION, key).is_some());
    }

    #[test]
    fn same_token_cannot_be_replayed() {
        setup();
        run(&claims()).unwrap();

        assert_eq!(
            run(&claims()),
            Err(AutomationError::SaveUniqueJtiToken(SaveUniqueJtiToken::TokenReused))
        );

        // still refused once the grant has lapsed
        let later = NOW + duration_nanos(MAX_AUTOMATION_TTL);
        let replay = with(json!({ "iat": NOW_SECS + 60 * 60 - 60 }));
        assert_eq!(
            run_at(&replay, later),
            Err(AutomationError::SaveUniqueJtiToken(SaveUniqueJtiToken::TokenReused))
        );
    }

    #[test]
    fn rejected_token_leaves_no_trace() {
        setup();

        assert_eq!(
            run(&with(json!({ "ref": "refs/heads/feature" }))),
            Err(AutomationError::RefNotAllowed("refs/heads/feature".into()))
        );
        assert!(ControllerOps::list().is_empty());
        assert_eq!(UniqueTokenOps::len(), 0);
        assert!(
            DocumentOps::get(AUTOMATION_WORKFLOW_COLLECTION, "GitHubActions#octo-org/site#12345")
                .is_none()
        );

        // the jti was not consumed by the failed attempt
        run(&claims()).unwrap();
        assert_eq!(UniqueTokenOps::len(), 1);
    }

    #[test]
    fn anonymous_caller_is_refused() {
        setup();
        let args = OpenIdAutomationArgs {
            jwt: mint(&with(json!({ "aud": build_nonce(&SALT, &Principal::anonymous()) }))),
            salt: SALT,
        };
        let ctx = CallContext {
            caller: Principal::anonymous(),
            ..ctx(NOW)
        };

        assert_eq!(
            block_on(authenticate_automation(&ctx, &args, &MockFetcher::err("offline"))),
            Err(AutomationError::AnonymousCaller)
        );
        assert!(ControllerOps::list().is_empty());
    }

    #[test]
    fn existing_controller_is_checked_before_iat() {
        setup();
        run(&claims()).unwrap();

        let stale = with(json!({ "jti": "other", "iat": NOW_SECS - 60 * 60 }));
        assert_eq!(run(&stale), Err(AutomationError::ControllerAlreadyExists));
    }

    #[test]
    fn jti_is_required() {
        setup();

        assert_eq!(
            run(&with(json!({ "jti": null }))),
            Err(AutomationError::SaveUniqueJtiToken(SaveUniqueJtiToken::MissingJti))
        );
        assert!(ControllerOps::list().is_empty());
    }

    #[test]
    fn audience_must_be_the_callers_nonce() {
        setup();

        assert_eq!(
            run(&with(json!({ "aud": "https://github.com/octo-org" }))),
            Err(AutomationError::JwtVerify(JwtVerify::BadClaim("aud".into())))
        );
    }

    #[test]
    fn repository_and_ref_allow_list() {
        setup();

        assert_eq!(
            run(&with(json!({ "repository": "octo-org/other" }))),
            Err(AutomationError::RepositoryNotAllowed("octo-org/other".into()))
        );
        assert_eq!(
            run(&with(json!({ "ref": "refs/heads/feature" }))),
            Err(AutomationError::RefNotAllowed("refs/heads/feature".into()))
        );
    }

    #[test]
    fn user_provider_tokens_are_not_accepted() {
        setup();
        let google = with(json!({ "iss": "https://accounts.google.com" }));

        assert_eq!(
            run(&google),
            Err(AutomationError::JwtFindProvider(
                JwtFindProvider::NoMatchingProvider("https://accounts.google.com".into())
            ))
        );
    }

    #[test]
    fn repository_scope_and_ttl_are_applied() {
        reset_state();
        configure(AutomationRepository {
            scope: Some(ControllerScope::Submit),
            max_time_to_live: Some(10 * 60 * 1_000_000_000),
            ..repository()
        });
        seed_certificate(OpenIdProvider::GitHubActions, &jwks_body(&[KID]), NOW);

        run(&claims()).unwrap();

        let controller = &ControllerOps::list()[0];
        assert_eq!(controller.scope, ControllerScope::Submit);
        assert_eq!(controller.expires_at, Some(NOW + 10 * 60 * 1_000_000_000));
    }

    #[test]
    fn disabled_when_no_provider_configured() {
        reset_state();

        assert_eq!(run(&claims()), Err(AutomationError::NotConfigured));

        AuthConfigOps::set(SetAuthenticationConfig::default(), NOW).unwrap();
        assert_eq!(run(&claims()), Err(AutomationError::AutomationDisabled));
    }
}
