use crate::{
    dto::{
        auth::{
            Authentication, OpenIdAutomationArgs, OpenIdGetDelegationArgs,
            OpenIdPrepareDelegationArgs, SignedDelegation,
        },
        error::{AuthenticationError, AutomationError, GetDelegationError},
    },
    ops::certificate::IcJwksFetcher,
    workflow::{CallContext, auth},
};

///
/// AuthApi
///

pub struct AuthApi;

impl AuthApi {
    /// Phase one of the user login: verify the ID token, upsert the user
    /// document and prepare a delegation for `session_key`.
    pub async fn authenticate_user(
        args: OpenIdPrepareDelegationArgs,
    ) -> Result<Authentication, AuthenticationError> {
        auth::user::authenticate_user(&CallContext::current(), &args, &IcJwksFetcher).await
    }

    /// Phase two: the signed delegation prepared in phase one. Query only;
    /// the signature needs the call's data certificate.
    pub fn get_delegation(
        args: OpenIdGetDelegationArgs,
    ) -> Result<SignedDelegation, GetDelegationError> {
        auth::user::get_delegation(&CallContext::current(), &args)
    }

    pub async fn authenticate_automation(args: OpenIdAutomationArgs) -> Result<(), AutomationError> {
        auth::automation::authenticate_automation(&CallContext::current(), &args, &IcJwksFetcher)
            .await
    }
}
