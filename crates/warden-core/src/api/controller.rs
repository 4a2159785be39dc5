use crate::{
    InternalError,
    api::require_admin_caller,
    dto::{
        controller::{Controller, ControllerKind, SetControllersArgs},
        error::Error,
    },
    log,
    log::Topic,
    ops::storage::controller::{ControllerGrant, ControllerOps},
    workflow::CallContext,
};
use candid::Principal;

///
/// ControllerApi
///

pub struct ControllerApi;

impl ControllerApi {
    #[must_use]
    pub fn list() -> Vec<Controller> {
        ControllerOps::list()
    }

    /// Grant or refresh manual controllers.
    pub fn set(args: SetControllersArgs) -> Result<(), Error> {
        let ctx = CallContext::current();
        require_admin_caller(&ctx).map_err(InternalError::from)?;

        ControllerOps::grant(
            &args.controllers,
            &ControllerGrant {
                scope: args.scope,
                kind: ControllerKind::Manual,
                metadata: args.metadata,
                expires_at: args.expires_at,
            },
            ctx.now,
        );
        log!(
            Topic::Auth,
            Ok,
            "{} granted {} {} controller(s)",
            ctx.caller,
            args.controllers.len(),
            args.scope
        );

        Ok(())
    }

    pub fn delete(controllers: Vec<Principal>) -> Result<u64, Error> {
        let ctx = CallContext::current();
        require_admin_caller(&ctx).map_err(InternalError::from)?;

        let removed = ControllerOps::revoke(&controllers);
        log!(Topic::Auth, Ok, "{} revoked {removed} controller(s)", ctx.caller);

        Ok(removed as u64)
    }

    /// Drop every expired record. Returns how many were removed.
    pub fn purge_expired() -> Result<u64, Error> {
        let ctx = CallContext::current();
        require_admin_caller(&ctx).map_err(InternalError::from)?;

        Ok(ControllerOps::purge_expired(ctx.now) as u64)
    }
}
