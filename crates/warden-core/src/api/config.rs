use crate::{
    InternalError,
    api::require_admin_caller,
    dto::{
        config::{AuthenticationConfig, SetAuthenticationConfig},
        error::Error,
    },
    workflow::{CallContext, config},
};

///
/// ConfigApi
///

pub struct ConfigApi;

impl ConfigApi {
    pub fn get() -> Result<Option<AuthenticationConfig>, Error> {
        require_admin_caller(&CallContext::current()).map_err(InternalError::from)?;

        Ok(config::get())
    }

    pub fn set(args: SetAuthenticationConfig) -> Result<AuthenticationConfig, Error> {
        let ctx = CallContext::current();
        require_admin_caller(&ctx).map_err(InternalError::from)?;

        Ok(config::set(args, ctx.now)?)
    }
}
