use crate::{
    InternalError,
    config::{Config, ConfigError},
    dto::config::{AuthenticationConfig, SetAuthenticationConfig},
    log,
    log::Topic,
    ops::storage::config::AuthConfigOps,
};

#[must_use]
pub fn get() -> Option<AuthenticationConfig> {
    AuthConfigOps::get()
}

/// Replace the runtime config. See [`AuthConfigOps::set`] for versioning.
pub fn set(
    args: SetAuthenticationConfig,
    now: u64,
) -> Result<AuthenticationConfig, InternalError> {
    AuthConfigOps::set(args, now).map_err(|err| {
        log!(Topic::Config, Warn, "config update rejected: {err}");
        err.into()
    })
}

/// Seed the runtime config from the bootstrap TOML when none is stored.
pub fn seed_from_bootstrap(now: u64) -> Result<(), InternalError> {
    let Some(model) = Config::try_get() else {
        log!(Topic::Config, Info, "no bootstrap config installed");
        return Ok(());
    };

    let args = model.to_auth_config().map_err(ConfigError::from)?;
    if AuthConfigOps::seed(args, now)? {
        log!(Topic::Config, Ok, "runtime config seeded from bootstrap");
    }

    Ok(())
}

///
/// TESTS
///
