//! Bootstrap configuration.
//!
//! A TOML document embedded by the canister and parsed once at `init`. It
//! seeds the runtime [`AuthenticationConfig`](crate::dto::config::AuthenticationConfig)
//! when none is stored yet; later changes go through the versioned admin
//! endpoint.

pub mod schema;

use crate::{InternalError, InternalErrorOrigin};
use schema::{ConfigSchemaError, Validate};
use std::{cell::RefCell, sync::Arc};
use thiserror::Error as ThisError;

pub use schema::ConfigModel;

thread_local! {
    static CONFIG: RefCell<Option<Arc<ConfigModel>>> = const { RefCell::new(None) };
}

/// Errors related to configuration lifecycle and parsing.
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config has already been initialized")]
    AlreadyInitialized,

    /// TOML could not be parsed into the expected structure.
    #[error("toml error: {0}")]
    CannotParseToml(String),

    #[error(transparent)]
    ConfigSchema(#[from] ConfigSchemaError),
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::domain(InternalErrorOrigin::Config, err.to_string())
    }
}

///
/// Config
///

pub struct Config;

impl Config {
    #[must_use]
    pub(crate) fn try_get() -> Option<Arc<ConfigModel>> {
        CONFIG.with_borrow(Clone::clone)
    }

    /// Parse, validate and install the bootstrap configuration.
    pub fn init_from_toml(config_str: &str) -> Result<(), ConfigError> {
        let config: ConfigModel =
            toml::from_str(config_str).map_err(|e| ConfigError::CannotParseToml(e.to_string()))?;

        config.validate()?;

        CONFIG.with_borrow_mut(|cfg| {
            if cfg.is_some() {
                return Err(ConfigError::AlreadyInitialized);
            }
            *cfg = Some(Arc::new(config));

            Ok(())
        })
    }

    #[cfg(test)]
    pub fn reset_for_tests() {
        CONFIG.with_borrow_mut(|cfg| *cfg = None);
    }
}

/// Install the bootstrap configuration from a TOML string.
pub fn init_config(config_str: &str) -> Result<(), ConfigError> {
    Config::init_from_toml(config_str)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
        [openid.google]
        client_id = "974645666757-abc.apps.googleusercontent.com"

        [openid.delegation]
        targets = []
        max_time_to_live_secs = 3600

        [automation.github_actions]
        repositories = [
            { owner = "octo-org", name = "site", refs = ["refs/heads/main"] },
        ]
    "#;

    #[test]
    fn init_installs_once() {
        Config::reset_for_tests();

        init_config(TOML).unwrap();
        assert!(Config::try_get().is_some());
        assert!(matches!(
            init_config(TOML),
            Err(ConfigError::AlreadyInitialized)
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        Config::reset_for_tests();

        let err = init_config("[openid.facebook]\nclient_id = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::CannotParseToml(_)));
    }

    #[test]
    fn schema_errors_are_reported() {
        Config::reset_for_tests();

        let err = init_config("[openid.google]\nclient_id = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigSchema(_)));
        assert!(Config::try_get().is_none());
    }
}
