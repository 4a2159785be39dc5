use crate::{
    config::schema::{ConfigSchemaError, Validate},
    dto::{
        config::{AuthenticationConfig, RateConfig, SetAuthenticationConfig},
        error::ErrorCode,
    },
    ops::{prelude::*, rate::DEFAULT_CERTIFICATE_FETCH_RATE},
    storage::stable::config::AuthConfigStore,
};

///
/// ConfigOpsError
///

#[derive(Debug, ThisError)]
pub enum ConfigOpsError {
    #[error("no version provided")]
    NoVersionProvided,

    #[error("version outdated (current {current}, provided {provided})")]
    VersionOutdated { current: u64, provided: u64 },

    #[error(transparent)]
    Schema(#[from] ConfigSchemaError),
}

impl From<ConfigOpsError> for InternalError {
    fn from(err: ConfigOpsError) -> Self {
        match err {
            ConfigOpsError::Schema(_) => Self::domain(InternalErrorOrigin::Config, err.to_string()),
            ConfigOpsError::NoVersionProvided | ConfigOpsError::VersionOutdated { .. } => {
                Self::ops(InternalErrorOrigin::Config, err.to_string())
                    .with_code(ErrorCode::Conflict)
            }
        }
    }
}

///
/// AuthConfigOps
///

pub struct AuthConfigOps;

impl AuthConfigOps {
    #[must_use]
    pub fn get() -> Option<AuthenticationConfig> {
        AuthConfigStore::get()
    }

    /// Global certificate fetch budget, falling back to the default bucket.
    #[must_use]
    pub fn certificate_fetch_rate() -> RateConfig {
        Self::get()
            .and_then(|config| config.certificate_fetch_rate)
            .unwrap_or(DEFAULT_CERTIFICATE_FETCH_RATE)
    }

    /// Validate and store a new config.
    ///
    /// Once a config exists the caller must echo its version; the stored
    /// version is then bumped by one.
    pub fn set(
        args: SetAuthenticationConfig,
        now: u64,
    ) -> Result<AuthenticationConfig, ConfigOpsError> {
        args.validate()?;

        let current = AuthConfigStore::get();
        if let Some(current) = &current {
            let current_version = current.version.unwrap_or_default();
            match args.version {
                None => return Err(ConfigOpsError::NoVersionProvided),
                Some(provided) if provided != current_version => {
                    return Err(ConfigOpsError::VersionOutdated {
                        current: current_version,
                        provided,
                    });
                }
                Some(_) => {}
            }
        }

        let config = AuthenticationConfig {
            openid: args.openid,
            automation: args.automation,
            certificate_fetch_rate: args.certificate_fetch_rate,
            version: Some(
                current
                    .as_ref()
                    .and_then(|c| c.version)
                    .unwrap_or_default()
                    + 1,
            ),
            created_at: Some(
                current
                    .as_ref()
                    .and_then(|c| c.created_at)
                    .unwrap_or(now),
            ),
            updated_at: Some(now),
        };

        AuthConfigStore::set(config.clone());
        log!(
            Topic::Config,
            Ok,
            "authentication config stored (version {})",
            config.version.unwrap_or_default()
        );

        Ok(config)
    }

    /// Store `args` only when no config exists yet. Returns whether it did.
    pub fn seed(args: SetAuthenticationConfig, now: u64) -> Result<bool, ConfigOpsError> {
        if AuthConfigStore::get().is_some() {
            return Ok(false);
        }

        Self::set(args, now).map(|_| true)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::config::{OpenIdConfig, OpenIdProviderConfig};
    use std::collections::BTreeMap;

    fn google(client_id: &str) -> SetAuthenticationConfig {
        SetAuthenticationConfig {
            openid: Some(OpenIdConfig {
                providers: BTreeMap::from([(
                    OpenIdProvider::Google,
                    OpenIdProviderConfig {
                        client_id: client_id.into(),
                    },
                )]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn first_set_starts_at_version_one() {
        AuthConfigStore::reset_for_tests();

        let config = AuthConfigOps::set(google("a"), 10).unwrap();

        assert_eq!(config.version, Some(1));
        assert_eq!(config.created_at, Some(10));
        assert_eq!(config.updated_at, Some(10));
    }

    #[test]
    fn updates_require_current_version() {
        AuthConfigStore::reset_for_tests();
        AuthConfigOps::set(google("a"), 10).unwrap();

        assert!(matches!(
            AuthConfigOps::set(google("b"), 20),
            Err(ConfigOpsError::NoVersionProvided)
        ));
        assert!(matches!(
            AuthConfigOps::set(
                SetAuthenticationConfig {
                    version: Some(7),
                    ..google("b")
                },
                20
            ),
            Err(ConfigOpsError::VersionOutdated {
                current: 1,
                provided: 7
            })
        ));

        let config = AuthConfigOps::set(
            SetAuthenticationConfig {
                version: Some(1),
                ..google("b")
            },
            20,
        )
        .unwrap();
        assert_eq!(config.version, Some(2));
        assert_eq!(config.created_at, Some(10));
        assert_eq!(config.updated_at, Some(20));
    }

    #[test]
    fn invalid_config_is_not_stored() {
        AuthConfigStore::reset_for_tests();

        assert!(matches!(
            AuthConfigOps::set(google(""), 10),
            Err(ConfigOpsError::Schema(_))
        ));
        assert!(AuthConfigOps::get().is_none());
    }

    #[test]
    fn seed_only_fills_an_empty_slot() {
        AuthConfigStore::reset_for_tests();

        assert!(AuthConfigOps::seed(google("a"), 10).unwrap());
        assert!(!AuthConfigOps::seed(google("b"), 20).unwrap());

        let stored = AuthConfigOps::get().unwrap().openid.unwrap();
        assert_eq!(stored.providers[&OpenIdProvider::Google].client_id, "a");
    }

    #[test]
    fn fetch_rate_falls_back_to_default() {
        AuthConfigStore::reset_for_tests();

        assert_eq!(
            AuthConfigOps::certificate_fetch_rate(),
            DEFAULT_CERTIFICATE_FETCH_RATE
        );
    }
}
