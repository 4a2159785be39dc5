use crate::{
    api::require_admin_caller,
    dto::{
        certificate::OpenIdCertificate, error::MonitoringError, monitoring::MonitoringStatus,
        provider::OpenIdProvider,
    },
    ops::certificate::CertificateOps,
    workflow::{CallContext, monitoring},
};

///
/// MonitoringApi
///

pub struct MonitoringApi;

impl MonitoringApi {
    pub fn start(provider: OpenIdProvider) -> Result<(), MonitoringError> {
        require_admin_caller(&CallContext::current())
            .map_err(|err| MonitoringError::Unauthorized(err.to_string()))?;

        monitoring::start(provider)
    }

    pub fn stop(provider: OpenIdProvider) -> Result<(), MonitoringError> {
        require_admin_caller(&CallContext::current())
            .map_err(|err| MonitoringError::Unauthorized(err.to_string()))?;

        monitoring::stop(provider)
    }

    #[must_use]
    pub fn status() -> MonitoringStatus {
        monitoring::status()
    }

    /// Cached key set for `provider`, if one was ever fetched.
    #[must_use]
    pub fn certificate(provider: OpenIdProvider) -> Option<OpenIdCertificate> {
        CertificateOps::certificate(provider)
    }
}
