//! Reference authentication canister.
//!
//! Exports the user login (`authenticate_user` / `get_delegation`), the
//! automation login, certificate monitoring and the admin surface over
//! `warden-core`.

use candid::Principal;
use warden_cdk::{export_candid, init, post_upgrade, query, update};
use warden_core::{
    api::{
        auth::AuthApi, config::ConfigApi, controller::ControllerApi, http,
        lifecycle::LifecycleApi, monitoring::MonitoringApi,
    },
    dto::{
        auth::{
            Authentication, OpenIdAutomationArgs, OpenIdGetDelegationArgs,
            OpenIdPrepareDelegationArgs, SignedDelegation,
        },
        certificate::OpenIdCertificate,
        config::{AuthenticationConfig, SetAuthenticationConfig},
        controller::{Controller, SetControllersArgs},
        error::{AuthenticationError, AutomationError, Error, GetDelegationError, MonitoringError},
        monitoring::MonitoringStatus,
        provider::OpenIdProvider,
    },
    infra::ic::http::{HttpRequestResult, TransformArgs},
};

const CONFIG: &str = include_str!("../warden.toml");

// lifecycle

#[init]
fn init() {
    LifecycleApi::init(CONFIG);
}

#[post_upgrade]
fn post_upgrade() {
    LifecycleApi::post_upgrade(CONFIG);
}

// authentication

#[update]
async fn authenticate_user(
    args: OpenIdPrepareDelegationArgs,
) -> Result<Authentication, AuthenticationError> {
    AuthApi::authenticate_user(args).await
}

#[query]
fn get_delegation(args: OpenIdGetDelegationArgs) -> Result<SignedDelegation, GetDelegationError> {
    AuthApi::get_delegation(args)
}

#[update]
async fn authenticate_automation(args: OpenIdAutomationArgs) -> Result<(), AutomationError> {
    AuthApi::authenticate_automation(args).await
}

// monitoring

#[update]
fn start_openid_monitoring(provider: OpenIdProvider) -> Result<(), MonitoringError> {
    MonitoringApi::start(provider)
}

#[update]
fn stop_openid_monitoring(provider: OpenIdProvider) -> Result<(), MonitoringError> {
    MonitoringApi::stop(provider)
}

#[query]
fn get_openid_monitoring_status() -> MonitoringStatus {
    MonitoringApi::status()
}

#[query]
fn get_openid_certificate(provider: OpenIdProvider) -> Option<OpenIdCertificate> {
    MonitoringApi::certificate(provider)
}

// admin

#[query]
fn get_auth_config() -> Result<Option<AuthenticationConfig>, Error> {
    ConfigApi::get()
}

#[update]
fn set_auth_config(args: SetAuthenticationConfig) -> Result<AuthenticationConfig, Error> {
    ConfigApi::set(args)
}

#[query]
fn list_controllers() -> Vec<Controller> {
    ControllerApi::list()
}

#[update]
fn set_controllers(args: SetControllersArgs) -> Result<(), Error> {
    ControllerApi::set(args)
}

#[update]
fn delete_controllers(controllers: Vec<Principal>) -> Result<u64, Error> {
    ControllerApi::delete(controllers)
}

#[update]
fn purge_expired_controllers() -> Result<u64, Error> {
    ControllerApi::purge_expired()
}

// outcalls

#[query]
fn transform(args: TransformArgs) -> HttpRequestResult {
    http::transform(args)
}

export_candid!();
