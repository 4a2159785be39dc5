pub use crate::cdk::mgmt::{
    HttpHeader, HttpMethod, HttpRequestArgs, HttpRequestResult, TransformArgs, TransformContext,
};
use crate::infra::{InfraError, ic::IcInfraError};

/// Raw HTTP outcall through the management canister.
pub async fn http_request_raw(args: &HttpRequestArgs) -> Result<HttpRequestResult, InfraError> {
    crate::cdk::mgmt::http_request(args)
        .await
        .map_err(|err| InfraError::from(IcInfraError::from(err)))
}

/// Transform context naming an exported query on this canister.
#[must_use]
pub fn transform_context(function_name: &str) -> TransformContext {
    crate::cdk::mgmt::transform_context_from_query(function_name.to_string(), Vec::new())
}

/// Drop response headers so replicas reach consensus on status and body only.
#[must_use]
pub fn strip_headers(args: TransformArgs) -> HttpRequestResult {
    HttpRequestResult {
        status: args.response.status,
        headers: Vec::new(),
        body: args.response.body,
    }
}
