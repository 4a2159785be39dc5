use crate::{
    InternalError, InternalErrorOrigin,
    infra::{
        InfraError,
        ic::http::{
            HttpHeader, HttpMethod, HttpRequestArgs, HttpRequestResult, http_request_raw,
            transform_context,
        },
    },
};
use candid::Nat;
use thiserror::Error as ThisError;

/// Maximum allowed response size for HTTP outcalls.
pub const MAX_RESPONSE_BYTES: u64 = 200_000;

/// Exported query that strips response headers; see `HttpOps::transform`.
pub const TRANSFORM_FUNCTION: &str = "transform";

///
/// HttpOpsError
///

#[derive(Debug, ThisError)]
pub enum HttpOpsError {
    #[error("http error status: {0}")]
    HttpStatus(u32),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl From<HttpOpsError> for InternalError {
    fn from(err: HttpOpsError) -> Self {
        Self::ops(InternalErrorOrigin::Ops, err.to_string())
    }
}

///
/// HttpResponse
///

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

///
/// HttpOps
///

pub struct HttpOps;

impl HttpOps {
    /// Replicated GET. Non-2xx statuses are errors.
    pub async fn get(url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, HttpOpsError> {
        let args = HttpRequestArgs {
            url: url.to_string(),
            max_response_bytes: Some(MAX_RESPONSE_BYTES),
            method: HttpMethod::GET,
            headers: headers
                .iter()
                .map(|(name, value)| HttpHeader {
                    name: (*name).to_string(),
                    value: (*value).to_string(),
                })
                .collect(),
            body: None,
            transform: Some(transform_context(TRANSFORM_FUNCTION)),
            is_replicated: Some(true),
        };

        let res = http_request_raw(&args).await?;
        let status = nat_to_u32(&res.status);

        if !(200..300).contains(&status) {
            return Err(HttpOpsError::HttpStatus(status));
        }

        Ok(HttpResponse {
            status,
            body: res.body,
        })
    }

    /// Transform applied to every outcall response.
    #[must_use]
    pub fn transform(args: crate::infra::ic::http::TransformArgs) -> HttpRequestResult {
        crate::infra::ic::http::strip_headers(args)
    }
}

fn nat_to_u32(nat: &Nat) -> u32 {
    u32::try_from(&nat.0).unwrap_or(u32::MAX)
}
