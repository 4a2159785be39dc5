use crate::{
    dto::certificate::{Jwk, JwkParams, JwkType, Jwks},
    ops::{ic::http::HttpOps, prelude::*},
};
use async_trait::async_trait;

///
/// JwksFetcher
///
/// Source of provider key sets. The canister uses `IcJwksFetcher`; tests
/// script responses.
///

#[async_trait(?Send)]
pub trait JwksFetcher {
    /// Fetch the raw JWKS document, or a transport error message.
    async fn fetch(&self, provider: OpenIdProvider, url: &str) -> Result<Vec<u8>, String>;
}

///
/// IcJwksFetcher
/// Replicated HTTPS outcall.
///

pub struct IcJwksFetcher;

#[async_trait(?Send)]
impl JwksFetcher for IcJwksFetcher {
    async fn fetch(&self, _provider: OpenIdProvider, url: &str) -> Result<Vec<u8>, String> {
        HttpOps::get(url, &[("Accept", "application/json")])
            .await
            .map(|res| res.body)
            .map_err(|err| err.to_string())
    }
}

#[derive(Deserialize)]
struct RawJwks {
    keys: Vec<RawJwk>,
}

#[derive(Deserialize)]
struct RawJwk {
    kty: String,
    kid: Option<String>,
    alg: Option<String>,
    n: Option<String>,
    e: Option<String>,
    crv: Option<String>,
    x: Option<String>,
    y: Option<String>,
    k: Option<String>,
}

impl RawJwk {
    fn into_jwk(self) -> Option<Jwk> {
        let (kty, params) = match self.kty.as_str() {
            "RSA" => (JwkType::Rsa, JwkParams::Rsa { n: self.n?, e: self.e? }),
            "EC" => (
                JwkType::Ec,
                JwkParams::Ec {
                    crv: self.crv?,
                    x: self.x?,
                    y: self.y?,
                },
            ),
            "OKP" => (
                JwkType::Okp,
                JwkParams::Okp {
                    crv: self.crv?,
                    x: self.x?,
                },
            ),
            "oct" => (JwkType::Oct, JwkParams::Oct { k: self.k? }),
            _ => return None,
        };

        Some(Jwk {
            kid: self.kid,
            alg: self.alg,
            kty,
            params,
        })
    }
}

/// Parse a JWKS document. Keys of unknown type or with missing parameters
/// are dropped; a document that is not a JWKS at all is an error.
pub fn parse_jwks(body: &[u8]) -> Result<Jwks, String> {
    let raw: RawJwks =
        serde_json::from_slice(body).map_err(|err| format!("invalid jwks: {err}"))?;

    Ok(Jwks {
        keys: raw.keys.into_iter().filter_map(RawJwk::into_jwk).collect(),
    })
}

///
/// TESTS
///
