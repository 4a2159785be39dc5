use crate::dto::prelude::*;

///
/// JwkType
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum JwkType {
    #[serde(rename = "EC")]
    Ec,
    #[serde(rename = "oct")]
    Oct,
    #[serde(rename = "OKP")]
    Okp,
    #[serde(rename = "RSA")]
    Rsa,
}

///
/// JwkParams
/// Key material per key type, base64url as published by the provider.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum JwkParams {
    Ec { crv: String, x: String, y: String },
    Oct { k: String },
    Okp { crv: String, x: String },
    Rsa { n: String, e: String },
}

///
/// Jwk
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Jwk {
    pub kid: Option<String>,
    pub alg: Option<String>,
    pub kty: JwkType,
    pub params: JwkParams,
}

///
/// Jwks
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

impl Jwks {
    #[must_use]
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|key| key.kid.as_deref() == Some(kid))
    }
}

///
/// OpenIdCertificate
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OpenIdCertificate {
    pub jwks: Jwks,
    pub version: u64,
    pub created_at: u64,
    pub updated_at: u64,
    pub expires_at: Option<u64>,
}
