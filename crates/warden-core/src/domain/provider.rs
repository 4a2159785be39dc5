use crate::dto::provider::OpenIdProvider;

///
/// ProviderKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProviderKind {
    /// Interactive users; `aud` is the configured client id.
    User,
    /// CI workloads; `aud` is the caller-derived nonce.
    Automation,
}

///
/// ProviderSpec
/// Static description of one identity provider.
///

#[derive(Clone, Copy, Debug)]
pub struct ProviderSpec {
    pub kind: ProviderKind,
    /// Accepted `iss` values; the first is canonical.
    pub issuers: &'static [&'static str],
    pub jwks_url: &'static str,
}

impl ProviderSpec {
    #[must_use]
    pub fn canonical_issuer(&self) -> &'static str {
        self.issuers[0]
    }
}

static GOOGLE: ProviderSpec = ProviderSpec {
    kind: ProviderKind::User,
    issuers: &["https://accounts.google.com", "accounts.google.com"],
    jwks_url: "https://www.googleapis.com/oauth2/v3/certs",
};

static GITHUB_AUTH: ProviderSpec = ProviderSpec {
    kind: ProviderKind::User,
    issuers: &["https://api.juno.build/auth/github"],
    jwks_url: "https://api.juno.build/v1/auth/certs/github",
};

static GITHUB_ACTIONS: ProviderSpec = ProviderSpec {
    kind: ProviderKind::Automation,
    issuers: &["https://token.actions.githubusercontent.com"],
    jwks_url: "https://token.actions.githubusercontent.com/.well-known/jwks",
};

#[must_use]
pub fn provider_spec(provider: OpenIdProvider) -> &'static ProviderSpec {
    match provider {
        OpenIdProvider::Google => &GOOGLE,
        OpenIdProvider::GitHubAuth => &GITHUB_AUTH,
        OpenIdProvider::GitHubActions => &GITHUB_ACTIONS,
    }
}

/// Resolve a token issuer to one of the candidate providers.
///
/// Only providers enabled for the current flow are candidates, so a valid
/// Google token never authenticates an automation call.
#[must_use]
pub fn provider_for_issuer(
    issuer: &str,
    candidates: impl IntoIterator<Item = OpenIdProvider>,
) -> Option<OpenIdProvider> {
    candidates
        .into_iter()
        .find(|provider| provider_spec(*provider).issuers.contains(&issuer))
}

///
/// TESTS
///
