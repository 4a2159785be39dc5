//! Canister-signed delegations for authenticated users.
//!
//! A user key is the canister-signature public key for a seed derived from
//! the canister salt and the provider account. `prepare` adds the delegation
//! to the signature map and records it as pending; `get` hands out the
//! signature for an exact pending match only.

use crate::{
    cdk::canister_sig_creation::{DELEGATION_SIG_DOMAIN, delegation_signature_msg},
    domain::provider::provider_spec,
    dto::auth::{Delegation, PreparedDelegation, SignedDelegation},
    ops::{ic::signature::SignatureOps, prelude::*},
    storage::heap::delegation::{PendingDelegation, PendingDelegationKey, PendingDelegationStore},
};
use serde_bytes::ByteBuf;
use sha2::{Digest, Sha256};

///
/// DelegationOpsError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum DelegationOpsError {
    #[error("no such delegation")]
    NoSuchDelegation,
}

///
/// DelegationRequest
/// Everything a delegation's signature covers.
///

#[derive(Clone, Debug)]
pub struct DelegationRequest<'a> {
    pub canister_id: Principal,
    pub seed: [u8; 32],
    pub session_key: &'a [u8],
    pub expiration: u64,
    pub targets: Option<Vec<Principal>>,
}

impl DelegationRequest<'_> {
    #[must_use]
    pub fn user_key(&self) -> Vec<u8> {
        SignatureOps::public_key(self.canister_id, &self.seed)
    }

    fn message(&self) -> Vec<u8> {
        let targets = self
            .targets
            .as_ref()
            .map(|targets| targets.iter().map(|p| p.as_slice().to_vec()).collect::<Vec<_>>());

        delegation_signature_msg(self.session_key, self.expiration, targets.as_ref())
    }

    fn pending_key(&self) -> PendingDelegationKey {
        PendingDelegationKey {
            user_key: self.user_key(),
            session_key: self.session_key.to_vec(),
            expiration: self.expiration,
        }
    }
}

///
/// DelegationOps
///

pub struct DelegationOps;

impl DelegationOps {
    /// `SHA-256(len‖salt ‖ len‖issuer ‖ len‖sub)` with 8-byte big-endian
    /// lengths. Uses the provider's canonical issuer so both Google issuer
    /// spellings map to one user.
    #[must_use]
    pub fn seed(salt: &[u8; 32], provider: OpenIdProvider, sub: &str) -> [u8; 32] {
        let issuer = provider_spec(provider).canonical_issuer();

        let mut hasher = Sha256::new();
        for part in [salt.as_slice(), issuer.as_bytes(), sub.as_bytes()] {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }

        hasher.finalize().into()
    }

    /// Principal of the user key, as seen by canisters receiving calls
    /// signed under the delegation.
    #[must_use]
    pub fn user_principal(user_key: &[u8]) -> Principal {
        Principal::self_authenticating(user_key)
    }

    pub fn prepare(
        request: &DelegationRequest<'_>,
        now: u64,
    ) -> Result<PreparedDelegation, InternalError> {
        Self::evict_expired(now);
        SignatureOps::prepare(DELEGATION_SIG_DOMAIN, &request.seed, &request.message())?;

        let key = request.pending_key();
        let user_key = key.user_key.clone();
        PendingDelegationStore::insert(key, PendingDelegation { created_at: now });

        log!(
            Topic::Delegation,
            Info,
            "delegation prepared (expires {}, {} pending)",
            request.expiration,
            PendingDelegationStore::len()
        );

        Ok(PreparedDelegation {
            user_key: ByteBuf::from(user_key),
            expiration: request.expiration,
        })
    }

    /// Signed delegation for an exact, unexpired pending match.
    pub fn get(
        request: &DelegationRequest<'_>,
        now: u64,
    ) -> Result<SignedDelegation, DelegationOpsError> {
        Self::evict_expired(now);

        if PendingDelegationStore::get(&request.pending_key()).is_none() {
            return Err(DelegationOpsError::NoSuchDelegation);
        }

        let signature = SignatureOps::get(DELEGATION_SIG_DOMAIN, &request.seed, &request.message())
            .ok_or(DelegationOpsError::NoSuchDelegation)?;

        Ok(SignedDelegation {
            delegation: Delegation {
                pubkey: ByteBuf::from(request.session_key.to_vec()),
                expiration: request.expiration,
                targets: request.targets.clone(),
            },
            signature: ByteBuf::from(signature),
        })
    }

    fn evict_expired(now: u64) {
        let evicted = PendingDelegationStore::evict_expired(now);
        if evicted > 0 {
            log!(Topic::Delegation, Debug, "evicted {evicted} expired pending delegation(s)");
        }
    }
}

///
/// TESTS
///
