//!
//! Canister signatures over delegation messages.
//!
//! `prepare` adds the signature inputs to the canister's signature map and
//! commits the new root to certified data; `get` (query context) returns the
//! CBOR signature once the certificate covers it. Off-chain builds have no
//! certified data, so they record prepared inputs in a plain set and hand out
//! an unsigned marker, which is enough to exercise the prepare/get protocol.
//!

use crate::{
    cdk::canister_sig_creation::CanisterSigPublicKey,
    infra::{ic::IcInfraError, prelude::*},
};
use std::cell::RefCell;

#[cfg(not(target_arch = "wasm32"))]
use crate::cdk::canister_sig_creation::hash_with_domain;

#[cfg(target_arch = "wasm32")]
use crate::cdk::{api::certified_data_set, certified_map::labeled_hash};
#[cfg(target_arch = "wasm32")]
use crate::cdk::canister_sig_creation::signature_map::{
    CanisterSigInputs, LABEL_SIG, SignatureMap,
};

#[cfg(target_arch = "wasm32")]
thread_local! {
    /// Heap-resident; certified data must be resynced after an upgrade.
    static SIGNATURES: RefCell<SignatureMap> = RefCell::new(SignatureMap::default());
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static PREPARED: RefCell<std::collections::BTreeSet<[u8; 32]>> =
        const { RefCell::new(std::collections::BTreeSet::new()) };
}

///
/// SignatureInfraError
///

#[derive(Debug, ThisError)]
pub enum SignatureInfraError {
    #[error("signature preparation must be called from an update context")]
    UpdateContextRequired,
}

impl From<SignatureInfraError> for InfraError {
    fn from(err: SignatureInfraError) -> Self {
        IcInfraError::from(err).into()
    }
}

/// DER public key of the canister-signature key derived from `seed`.
#[must_use]
pub fn public_key(canister_id: Principal, seed: &[u8]) -> Vec<u8> {
    CanisterSigPublicKey::new(canister_id, seed.to_vec()).to_der()
}

#[cfg(target_arch = "wasm32")]
pub fn prepare(domain: &[u8], seed: &[u8], message: &[u8]) -> Result<(), InfraError> {
    if !crate::cdk::api::in_replicated_execution() {
        return Err(SignatureInfraError::UpdateContextRequired.into());
    }

    let inputs = CanisterSigInputs {
        domain,
        seed,
        message,
    };

    SIGNATURES.with_borrow_mut(|sigs| sigs.add_signature(&inputs));
    sync_certified_data();

    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
#[allow(clippy::unnecessary_wraps)]
pub fn prepare(domain: &[u8], seed: &[u8], message: &[u8]) -> Result<(), InfraError> {
    PREPARED.with_borrow_mut(|set| set.insert(inputs_digest(domain, seed, message)));

    Ok(())
}

/// Prepared signature as CBOR, or `None` if never prepared or expired.
#[cfg(target_arch = "wasm32")]
#[must_use]
pub fn get(domain: &[u8], seed: &[u8], message: &[u8]) -> Option<Vec<u8>> {
    let inputs = CanisterSigInputs {
        domain,
        seed,
        message,
    };

    SIGNATURES.with_borrow(|sigs| sigs.get_signature_as_cbor(&inputs, None).ok())
}

#[cfg(not(target_arch = "wasm32"))]
#[must_use]
pub fn get(domain: &[u8], seed: &[u8], message: &[u8]) -> Option<Vec<u8>> {
    let digest = inputs_digest(domain, seed, message);

    PREPARED.with_borrow(|set| set.contains(&digest).then(|| digest.to_vec()))
}

/// Commit the signature root under the `sig` label. Also run after an
/// upgrade, which clears the heap map.
#[cfg(target_arch = "wasm32")]
pub fn sync_certified_data() {
    SIGNATURES.with_borrow(|sigs| {
        certified_data_set(labeled_hash(LABEL_SIG, &sigs.root_hash()));
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub const fn sync_certified_data() {}

#[cfg(not(target_arch = "wasm32"))]
fn inputs_digest(domain: &[u8], seed: &[u8], message: &[u8]) -> [u8; 32] {
    let seed_hash = hash_with_domain(b"seed", seed);
    let mut preimage = seed_hash.to_vec();
    preimage.extend_from_slice(message);

    hash_with_domain(domain, &preimage)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
pub fn reset_for_tests() {
    PREPARED.with_borrow_mut(std::collections::BTreeSet::clear);
}

///
/// TESTS
///
