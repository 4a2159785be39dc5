use crate::{InternalError, infra::ic::signature};
use candid::Principal;

///
/// SignatureOps
///

pub struct SignatureOps;

impl SignatureOps {
    #[must_use]
    pub fn public_key(canister_id: Principal, seed: &[u8]) -> Vec<u8> {
        signature::public_key(canister_id, seed)
    }

    pub fn prepare(domain: &[u8], seed: &[u8], message: &[u8]) -> Result<(), InternalError> {
        Ok(signature::prepare(domain, seed, message)?)
    }

    #[must_use]
    pub fn get(domain: &[u8], seed: &[u8], message: &[u8]) -> Option<Vec<u8>> {
        signature::get(domain, seed, message)
    }

    pub fn sync_certified_data() {
        signature::sync_certified_data();
    }
}
