//! Admin gating.
//!
//! A caller is an admin when it controls the canister at the IC level or
//! holds an unexpired `Admin` controller record. Whether the caller is an
//! IC controller is passed in so the rule can be checked off-chain.

use crate::{access::AccessError, ops::storage::controller::ControllerOps};
use candid::Principal;

pub fn require_admin(caller: Principal, ic_controller: bool, now: u64) -> Result<(), AccessError> {
    if ic_controller || ControllerOps::is_admin(&caller, now) {
        return Ok(());
    }

    Err(AccessError::Denied(format!("{caller} is not an admin")))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dto::controller::{ControllerKind, ControllerScope},
        ops::storage::controller::ControllerGrant,
        storage::stable::controller::ControllerStore,
    };
    use std::collections::BTreeMap;

    fn grant(principal: Principal, scope: ControllerScope, expires_at: Option<u64>) {
        ControllerOps::grant(
            &[principal],
            &ControllerGrant {
                scope,
                kind: ControllerKind::Manual,
                metadata: BTreeMap::new(),
                expires_at,
            },
            0,
        );
    }

    #[test]
    fn ic_controller_is_always_admin() {
        ControllerStore::reset_for_tests();

        assert!(require_admin(Principal::anonymous(), true, 0).is_ok());
        assert!(require_admin(Principal::anonymous(), false, 0).is_err());
    }

    #[test]
    fn admin_record_must_be_admin_scoped_and_active() {
        ControllerStore::reset_for_tests();
        let admin = Principal::from_slice(&[1]);
        let writer = Principal::from_slice(&[2]);
        grant(admin, ControllerScope::Admin, Some(50));
        grant(writer, ControllerScope::Write, None);

        assert!(require_admin(admin, false, 10).is_ok());
        assert!(require_admin(admin, false, 50).is_err());
        assert!(require_admin(writer, false, 10).is_err());
    }
}
