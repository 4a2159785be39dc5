use crate::{
    dto::controller::{Controller, ControllerKind, ControllerScope},
    ops::prelude::*,
    storage::stable::controller::{ControllerRecord, ControllerStore},
};
use std::collections::BTreeMap;

///
/// ControllerGrant
///

#[derive(Clone, Debug)]
pub struct ControllerGrant {
    pub scope: ControllerScope,
    pub kind: ControllerKind,
    pub metadata: BTreeMap<String, String>,
    pub expires_at: Option<u64>,
}

///
/// ControllerOps
/// Principals this canister accepts as controllers, beyond its IC controllers.
///

pub struct ControllerOps;

impl ControllerOps {
    #[must_use]
    pub fn is_active(principal: &Principal, now: u64) -> bool {
        ControllerStore::get(principal).is_some_and(|record| record.is_active(now))
    }

    #[must_use]
    pub fn is_admin(principal: &Principal, now: u64) -> bool {
        ControllerStore::get(principal)
            .is_some_and(|record| record.scope == ControllerScope::Admin && record.is_active(now))
    }

    /// Insert or refresh records; an existing record keeps its `created_at`.
    pub fn grant(principals: &[Principal], grant: &ControllerGrant, now: u64) {
        for principal in principals {
            let created_at = ControllerStore::get(principal).map_or(now, |r| r.created_at);

            ControllerStore::insert(
                *principal,
                ControllerRecord {
                    scope: grant.scope,
                    kind: grant.kind,
                    metadata: grant.metadata.clone(),
                    created_at,
                    updated_at: now,
                    expires_at: grant.expires_at,
                },
            );
        }

        log!(
            Topic::Auth,
            Info,
            "granted {} {} controller(s) with scope {}",
            principals.len(),
            grant.kind,
            grant.scope
        );
    }

    pub fn revoke(principals: &[Principal]) -> usize {
        principals
            .iter()
            .filter(|principal| ControllerStore::remove(principal).is_some())
            .count()
    }

    #[must_use]
    pub fn list() -> Vec<Controller> {
        ControllerStore::export()
            .into_iter()
            .map(|(principal, record)| Controller {
                principal,
                scope: record.scope,
                kind: record.kind,
                metadata: record.metadata,
                created_at: record.created_at,
                updated_at: record.updated_at,
                expires_at: record.expires_at,
            })
            .collect()
    }

    /// Remove every record whose expiry has passed.
    pub fn purge_expired(now: u64) -> usize {
        let expired = ControllerStore::collect_expired(now);
        let removed = Self::revoke(&expired);

        if removed > 0 {
            log!(Topic::Auth, Info, "purged {removed} expired controller(s)");
        }

        removed
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(scope: ControllerScope, expires_at: Option<u64>) -> ControllerGrant {
        ControllerGrant {
            scope,
            kind: ControllerKind::Manual,
            metadata: BTreeMap::new(),
            expires_at,
        }
    }

    fn p(id: u8) -> Principal {
        Principal::from_slice(&[id])
    }

    #[test]
    fn expired_records_do_not_count() {
        ControllerStore::reset_for_tests();
        ControllerOps::grant(&[p(1)], &grant(ControllerScope::Write, Some(100)), 0);

        assert!(ControllerOps::is_active(&p(1), 99));
        assert!(!ControllerOps::is_active(&p(1), 100));
        assert!(!ControllerOps::is_active(&p(2), 0));
    }

    #[test]
    fn only_admin_scope_is_admin() {
        ControllerStore::reset_for_tests();
        ControllerOps::grant(&[p(1)], &grant(ControllerScope::Write, None), 0);
        ControllerOps::grant(&[p(2)], &grant(ControllerScope::Admin, None), 0);

        assert!(!ControllerOps::is_admin(&p(1), 0));
        assert!(ControllerOps::is_admin(&p(2), 0));
    }

    #[test]
    fn regrant_keeps_created_at() {
        ControllerStore::reset_for_tests();
        ControllerOps::grant(&[p(1)], &grant(ControllerScope::Write, None), 5);
        ControllerOps::grant(&[p(1)], &grant(ControllerScope::Submit, None), 9);

        let listed = ControllerOps::list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].scope, ControllerScope::Submit);
        assert_eq!(listed[0].created_at, 5);
        assert_eq!(listed[0].updated_at, 9);
    }

    #[test]
    fn purge_removes_only_expired() {
        ControllerStore::reset_for_tests();
        ControllerOps::grant(&[p(1)], &grant(ControllerScope::Write, Some(10)), 0);
        ControllerOps::grant(&[p(2)], &grant(ControllerScope::Write, None), 0);

        assert_eq!(ControllerOps::purge_expired(20), 1);
        assert_eq!(ControllerOps::list().len(), 1);
        assert!(ControllerOps::is_active(&p(2), 20));
    }
}
