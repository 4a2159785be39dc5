use crate::registry::{
    MemoryRange, MemoryRegistry, MemoryRegistryEntry, MemoryRegistryError, drain_pending_ranges,
    drain_pending_registrations,
};
use std::cell::RefCell;

// -----------------------------------------------------------------------------
// EAGER_TLS
// -----------------------------------------------------------------------------
// `fn()` pointers registered by `eager_static!`. Each one touches a
// thread_local so stable structures claim their memory in a fixed order
// before any entry point runs.
// -----------------------------------------------------------------------------

thread_local! {
    static EAGER_TLS: RefCell<Vec<fn()>> = const { RefCell::new(Vec::new()) };
}

/// Run every deferred TLS initializer exactly once and clear the queue.
///
/// The queue is taken before any initializer runs, so initializers that
/// register more work are picked up by the next call.
pub fn init_eager_tls() {
    let funcs = EAGER_TLS.with_borrow_mut(std::mem::take);

    for f in funcs {
        f();
    }
}

/// Queue a TLS initializer. Called by `eager_static!`.
pub fn defer_tls_initializer(f: fn()) {
    EAGER_TLS.with_borrow_mut(|v| v.push(f));
}

///
/// MemorySummary
/// Registry state after initialization, for logging.
///

#[derive(Debug)]
pub struct MemorySummary {
    pub ranges: Vec<(String, MemoryRange)>,
    pub entries: Vec<(u8, MemoryRegistryEntry)>,
}

///
/// MemoryRuntime
///

pub struct MemoryRuntime;

impl MemoryRuntime {
    /// Bring stable memory up: apply queued range reservations and id
    /// registrations (sorted, so conflicts are reported deterministically),
    /// then run the eager TLS initializers.
    pub fn init(initial_range: Option<(&str, u8, u8)>) -> Result<MemorySummary, MemoryRegistryError> {
        if let Some((crate_name, start, end)) = initial_range {
            MemoryRegistry::reserve_range(crate_name, start, end)?;
        }

        let mut ranges = drain_pending_ranges();
        ranges.sort_by_key(|(_, start, _)| *start);
        for (crate_name, start, end) in ranges {
            MemoryRegistry::reserve_range(&crate_name, start, end)?;
        }

        init_eager_tls();

        let mut regs = drain_pending_registrations();
        regs.sort_by_key(|(id, _, _)| *id);
        for (id, crate_name, label) in regs {
            MemoryRegistry::register(id, &crate_name, &label)?;
        }

        Ok(MemorySummary {
            ranges: MemoryRegistry::export_ranges(),
            entries: MemoryRegistry::export(),
        })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{defer_register, defer_reserve_range, reset_for_tests};
    use std::cell::Cell;

    thread_local! {
        static COUNT: Cell<u32> = const { Cell::new(0) };
    }

    fn bump() {
        COUNT.with(|c| c.set(c.get() + 1));
    }

    #[test]
    fn init_eager_tls_runs_once_and_clears_queue() {
        COUNT.with(|c| c.set(0));
        defer_tls_initializer(bump);

        init_eager_tls();
        init_eager_tls();

        assert_eq!(COUNT.with(Cell::get), 1);
    }

    #[test]
    fn init_applies_pending_ranges_and_registrations() {
        reset_for_tests();
        defer_reserve_range("auth", 30, 40);
        defer_register(31, "auth", "Sessions");

        let summary = MemoryRuntime::init(Some(("warden-core", 1, 20))).unwrap();

        assert_eq!(summary.ranges.len(), 2);
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[0].0, 31);
    }

    #[test]
    fn init_reports_conflicting_ranges() {
        reset_for_tests();
        defer_reserve_range("a", 1, 3);
        defer_reserve_range("b", 3, 4);

        let err = MemoryRuntime::init(None).unwrap_err();
        assert!(matches!(err, MemoryRegistryError::Overlap { .. }));
    }
}
