//! One-shot timers. Off-chain builds have no timer runtime, so they queue
//! timers in memory and tests run them by hand.

use std::{cell::RefCell, future::Future, thread::LocalKey, time::Duration};

#[cfg(target_arch = "wasm32")]
use crate::cdk::timers::{
    TimerId as RawTimerId, clear_timer as cdk_clear_timer, set_timer as cdk_set_timer,
};

#[cfg(not(target_arch = "wasm32"))]
type RawTimerId = u64;

///
/// TimerId
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimerId(RawTimerId);

///
/// TimerOps
///

pub struct TimerOps;

impl TimerOps {
    /// Schedule a one-shot timer.
    pub fn set(
        delay: Duration,
        label: impl Into<String>,
        task: impl Future<Output = ()> + 'static,
    ) -> TimerId {
        let label = label.into();
        let fired = label.clone();

        let task = async move {
            crate::log!(Debug, "timer fired: {fired}");
            task.await;
        };

        #[cfg(target_arch = "wasm32")]
        {
            let _ = label;
            TimerId(cdk_set_timer(delay, task))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            TimerId(host::push(delay, label, Box::pin(task)))
        }
    }

    pub fn clear(id: TimerId) {
        #[cfg(target_arch = "wasm32")]
        cdk_clear_timer(id.0);

        #[cfg(not(target_arch = "wasm32"))]
        host::remove(id.0);
    }

    /// Schedule a one-shot timer only if the slot is empty.
    /// Returns true when a new timer was scheduled.
    pub fn set_guarded(
        slot: &'static LocalKey<RefCell<Option<TimerId>>>,
        delay: Duration,
        label: impl Into<String>,
        task: impl Future<Output = ()> + 'static,
    ) -> bool {
        slot.with_borrow_mut(|entry| {
            if entry.is_some() {
                return false;
            }

            *entry = Some(Self::set(delay, label, task));
            true
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::{
        cell::{Cell, RefCell},
        collections::BTreeMap,
        future::Future,
        pin::Pin,
        time::Duration,
    };

    pub type Task = Pin<Box<dyn Future<Output = ()>>>;

    pub struct QueuedTimer {
        pub delay: Duration,
        pub label: String,
        pub task: Task,
    }

    thread_local! {
        static NEXT_ID: Cell<u64> = const { Cell::new(1) };
        pub static QUEUE: RefCell<BTreeMap<u64, QueuedTimer>> =
            const { RefCell::new(BTreeMap::new()) };
    }

    pub fn push(delay: Duration, label: String, task: Task) -> u64 {
        let id = NEXT_ID.replace(NEXT_ID.get() + 1);
        QUEUE.with_borrow_mut(|queue| queue.insert(id, QueuedTimer { delay, label, task }));

        id
    }

    pub fn remove(id: u64) -> Option<QueuedTimer> {
        QUEUE.with_borrow_mut(|queue| queue.remove(&id))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
impl TimerOps {
    /// Armed timers as `(id, delay, label)`, in arming order.
    pub(crate) fn queued_for_tests() -> Vec<(TimerId, Duration, String)> {
        host::QUEUE.with_borrow(|queue| {
            queue
                .iter()
                .map(|(id, timer)| (TimerId(*id), timer.delay, timer.label.clone()))
                .collect()
        })
    }

    /// Run an armed timer to completion, as if its delay had elapsed.
    pub(crate) fn fire_for_tests(id: TimerId) -> bool {
        // taken out first: the task may arm new timers
        let Some(timer) = host::remove(id.0) else {
            return false;
        };
        futures::executor::block_on(timer.task);

        true
    }

    pub(crate) fn reset_for_tests() {
        host::QUEUE.with_borrow_mut(std::collections::BTreeMap::clear);
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn queued_timer_runs_once_and_can_be_cleared() {
        TimerOps::reset_for_tests();
        let runs = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&runs);
        let first = TimerOps::set(Duration::from_secs(1), "first", async move {
            *counter.borrow_mut() += 1;
        });
        let second = TimerOps::set(Duration::from_secs(2), "second", async {});
        TimerOps::clear(second);

        let queued = TimerOps::queued_for_tests();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].1, Duration::from_secs(1));
        assert_eq!(queued[0].2, "first");

        assert!(TimerOps::fire_for_tests(first));
        assert!(!TimerOps::fire_for_tests(first));
        assert_eq!(*runs.borrow(), 1);
    }

    #[test]
    fn guarded_slot_holds_one_timer() {
        thread_local! {
            static SLOT: RefCell<Option<TimerId>> = const { RefCell::new(None) };
        }
        TimerOps::reset_for_tests();

        assert!(TimerOps::set_guarded(&SLOT, Duration::ZERO, "slot", async {}));
        assert!(!TimerOps::set_guarded(&SLOT, Duration::ZERO, "slot", async {}));
        assert_eq!(TimerOps::queued_for_tests().len(), 1);
    }
}
