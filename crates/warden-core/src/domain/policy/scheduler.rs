use crate::domain::policy::backoff::next_fire_delay;
use std::time::Duration;
use thiserror::Error as ThisError;
use warden_cdk::utils::time::duration_nanos;

///
/// SchedulerError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SchedulerError {
    #[error("monitoring is already running")]
    AlreadyRunning,

    #[error("monitoring is not running")]
    NotRunning,
}

///
/// SchedulerState
///
/// Per-provider certificate refresh state. `generation` changes on every
/// start so a fire that was in flight across a stop/start pair can tell its
/// timer has been superseded. The backoff level is not kept here: it is the
/// provider's consecutive fetch failure count, shared with the on-demand
/// cooldown.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SchedulerState {
    #[default]
    Stopped,
    Running { next_fire: u64, generation: u64 },
}

impl SchedulerState {
    /// Start monitoring with an immediate first fire.
    pub const fn start(self, now: u64, generation: u64) -> Result<Self, SchedulerError> {
        match self {
            Self::Running { .. } => Err(SchedulerError::AlreadyRunning),
            Self::Stopped => Ok(Self::Running {
                next_fire: now,
                generation,
            }),
        }
    }

    pub const fn stop(self) -> Result<Self, SchedulerError> {
        match self {
            Self::Running { .. } => Ok(Self::Stopped),
            Self::Stopped => Err(SchedulerError::NotRunning),
        }
    }

    /// Schedule the next fire after a fetch: the refresh interval when the
    /// last fetch succeeded, the backoff delay otherwise.
    #[must_use]
    pub fn rearm(self, now: u64, consecutive_failures: u32) -> Self {
        let delay = duration_nanos(next_fire_delay(consecutive_failures));

        match self {
            Self::Running { generation, .. } => Self::Running {
                next_fire: now.saturating_add(delay),
                generation,
            },
            Self::Stopped => self,
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    #[must_use]
    pub const fn generation(&self) -> Option<u64> {
        match self {
            Self::Running { generation, .. } => Some(*generation),
            Self::Stopped => None,
        }
    }

    #[must_use]
    pub const fn next_fire(&self) -> Option<u64> {
        match self {
            Self::Running { next_fire, .. } => Some(*next_fire),
            Self::Stopped => None,
        }
    }

    /// Time left until the next fire; zero if it is already due.
    #[must_use]
    pub const fn delay_from(&self, now: u64) -> Option<Duration> {
        match self {
            Self::Running { next_fire, .. } => {
                Some(Duration::from_nanos(next_fire.saturating_sub(now)))
            }
            Self::Stopped => None,
        }
    }
}

///
/// TESTS
///
