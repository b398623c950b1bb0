//! Deadline bookkeeping for an executor.
//!
//! Timers are registered once with a callback and fired explicitly by the
//! executor's run loop when their deadline is reached, so no thread ever busy
//! polls. Firing never runs the callback in place: the executor posts it as a
//! job.

use crate::error::WaitError;
use crate::runtime::guard::WorkGuard;

use std::time::{Duration, Instant};

/// Outcome delivered to a wait callback.
pub type WaitStatus = Result<(), WaitError>;

/// Callback stored alongside a registered deadline.
pub(crate) type WaitCallback = Box<dyn FnOnce(WaitStatus) + Send + 'static>;

/// Identifies a registered timer so it can be cancelled before it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TimerId(u64);

struct Entry {
    id: TimerId,
    deadline: Instant,
    callback: WaitCallback,
    // Keeps the executor running while the timer is pending.
    work: WorkGuard,
}

/// A timer removed from the driver together with the work it was holding.
pub(crate) struct Removed {
    pub(crate) callback: WaitCallback,
    pub(crate) work: WorkGuard,
}

/// Manages registered timers and hands back those whose deadline is reached.
pub(crate) struct TimerDriver {
    timers: Vec<Entry>,
    next_id: u64,
    closed: bool,
}

impl TimerDriver {
    pub(crate) fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 1,
            closed: false,
        }
    }

    /// Registers a new timer with the given deadline and callback.
    ///
    /// A closed driver hands the callback and its work back unregistered.
    pub(crate) fn register(
        &mut self,
        deadline: Instant,
        callback: WaitCallback,
        work: WorkGuard,
    ) -> Result<TimerId, Removed> {
        if self.closed {
            return Err(Removed { callback, work });
        }

        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);

        self.timers.push(Entry {
            id,
            deadline,
            callback,
            work,
        });

        Ok(id)
    }

    /// Removes a pending timer without firing it.
    ///
    /// Returns `None` when the timer already fired or was cancelled.
    pub(crate) fn cancel(&mut self, id: TimerId) -> Option<Removed> {
        let index = self.timers.iter().position(|entry| entry.id == id)?;
        let entry = self.timers.swap_remove(index);

        Some(Removed {
            callback: entry.callback,
            work: entry.work,
        })
    }

    /// Removes and returns every timer whose deadline has passed, earliest
    /// deadline first.
    pub(crate) fn take_expired(&mut self, now: Instant) -> Vec<Removed> {
        let (mut expired, pending): (Vec<Entry>, Vec<Entry>) = self
            .timers
            .drain(..)
            .partition(|entry| entry.deadline <= now);

        self.timers = pending;
        expired.sort_by_key(|entry| (entry.deadline, entry.id.0));

        expired
            .into_iter()
            .map(|entry| Removed {
                callback: entry.callback,
                work: entry.work,
            })
            .collect()
    }

    /// Removes every timer and refuses later registrations.
    pub(crate) fn close(&mut self) -> Vec<Removed> {
        self.closed = true;

        self.timers
            .drain(..)
            .map(|entry| Removed {
                callback: entry.callback,
                work: entry.work,
            })
            .collect()
    }

    /// Returns the time remaining until the next timer deadline, if any.
    pub(crate) fn next_remaining(&self, now: Instant) -> Option<Duration> {
        self.timers
            .iter()
            .map(|entry| entry.deadline.saturating_duration_since(now))
            .min()
    }

    pub(crate) fn contains(&self, id: TimerId) -> bool {
        self.timers.iter().any(|entry| entry.id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.timers.len()
    }
}
