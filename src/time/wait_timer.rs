//! Cancellable steady timer.
//!
//! A [`WaitTimer`] holds one expiry instant and lets any number of waits be
//! started against it. Each wait completes once: with `Ok(())` when the
//! expiry passes, or with [`WaitError::OperationAborted`] when the timer is
//! cancelled or re-armed first. Every completion is posted to the timer's
//! executor, never run from inside `cancel` or the firing loop.
//!
//! # Example
//!
//! ```ignore
//! use reactor_compose::{Runtime, time::WaitTimer};
//! use std::time::Duration;
//!
//! let rt = Runtime::new();
//! let timer = WaitTimer::with_duration(rt.executor(), Duration::from_millis(10));
//! timer.async_wait(|status| println!("timer finished: {status:?}"));
//! rt.run();
//! ```

use crate::error::WaitError;
use crate::resource::WaitableResource;
use crate::runtime::Executor;
use crate::timer::{TimerId, WaitStatus};

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// A steady-clock timer whose waits can be cancelled.
///
/// Dropping the timer cancels its pending waits with
/// [`WaitError::ResourceDropped`].
pub struct WaitTimer {
    executor: Executor,
    expiry: Instant,
    pending: Mutex<Vec<TimerId>>,
}

impl WaitTimer {
    /// Creates a timer that is already expired.
    pub fn new(executor: &Executor) -> Self {
        Self::at(executor, Instant::now())
    }

    /// Creates a timer expiring `duration` from now.
    pub fn with_duration(executor: &Executor, duration: Duration) -> Self {
        Self::at(executor, Instant::now() + duration)
    }

    /// Creates a timer expiring at `expiry`.
    pub fn at(executor: &Executor, expiry: Instant) -> Self {
        Self {
            executor: executor.clone(),
            expiry,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Vec<TimerId>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn expiry(&self) -> Instant {
        self.expiry
    }

    /// Re-arms the timer to expire `duration` from now, cancelling pending
    /// waits. Returns how many were cancelled.
    pub fn expires_after(&mut self, duration: Duration) -> usize {
        self.expires_at(Instant::now() + duration)
    }

    /// Re-arms the timer to expire at `expiry`, cancelling pending waits.
    /// Returns how many were cancelled.
    pub fn expires_at(&mut self, expiry: Instant) -> usize {
        let cancelled = self.cancel();
        self.expiry = expiry;

        cancelled
    }

    /// Cancels every pending wait. Each one completes with
    /// [`WaitError::OperationAborted`] from a freshly posted job.
    ///
    /// Waits whose expiry already fired are not affected. Returns how many
    /// waits were cancelled.
    pub fn cancel(&self) -> usize {
        self.cancel_with(WaitError::OperationAborted)
    }

    fn cancel_with(&self, error: WaitError) -> usize {
        let ids: Vec<TimerId> = self.pending().drain(..).collect();
        let mut cancelled = 0;

        for id in ids {
            if let Some(removed) = self.executor.cancel_timer(id) {
                let callback = removed.callback;
                let status = Err(error.clone());

                self.executor.post(move || callback(status));
                drop(removed.work);

                cancelled += 1;
            }
        }

        if cancelled > 0 {
            tracing::debug!(executor = self.executor.id(), cancelled, %error, "timer waits cancelled");
        }

        cancelled
    }

    /// Starts a wait, invoking `handler` on the timer's executor once it
    /// expires or is cancelled.
    ///
    /// If the timer's runtime has already been dropped, `handler` is dropped
    /// without being invoked.
    pub fn async_wait<F>(&self, handler: F)
    where
        F: FnOnce(WaitStatus) + Send + 'static,
    {
        let mut pending = self.pending();
        pending.retain(|id| self.executor.has_timer(*id));

        if let Some(id) = self.executor.register_timer(self.expiry, Box::new(handler)) {
            pending.push(id);
        }
    }
}

impl WaitableResource for WaitTimer {
    fn executor(&self) -> Executor {
        self.executor.clone()
    }

    fn begin_wait<F>(&self, callback: F)
    where
        F: FnOnce(WaitStatus) + Send + 'static,
    {
        self.async_wait(callback);
    }
}

impl Drop for WaitTimer {
    fn drop(&mut self) {
        self.cancel_with(WaitError::ResourceDropped);
    }
}

impl fmt::Debug for WaitTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitTimer")
            .field("executor", &self.executor)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}
