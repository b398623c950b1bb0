//! Scoped keep-alive tokens for an executor.
//!
//! A [`WorkGuard`] raises its executor's outstanding-work count for as long as
//! it lives. [`Runtime::run`](crate::Runtime::run) only returns once that count
//! drops to zero, so an operation holding a guard can rely on the executor
//! still being serviced when its completion is posted.
//!
//! ```ignore
//! let rt = Runtime::new();
//! let guard = rt.executor().work_guard();
//! assert_eq!(rt.executor().outstanding_work(), 1);
//! drop(guard);
//! assert_eq!(rt.executor().outstanding_work(), 0);
//! ```

use crate::runtime::executor::Executor;

/// Keeps an [`Executor`] from running out of work while held.
///
/// The binding is released exactly once: either by [`WorkGuard::reset`] or by
/// dropping the guard, whichever happens first.
#[derive(Debug)]
pub struct WorkGuard {
    executor: Option<Executor>,
}

impl WorkGuard {
    /// Binds a new guard to `executor`.
    pub fn new(executor: &Executor) -> Self {
        executor.work_started();

        Self {
            executor: Some(executor.clone()),
        }
    }

    /// The executor this guard is bound to, unless it was already reset.
    pub fn executor(&self) -> Option<&Executor> {
        self.executor.as_ref()
    }

    pub fn owns_work(&self) -> bool {
        self.executor.is_some()
    }

    /// Releases the binding early. Calling it again is a no-op.
    pub fn reset(&mut self) {
        if let Some(executor) = self.executor.take() {
            executor.work_finished();
        }
    }
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        self.reset();
    }
}
