//! Executor handle: the execution context jobs, tasks and timers run on.
//!
//! An [`Executor`] is a cheap, cloneable handle onto the state shared by every
//! thread servicing one runtime: the job queue, the timer driver and the
//! outstanding-work counter. Anything that needs to schedule work later keeps
//! a clone; nothing here ever runs a job inline from `post`.

use crate::runtime::context::{current_executor, enter_context};
use crate::runtime::guard::WorkGuard;
use crate::runtime::queue::TaskQueue;
use crate::task::{JoinHandle, Task};
use crate::timer::{Removed, TimerDriver, TimerId, WaitCallback};

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

static NEXT_EXECUTOR_ID: AtomicUsize = AtomicUsize::new(1);

struct Shared {
    id: usize,
    queue: TaskQueue,
    timers: Mutex<TimerDriver>,
    work: AtomicUsize,
}

/// Handle to a runtime's execution context.
///
/// Two handles compare equal when they refer to the same runtime.
#[derive(Clone)]
pub struct Executor {
    shared: Arc<Shared>,
}

impl Executor {
    pub(crate) fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                id: NEXT_EXECUTOR_ID.fetch_add(1, Ordering::Relaxed),
                queue: TaskQueue::new(),
                timers: Mutex::new(TimerDriver::new()),
                work: AtomicUsize::new(0),
            }),
        }
    }

    /// Returns the executor the calling thread is currently running, if any.
    pub fn current() -> Option<Self> {
        current_executor()
    }

    /// Returns `true` when the calling thread is running this executor.
    pub fn running_in_this_thread(&self) -> bool {
        current_executor().is_some_and(|current| current == *self)
    }

    /// Schedules `job` to run on this executor.
    ///
    /// The job always runs later, from the executor's own run loop, even when
    /// called from a thread that is already running this executor.
    pub fn post<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let work = WorkGuard::new(self);

        let pushed = self.shared.queue.push(Box::new(move || {
            job();
            drop(work);
        }));

        match pushed {
            Ok(()) => tracing::trace!(executor = self.shared.id, "job posted"),
            Err(job) => {
                tracing::trace!(executor = self.shared.id, "job discarded, executor closed");
                drop(job);
            }
        }
    }

    /// Spawns a future onto this executor and returns a handle to its output.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        Task::spawn_on(self, future)
    }

    /// Creates a [`WorkGuard`] bound to this executor.
    pub fn work_guard(&self) -> WorkGuard {
        WorkGuard::new(self)
    }

    /// Number of queued jobs, pending timers and live work guards.
    pub fn outstanding_work(&self) -> usize {
        self.shared.work.load(Ordering::SeqCst)
    }

    pub(crate) fn id(&self) -> usize {
        self.shared.id
    }

    pub(crate) fn work_started(&self) {
        self.shared.work.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn work_finished(&self) {
        if self.shared.work.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Let `Runtime::run` notice it is out of work.
            self.shared.queue.notify_all();
        }
    }

    fn timers(&self) -> MutexGuard<'_, TimerDriver> {
        self.shared
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `callback` to be posted with `Ok(())` once `deadline` passes.
    ///
    /// Returns `None` and drops `callback` unrun when the executor is closed.
    pub(crate) fn register_timer(
        &self,
        deadline: Instant,
        callback: WaitCallback,
    ) -> Option<TimerId> {
        let work = WorkGuard::new(self);
        let registered = self.timers().register(deadline, callback, work);

        match registered {
            Ok(id) => {
                // Parked threads may be sleeping past the new deadline.
                self.shared.queue.notify_all();

                tracing::trace!(executor = self.shared.id, timer = ?id, "timer registered");
                Some(id)
            }
            Err(rejected) => {
                tracing::trace!(executor = self.shared.id, "timer discarded, executor closed");
                drop(rejected);
                None
            }
        }
    }

    /// Removes a pending timer; `None` when it already fired.
    pub(crate) fn cancel_timer(&self, id: TimerId) -> Option<Removed> {
        self.timers().cancel(id)
    }

    pub(crate) fn has_timer(&self, id: TimerId) -> bool {
        self.timers().contains(id)
    }

    /// Number of registered timers that have not fired or been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers().len()
    }

    /// Number of posted jobs waiting to run.
    pub fn queued_jobs(&self) -> usize {
        self.shared.queue.len()
    }

    fn fire_expired_timers(&self) {
        let expired = self.timers().take_expired(Instant::now());

        for Removed { callback, work } in expired {
            tracing::trace!(executor = self.shared.id, "timer expired");

            self.post(move || callback(Ok(())));
            drop(work);
        }
    }

    /// Fires expired timers, then runs at most one queued job.
    ///
    /// Returns `true` if a job ran.
    pub(crate) fn run_one(&self) -> bool {
        self.fire_expired_timers();

        match self.shared.queue.pop() {
            Some(job) => {
                enter_context(self, job);
                true
            }
            None => false,
        }
    }

    /// Parks the calling thread until there may be something to do.
    pub(crate) fn park(&self, wake_now: impl Fn() -> bool) {
        self.shared
            .queue
            .park(wake_now, || self.timers().next_remaining(Instant::now()));
    }

    /// Wakes every parked thread so it re-checks its exit condition.
    pub(crate) fn unpark_all(&self) {
        self.shared.queue.notify_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shared.queue.is_shutdown()
    }

    pub(crate) fn shutdown(&self) {
        self.shared.queue.shutdown();
    }

    /// Closes the executor: queued jobs and pending timers are dropped
    /// without running, and anything posted or registered later is dropped
    /// on the spot.
    ///
    /// Handlers dropped this way are never invoked, so futures waiting on
    /// them resolve to [`Abandoned`](crate::Abandoned).
    pub(crate) fn close(&self) {
        let timers = self.timers().close();
        let jobs = self.shared.queue.close();

        tracing::debug!(
            executor = self.shared.id,
            timers = timers.len(),
            jobs = jobs.len(),
            "executor closed"
        );

        drop(timers);
        drop(jobs);
    }
}

impl PartialEq for Executor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Eq for Executor {}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("id", &self.shared.id)
            .field("outstanding_work", &self.outstanding_work())
            .finish()
    }
}
