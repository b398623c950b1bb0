//! Thread-safe job queue shared by every thread servicing an executor.
//!
//! Provides a FIFO queue that allows posting jobs to be executed and popping
//! them for execution, plus a condition variable idle threads park on.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A unit of work posted to an executor.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// A thread-safe, FIFO queue for storing posted jobs.
///
/// Uses a Mutex-wrapped VecDeque to allow safe concurrent access from multiple
/// threads. Jobs are pushed by `Executor::post` and popped by whichever thread
/// is currently running the executor.
pub(crate) struct TaskQueue {
    jobs: Mutex<VecDeque<Job>>,
    ready: Condvar,
    shutdown: AtomicBool,
    closed: AtomicBool,
}

impl TaskQueue {
    pub(crate) fn new() -> Self {
        Self {
            jobs: Mutex::new(VecDeque::new()),
            ready: Condvar::new(),
            shutdown: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Job>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueues a job and wakes one parked thread.
    ///
    /// Once the queue is closed the job is handed back instead; the caller
    /// drops it after the lock is released.
    pub(crate) fn push(&self, job: Job) -> Result<(), Job> {
        let mut jobs = self.lock();

        if self.closed.load(Ordering::SeqCst) {
            return Err(job);
        }

        jobs.push_back(job);
        self.ready.notify_one();

        Ok(())
    }

    /// Dequeues the next job, if any.
    pub(crate) fn pop(&self) -> Option<Job> {
        self.lock().pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Refuses every later push and hands back the jobs still queued.
    pub(crate) fn close(&self) -> Vec<Job> {
        let mut jobs = self.lock();
        self.closed.store(true, Ordering::SeqCst);

        jobs.drain(..).collect()
    }

    /// Wakes every parked thread so it can re-check its exit condition.
    ///
    /// Takes the lock first so a thread that is between its check and its
    /// wait cannot miss the notification.
    pub(crate) fn notify_all(&self) {
        let _jobs = self.lock();
        self.ready.notify_all();
    }

    /// Parks the calling thread until a job is queued, `wake_now` turns true,
    /// or the timeout computed by `timeout` elapses.
    ///
    /// Both closures run with the queue lock held.
    pub(crate) fn park(
        &self,
        wake_now: impl Fn() -> bool,
        timeout: impl FnOnce() -> Option<Duration>,
    ) {
        let jobs = self.lock();

        if !jobs.is_empty() || wake_now() || self.is_shutdown() {
            return;
        }

        match timeout() {
            Some(duration) if duration.is_zero() => {}
            Some(duration) => {
                drop(
                    self.ready
                        .wait_timeout(jobs, duration)
                        .unwrap_or_else(PoisonError::into_inner),
                );
            }
            None => {
                drop(self.ready.wait(jobs).unwrap_or_else(PoisonError::into_inner));
            }
        }
    }

    /// Signals the worker threads to shut down.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.notify_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn park_waits_out_its_timeout() {
        let queue = TaskQueue::new();
        let start = Instant::now();

        queue.park(|| false, || Some(Duration::from_millis(20)));

        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn park_wakes_on_push() {
        let queue = Arc::new(TaskQueue::new());
        let pusher = queue.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            pusher.push(Box::new(|| {})).unwrap_or_else(|_| panic!("queue closed"));
        });

        while queue.pop().is_none() {
            queue.park(|| false, || None);
        }

        handle.join().unwrap();
    }

    #[test]
    fn closed_queue_hands_jobs_back() {
        let queue = TaskQueue::new();
        queue.push(Box::new(|| {})).unwrap_or_else(|_| panic!("queue closed"));

        assert_eq!(queue.close().len(), 1);
        assert!(queue.push(Box::new(|| {})).is_err());
        assert_eq!(queue.len(), 0);
    }
}
