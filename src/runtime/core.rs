//! Async runtime that executes futures, posted jobs and timers.
//!
//! The runtime owns one [`Executor`] and, optionally, background worker
//! threads servicing it. The calling thread joins in whenever it enters
//! [`Runtime::block_on`] or [`Runtime::run`].

use crate::builder::RuntimeBuilder;
use crate::runtime::context::enter_context;
use crate::runtime::driver::Driver;
use crate::runtime::executor::Executor;
use crate::runtime::waker::MainWaker;
use crate::task::JoinHandle;

use std::future::Future;
use std::io;
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

/// Main async runtime for executing futures.
pub struct Runtime {
    executor: Executor,
    driver: Option<Driver>,
}

impl Runtime {
    /// Creates a single-threaded runtime: work only runs while the calling
    /// thread is inside `block_on` or `run`.
    ///
    /// # Example
    /// ```ignore
    /// let rt = Runtime::new();
    /// ```
    pub fn new() -> Self {
        Self {
            executor: Executor::new(),
            driver: None,
        }
    }

    /// Returns a builder for configuring worker threads.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub(crate) fn with_workers(worker_threads: usize, thread_name: &str) -> io::Result<Self> {
        let executor = Executor::new();
        let background = worker_threads.saturating_sub(1);

        let driver = if background > 0 {
            Some(Driver::start(&executor, background, thread_name)?)
        } else {
            None
        };

        Ok(Self { executor, driver })
    }

    /// Handle to this runtime's execution context.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Number of background worker threads.
    pub fn background_workers(&self) -> usize {
        self.driver.as_ref().map_or(0, Driver::len)
    }

    /// Spawns a background task to be executed concurrently.
    ///
    /// # Example
    /// ```ignore
    /// let handle = rt.spawn(async { 7 });
    /// assert_eq!(rt.block_on(handle), 7);
    /// ```
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.executor.spawn(future)
    }

    /// Blocks until the given future completes, running jobs and timers along
    /// the way.
    ///
    /// The future itself is polled on the calling thread and does not need to
    /// be `Send`. Once it is ready, jobs already queued are drained before
    /// returning; timers and other pending work are left for later.
    ///
    /// # Example
    /// ```ignore
    /// let result = rt.block_on(async { 42 });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        let executor = &self.executor;

        enter_context(executor, || {
            let mut future = pin!(future);

            let main = MainWaker::new(executor.clone());
            let waker = Waker::from(Arc::clone(&main));
            let mut cx = Context::from_waker(&waker);

            loop {
                if main.take_notified()
                    && let Poll::Ready(value) = future.as_mut().poll(&mut cx)
                {
                    while executor.run_one() {}
                    return value;
                }

                if executor.run_one() {
                    continue;
                }

                executor.park(|| main.is_notified());
            }
        })
    }

    /// Runs jobs and timers until the executor has no outstanding work.
    ///
    /// Outstanding work is any queued job, any pending timer and any live
    /// [`WorkGuard`](crate::WorkGuard). Returns the number of jobs this thread
    /// executed.
    pub fn run(&self) -> usize {
        let executor = &self.executor;

        tracing::debug!(executor = executor.id(), "runtime run started");

        let executed = enter_context(executor, || {
            let mut executed = 0;

            loop {
                if executor.run_one() {
                    executed += 1;
                    continue;
                }

                if executor.outstanding_work() == 0 {
                    break executed;
                }

                executor.park(|| executor.outstanding_work() == 0);
            }
        });

        tracing::debug!(executor = executor.id(), executed, "runtime run finished");

        executed
    }

    /// Runs every job that is ready right now without waiting for timers.
    ///
    /// Returns the number of jobs executed.
    pub fn poll(&self) -> usize {
        enter_context(&self.executor, || {
            let mut executed = 0;

            while self.executor.run_one() {
                executed += 1;
            }

            executed
        })
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            driver.stop();
        }

        // Queued jobs and timers hold executor handles; nothing may be queued
        // once no thread services the executor.
        self.executor.close();
    }
}
