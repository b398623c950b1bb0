//! Background worker threads servicing an executor.
//!
//! A runtime built with more than one worker thread starts the extra workers
//! here. Each worker installs the executor as its current context and keeps
//! draining jobs and firing timers until the runtime shuts down, so posted
//! completions may run on any of them. A job that panics is logged and
//! dropped; the worker carries on with the next one.

use crate::runtime::context::enter_context;
use crate::runtime::executor::Executor;

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

pub(crate) struct Driver {
    executor: Executor,
    workers: Vec<JoinHandle<()>>,
}

impl Driver {
    /// Starts `count` worker threads for `executor`.
    pub(crate) fn start(executor: &Executor, count: usize, thread_name: &str) -> io::Result<Self> {
        let mut workers = Vec::with_capacity(count);

        for index in 0..count {
            let worker_executor = executor.clone();
            let handle = thread::Builder::new()
                .name(format!("{thread_name}-{index}"))
                .spawn(move || worker_loop(worker_executor))?;

            workers.push(handle);
        }

        tracing::debug!(executor = executor.id(), workers = count, "runtime workers started");

        Ok(Self {
            executor: executor.clone(),
            workers,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.workers.len()
    }

    /// Stops and joins every worker.
    pub(crate) fn stop(&mut self) {
        if self.workers.is_empty() {
            return;
        }

        self.executor.shutdown();

        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::error!(executor = self.executor.id(), "runtime worker panicked");
            }
        }

        tracing::debug!(executor = self.executor.id(), "runtime workers stopped");
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(executor: Executor) {
    enter_context(&executor, || {
        while !executor.is_shutdown() {
            match panic::catch_unwind(AssertUnwindSafe(|| executor.run_one())) {
                Ok(true) => continue,
                Ok(false) => executor.park(|| false),
                // The job's own guards were released while unwinding.
                Err(_) => {
                    let worker = thread::current();

                    tracing::error!(
                        executor = executor.id(),
                        worker = worker.name().unwrap_or("unnamed"),
                        "job panicked on runtime worker"
                    );
                }
            }
        }
    });
}
