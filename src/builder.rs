//! Fluent builder for Runtime construction.
//!
//! Provides a builder pattern interface for creating and configuring Runtime
//! instances.

use crate::runtime::Runtime;

use std::io;

const DEFAULT_THREAD_NAME: &str = "reactor-worker";

/// Builder for constructing Runtime instances with fluent API.
///
/// # Example
/// ```ignore
/// let rt = RuntimeBuilder::new().worker_threads(4).build()?;
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    worker_threads: usize,
    thread_name: String,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBuilder {
    /// Creates a builder for a single-threaded runtime.
    pub fn new() -> Self {
        Self {
            worker_threads: 1,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }

    /// Total number of threads servicing the runtime, the thread calling
    /// `block_on`/`run` included. `0` is treated as `1`.
    ///
    /// A job that panics on a background worker is logged at error level and
    /// the worker keeps running. A panic on the calling thread propagates out
    /// of `block_on`/`run` as usual.
    pub fn worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads.max(1);
        self
    }

    /// Name prefix for background worker threads.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Builds the runtime, starting its background workers.
    ///
    /// # Errors
    /// Fails if a worker thread cannot be spawned.
    pub fn build(self) -> io::Result<Runtime> {
        Runtime::with_workers(self.worker_threads, &self.thread_name)
    }
}
