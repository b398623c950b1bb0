//! Task wrapper that combines futures with waker integration.
//!
//! A task encapsulates a future and re-posts itself onto its executor whenever
//! its waker fires. Tasks are spawned either on an explicit executor
//! ([`Executor::spawn`](crate::Executor::spawn)) or on the executor the calling
//! thread is currently running ([`Task::spawn`]).
//!
//! # Join Handles
//!
//! Spawning returns a [`JoinHandle`] that can be awaited for the output:
//!
//! ```ignore
//! use reactor_compose::Task;
//!
//! async fn wait_example() {
//!     let handle = Task::spawn(async { 42 });
//!     assert_eq!(handle.await, 42);
//! }
//! ```
//!
//! # How Tasks Work
//!
//! 1. A future is wrapped in a [`Task`]
//! 2. The task posts a job that polls it onto its executor
//! 3. When the future yields `Poll::Pending`, it's stored for later
//! 4. When a timer or a completion wakes it, the waker posts it again
//! 5. The task is polled again and can make progress

use crate::runtime::context::current_executor;
use crate::runtime::executor::Executor;
use crate::runtime::waker::make_waker;

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};

type BoxedFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A spawned task that wraps a future and supports generic output.
///
/// # Internals
///
/// - `future`: the wrapped future, `None` once it completed
/// - `result`: stores the output value until the join handle takes it
/// - `executor`: where the task is re-posted when woken
/// - `scheduled`: set while a poll job for this task is queued
/// - `completed`: set once the output is available
/// - `waiters`: wakers of join handles waiting for the output
pub struct Task<T> {
    future: Mutex<Option<BoxedFuture<T>>>,
    result: Mutex<Option<T>>,
    executor: Executor,
    scheduled: AtomicBool,
    completed: AtomicBool,
    waiters: Mutex<Vec<Waker>>,
}

impl<T: Send + 'static> Task<T> {
    fn new<F>(future: F, executor: Executor) -> Arc<Self>
    where
        F: Future<Output = T> + Send + 'static,
    {
        Arc::new(Task {
            future: Mutex::new(Some(Box::pin(future))),
            result: Mutex::new(None),
            executor,
            scheduled: AtomicBool::new(false),
            completed: AtomicBool::new(false),
            waiters: Mutex::new(Vec::new()),
        })
    }

    /// Polls the task's future once.
    ///
    /// If the future is pending it is stored back for later polling. If it is
    /// ready, the output is stored and every waiting join handle is woken.
    fn poll(self: &Arc<Self>) {
        self.scheduled.store(false, Ordering::SeqCst);

        let runnable: Arc<dyn Runnable> = self.clone();
        let waker = make_waker(runnable);
        let mut context = Context::from_waker(&waker);

        let mut future_slot = lock(&self.future);

        if let Some(mut future) = future_slot.take() {
            match future.as_mut().poll(&mut context) {
                Poll::Pending => {
                    *future_slot = Some(future);
                }
                Poll::Ready(value) => {
                    drop(future_slot);

                    *lock(&self.result) = Some(value);
                    self.completed.store(true, Ordering::SeqCst);

                    for waiter in lock(&self.waiters).drain(..) {
                        waiter.wake();
                    }
                }
            }
        }
    }

    /// Spawns a task on the executor the calling thread is running.
    ///
    /// Must be called from within a runtime context: inside
    /// [`Runtime::block_on`], [`Runtime::run`], or another task.
    ///
    /// # Panics
    /// Panics if called outside of a runtime context.
    ///
    /// [`Runtime::block_on`]: crate::Runtime::block_on
    /// [`Runtime::run`]: crate::Runtime::run
    pub fn spawn<F>(future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let executor =
            current_executor().expect("Task::spawn() called outside of a runtime context");

        Self::spawn_on(&executor, future)
    }

    pub(crate) fn spawn_on<F>(executor: &Executor, future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let task = Task::new(future, executor.clone());
        task.clone().schedule();

        JoinHandle { task }
    }
}

/// Implemented by tasks so wakers can re-post them without knowing `T`.
pub(crate) trait Runnable: Send + Sync {
    fn schedule(self: Arc<Self>);
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn schedule(self: Arc<Self>) {
        if self.completed.load(Ordering::SeqCst) || self.scheduled.swap(true, Ordering::SeqCst) {
            return;
        }

        let executor = self.executor.clone();
        executor.post(move || self.poll());
    }
}

/// A future that resolves to the output of a spawned task.
pub struct JoinHandle<T> {
    task: Arc<Task<T>>,
}

impl<T> JoinHandle<T> {
    /// Returns `true` once the task has produced its output.
    pub fn is_finished(&self) -> bool {
        self.task.completed.load(Ordering::SeqCst)
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut waiters = lock(&self.task.waiters);

        if self.task.completed.load(Ordering::SeqCst) {
            drop(waiters);

            if let Some(result) = lock(&self.task.result).take() {
                return Poll::Ready(result);
            }

            // Output already taken by an earlier poll.
            return Poll::Pending;
        }

        waiters.push(cx.waker().clone());

        Poll::Pending
    }
}

/// A helper to collect multiple [`JoinHandle`]s and await all of them at once.
pub struct JoinSet<T> {
    handles: Vec<JoinHandle<T>>,
}

impl<T> JoinSet<T> {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    pub fn push(&mut self, handle: JoinHandle<T>) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Awaits every handle in insertion order and collects their outputs.
    pub async fn await_all(&mut self) -> Vec<T> {
        let mut outputs = Vec::with_capacity(self.handles.len());

        for handle in self.handles.drain(..) {
            outputs.push(handle.await);
        }

        outputs
    }
}

impl<T> Default for JoinSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
