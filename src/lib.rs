//! Composed asynchronous operations on a minimal event-driven runtime.
//!
//! The centrepiece is [`start_wait`]: a composed operation that waits on a
//! cancellable resource and reports `(error, succeeded)`, treating
//! cancellation as a normal outcome rather than an error. It works with any
//! completion token (a callback, a future or a lazily started awaitable) and
//! always delivers its result by posting to the right executor.
//!
//! # Architecture
//!
//! - **Runtime**: runs posted jobs, tasks and timers via `block_on` or `run`
//! - **Executor**: cloneable handle used to post work and hold work guards
//! - **WorkGuard**: keeps an executor from running out of work while held
//! - **WaitTimer**: cancellable steady timer, the canonical waitable resource
//! - **ManualWait**: hand-triggered waitable resource for tests and bridging
//! - **op**: the composed wait state machine, completion dispatch, handlers
//!   and tokens
//! - **RuntimeBuilder**: fluent builder configuring worker threads

mod builder;
pub mod error;
pub mod op;
pub mod resource;
mod runtime;
mod task;
pub mod time;
mod timer;

pub use builder::RuntimeBuilder;
pub use error::{Abandoned, InvalidTransition, WaitError};
pub use op::{
    Awaitable, Bound, CompletionHandler, CompletionToken, OpFuture, UseAwaitable, UseFuture,
    WaitResult, bind_executor, start_wait,
};
pub use resource::{ManualWait, WaitableResource};
pub use runtime::{Executor, Runtime, WorkGuard};
pub use task::{JoinHandle, JoinSet, Task};
pub use timer::WaitStatus;
