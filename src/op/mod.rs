//! The composed wait operation and its completion machinery.
//!
//! - [`initiate`]: [`start_wait`], the generic entry point
//! - [`state`]: the state machine driving one operation
//! - [`dispatch`]: posting the final result to the handler's executor
//! - [`handler`]: completion handlers and executor binding
//! - [`token`]: completion tokens (callback, future, awaitable)

pub mod dispatch;
pub mod handler;
pub mod initiate;
pub mod state;
pub mod token;

use crate::error::WaitError;

/// Result of a composed wait: `(error, succeeded)`.
///
/// `error` is only set when the wait failed for a reason other than
/// cancellation.
pub type WaitResult = (Option<WaitError>, bool);

pub use dispatch::post_completion;
pub use handler::{Bound, CompletionHandler, Promise, bind_executor};
pub use initiate::{WaitInitiation, start_wait};
pub use token::{Awaitable, CompletionToken, Initiation, OpFuture, UseAwaitable, UseFuture};
