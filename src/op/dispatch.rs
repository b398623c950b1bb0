//! Completion dispatch.
//!
//! The last step of every composed operation: deliver the result to the
//! caller's handler on the handler's executor. Delivery is always a freshly
//! posted job, never a call on the current stack, even when the current
//! thread is already running that executor.

use crate::op::handler::CompletionHandler;
use crate::runtime::Executor;

/// Schedules exactly one invocation of `handler` with `value` on `executor`.
pub fn post_completion<H, T>(executor: &Executor, handler: H, value: T)
where
    H: CompletionHandler<T>,
    T: Send + 'static,
{
    tracing::trace!(
        executor = executor.id(),
        same_thread = executor.running_in_this_thread(),
        "completion posted"
    );

    executor.post(move || handler.complete(value));
}
