//! Thread-local executor context.
//!
//! While a thread runs an executor (inside [`Runtime::block_on`],
//! [`Runtime::run`] or a background worker) that executor is recorded here.
//! Async primitives such as [`sleep`](crate::time::sleep) and
//! [`Task::spawn`](crate::Task::spawn) use it to find their runtime without an
//! explicit handle, and the awaitable completion token uses it to bind its
//! handler to the awaiting task's executor.
//!
//! [`Runtime::block_on`]: crate::Runtime::block_on
//! [`Runtime::run`]: crate::Runtime::run

use crate::runtime::executor::Executor;

use std::cell::RefCell;

thread_local! {
    /// Executor currently being run by this thread.
    ///
    /// Set by [`enter_context`], restored to its previous value on exit.
    static CURRENT_EXECUTOR: RefCell<Option<Executor>> = const { RefCell::new(None) };
}

/// Runs `function` with `executor` installed as the current executor.
///
/// Contexts nest: the previous executor is restored when `function` returns,
/// including when it unwinds.
pub(crate) fn enter_context<F, R>(executor: &Executor, function: F) -> R
where
    F: FnOnce() -> R,
{
    struct Restore(Option<Executor>);

    impl Drop for Restore {
        fn drop(&mut self) {
            let previous = self.0.take();
            CURRENT_EXECUTOR.with(|current| *current.borrow_mut() = previous);
        }
    }

    let previous = CURRENT_EXECUTOR.with(|current| current.borrow_mut().replace(executor.clone()));
    let _restore = Restore(previous);

    function()
}

/// Returns the executor this thread is running, if any.
pub(crate) fn current_executor() -> Option<Executor> {
    CURRENT_EXECUTOR.with(|current| current.borrow().clone())
}
