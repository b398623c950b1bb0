//! Waitable resources: one-shot, cancellable primitives a composed operation
//! can wait on.
//!
//! - [`WaitableResource`]: the capability the composed operation needs
//! - [`manual::ManualWait`]: a wait completed by hand, synchronously
//! - [`WaitTimer`](crate::time::WaitTimer): a steady deadline timer

pub mod manual;

pub use manual::ManualWait;

use crate::runtime::Executor;
use crate::timer::WaitStatus;

/// A cancellable, one-shot asynchronous wait.
///
/// `begin_wait` registers `callback` to be invoked exactly once with the
/// outcome of the wait: `Ok(())` on normal expiry, or an error. Cancellation
/// must be reported through an error for which
/// [`WaitError::is_cancellation`](crate::WaitError::is_cancellation) holds,
/// and a resource dropped with waits pending must cancel them.
pub trait WaitableResource {
    /// The executor the resource itself is bound to.
    fn executor(&self) -> Executor;

    fn begin_wait<F>(&self, callback: F)
    where
        F: FnOnce(WaitStatus) + Send + 'static;
}

impl<R: WaitableResource + ?Sized> WaitableResource for &R {
    fn executor(&self) -> Executor {
        (**self).executor()
    }

    fn begin_wait<F>(&self, callback: F)
    where
        F: FnOnce(WaitStatus) + Send + 'static,
    {
        (**self).begin_wait(callback)
    }
}
