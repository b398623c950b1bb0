//! A wait that completes only when told to.
//!
//! [`ManualWait`] keeps the callbacks registered through
//! [`WaitableResource::begin_wait`] and invokes them synchronously, on the
//! caller's stack, from [`fire`](ManualWait::fire),
//! [`cancel`](ManualWait::cancel) or [`fail`](ManualWait::fail). That makes
//! it a deterministic stand-in for a real timer in tests, and a way to bridge
//! externally signalled events into composed operations.
//!
//! ```ignore
//! let rt = Runtime::new();
//! let wait = ManualWait::new(rt.executor());
//! let result = start_wait(&wait, UseFuture);
//! wait.fire();
//! assert_eq!(rt.block_on(result), Ok((None, true)));
//! ```

use crate::error::WaitError;
use crate::resource::WaitableResource;
use crate::runtime::Executor;
use crate::timer::{WaitCallback, WaitStatus};

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct Inner {
    executor: Executor,
    pending: Mutex<VecDeque<WaitCallback>>,
}

impl Inner {
    fn pending(&self) -> MutexGuard<'_, VecDeque<WaitCallback>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Completes every pending wait with `status`, oldest first.
    fn complete_all(&self, status: WaitStatus) -> usize {
        let callbacks: Vec<WaitCallback> = self.pending().drain(..).collect();
        let count = callbacks.len();

        for callback in callbacks {
            callback(status.clone());
        }

        count
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let count = self.complete_all(Err(WaitError::ResourceDropped));

        if count > 0 {
            tracing::debug!(cancelled = count, "manual wait dropped with pending waits");
        }
    }
}

/// A hand-triggered waitable resource. Clones share the same pending waits;
/// the waits are cancelled once the last clone is dropped.
#[derive(Clone)]
pub struct ManualWait {
    inner: Arc<Inner>,
}

impl ManualWait {
    pub fn new(executor: &Executor) -> Self {
        Self {
            inner: Arc::new(Inner {
                executor: executor.clone(),
                pending: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Number of waits registered and not yet completed.
    pub fn pending(&self) -> usize {
        self.inner.pending().len()
    }

    /// Completes every pending wait normally. Returns how many completed.
    pub fn fire(&self) -> usize {
        self.inner.complete_all(Ok(()))
    }

    /// Completes every pending wait with [`WaitError::OperationAborted`].
    pub fn cancel(&self) -> usize {
        self.inner.complete_all(Err(WaitError::OperationAborted))
    }

    /// Completes every pending wait with `error`.
    pub fn fail(&self, error: WaitError) -> usize {
        self.inner.complete_all(Err(error))
    }
}

impl WaitableResource for ManualWait {
    fn executor(&self) -> Executor {
        self.inner.executor.clone()
    }

    fn begin_wait<F>(&self, callback: F)
    where
        F: FnOnce(WaitStatus) + Send + 'static,
    {
        self.inner.pending().push_back(Box::new(callback));
    }
}

impl fmt::Debug for ManualWait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualWait")
            .field("executor", &self.inner.executor)
            .field("pending", &self.pending())
            .finish()
    }
}
