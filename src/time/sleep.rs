use crate::runtime::Executor;
use crate::timer::TimerId;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// A future that completes after a specified duration using executor timers.
///
/// Registers a timer with the current executor on first poll; dropping the
/// future before it fires removes the timer again.
#[derive(Debug)]
pub struct Sleep {
    deadline: Instant,
    registered: Option<(Executor, TimerId)>,
}

impl Sleep {
    pub fn new(duration: Duration) -> Self {
        Self {
            deadline: Instant::now() + duration,
            registered: None,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if Instant::now() >= self.deadline {
            return Poll::Ready(());
        }

        if self.registered.is_none() {
            let executor =
                Executor::current().expect("sleep() called outside of a runtime context");
            let waker = cx.waker().clone();
            let id = executor.register_timer(self.deadline, Box::new(move |_| waker.wake()));

            self.registered = id.map(|id| (executor, id));
        }

        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some((executor, id)) = self.registered.take() {
            drop(executor.cancel_timer(id));
        }
    }
}

/// Waits for `duration` on the current executor.
///
/// # Panics
/// The returned future panics if first polled outside of a runtime context.
pub fn sleep(duration: Duration) -> Sleep {
    Sleep::new(duration)
}
