//! Waker implementation for task wake-up notifications.
//!
//! Provides task waker objects that re-post a task onto its executor when the
//! future it wraps is ready to continue. Both wakers implement
//! [`std::task::Wake`].

use crate::runtime::executor::Executor;
use crate::task::Runnable;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Wake, Waker};

/// Waker that re-schedules its task when awakened.
pub(crate) struct TaskWaker {
    task: Arc<dyn Runnable>,
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.task.clone().schedule();
    }
}

/// Creates a Waker that re-schedules `task` when called.
pub(crate) fn make_waker(task: Arc<dyn Runnable>) -> Waker {
    Waker::from(Arc::new(TaskWaker { task }))
}

/// Waker for the future driven by `block_on`: flags it and unparks the
/// runtime's threads.
pub(crate) struct MainWaker {
    notified: AtomicBool,
    executor: Executor,
}

impl MainWaker {
    pub(crate) fn new(executor: Executor) -> Arc<Self> {
        Arc::new(Self {
            notified: AtomicBool::new(true),
            executor,
        })
    }

    /// Clears and returns the notification flag.
    pub(crate) fn take_notified(&self) -> bool {
        self.notified.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn is_notified(&self) -> bool {
        self.notified.load(Ordering::SeqCst)
    }
}

impl Wake for MainWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.notified.store(true, Ordering::SeqCst);
        self.executor.unpark_all();
    }
}
