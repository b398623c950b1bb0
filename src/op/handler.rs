//! Completion handlers: the callable end of a notification mechanism.

use crate::runtime::Executor;

use futures::channel::oneshot;

/// Receives the single result of an asynchronous operation.
///
/// A handler is consumed by [`complete`](CompletionHandler::complete), so it
/// cannot be invoked twice. It may declare the executor it must run on; when
/// it does not, the operation falls back to its resource's executor.
pub trait CompletionHandler<T>: Send + 'static {
    fn complete(self, value: T);

    fn associated_executor(&self) -> Option<Executor> {
        None
    }
}

impl<T, F> CompletionHandler<T> for F
where
    F: FnOnce(T) + Send + 'static,
{
    fn complete(self, value: T) {
        self(value)
    }
}

/// A handler or token paired with the executor its completion must run on.
///
/// Built by [`bind_executor`].
#[derive(Debug, Clone)]
pub struct Bound<K> {
    pub(crate) executor: Executor,
    pub(crate) inner: K,
}

/// Associates `executor` with a handler or completion token.
///
/// ```ignore
/// start_wait(&timer, bind_executor(ui.executor(), |(error, ok)| redraw(error, ok)));
/// ```
pub fn bind_executor<K>(executor: &Executor, inner: K) -> Bound<K> {
    Bound {
        executor: executor.clone(),
        inner,
    }
}

impl<K> Bound<K> {
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn into_inner(self) -> K {
        self.inner
    }
}

impl<T, H> CompletionHandler<T> for Bound<H>
where
    H: CompletionHandler<T>,
{
    fn complete(self, value: T) {
        self.inner.complete(value)
    }

    fn associated_executor(&self) -> Option<Executor> {
        Some(self.executor.clone())
    }
}

/// Handler side of the future and awaitable adapters: sends the value to the
/// waiting receiver.
pub struct Promise<T> {
    sender: oneshot::Sender<T>,
    executor: Option<Executor>,
}

impl<T> Promise<T> {
    pub(crate) fn new(sender: oneshot::Sender<T>, executor: Option<Executor>) -> Self {
        Self { sender, executor }
    }
}

impl<T: Send + 'static> CompletionHandler<T> for Promise<T> {
    fn complete(self, value: T) {
        if self.sender.send(value).is_err() {
            tracing::trace!("completion receiver dropped before delivery");
        }
    }

    fn associated_executor(&self) -> Option<Executor> {
        self.executor.clone()
    }
}
