//! Completion tokens: how a caller asks to be notified.
//!
//! An asynchronous operation is written once, as an [`Initiation`] that knows
//! how to start the work given some [`CompletionHandler`]. The caller picks a
//! [`CompletionToken`], which decides what handler to build, when to run the
//! initiation, and what the operation returns:
//!
//! | token | returns | starts |
//! |---|---|---|
//! | closure `FnOnce(T)` | `()` | immediately |
//! | [`UseFuture`] | [`OpFuture<T>`] | immediately |
//! | [`UseAwaitable`] | [`Awaitable<I, T>`] | when first polled |
//! | [`Bound<K>`] | what `K` returns | as `K` does |

use crate::error::Abandoned;
use crate::op::handler::{Bound, CompletionHandler, Promise};
use crate::runtime::Executor;

use futures::channel::oneshot;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Starts an asynchronous operation that reports its result to a handler.
pub trait Initiation<T> {
    fn initiate<H>(self, handler: H)
    where
        H: CompletionHandler<T>;
}

/// Turns an [`Initiation`] into the value an operation returns.
pub trait CompletionToken<T> {
    type Output<I: Initiation<T>>;

    fn async_initiate<I>(self, initiation: I) -> Self::Output<I>
    where
        I: Initiation<T>;
}

impl<T, F> CompletionToken<T> for F
where
    F: FnOnce(T) + Send + 'static,
{
    type Output<I: Initiation<T>> = ();

    fn async_initiate<I>(self, initiation: I) -> Self::Output<I>
    where
        I: Initiation<T>,
    {
        initiation.initiate(self);
    }
}

/// Wraps whatever handler the inner token builds with a [`Bound`] executor.
pub struct Rebind<I> {
    executor: Executor,
    initiation: I,
}

impl<T, I> Initiation<T> for Rebind<I>
where
    I: Initiation<T>,
{
    fn initiate<H>(self, handler: H)
    where
        H: CompletionHandler<T>,
    {
        self.initiation.initiate(Bound {
            executor: self.executor,
            inner: handler,
        });
    }
}

impl<T, K> CompletionToken<T> for Bound<K>
where
    K: CompletionToken<T>,
{
    type Output<I: Initiation<T>> = K::Output<Rebind<I>>;

    fn async_initiate<I>(self, initiation: I) -> Self::Output<I>
    where
        I: Initiation<T>,
    {
        self.inner.async_initiate(Rebind {
            executor: self.executor,
            initiation,
        })
    }
}

/// Token that starts the operation immediately and returns an [`OpFuture`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UseFuture;

impl<T: Send + 'static> CompletionToken<T> for UseFuture {
    type Output<I: Initiation<T>> = OpFuture<T>;

    fn async_initiate<I>(self, initiation: I) -> Self::Output<I>
    where
        I: Initiation<T>,
    {
        let (sender, receiver) = oneshot::channel();
        initiation.initiate(Promise::new(sender, None));

        OpFuture { receiver }
    }
}

/// Future resolving to the result of an operation started with [`UseFuture`].
///
/// The operation runs whether or not this future is polled.
#[must_use = "the operation runs regardless; dropping this discards its result"]
pub struct OpFuture<T> {
    receiver: oneshot::Receiver<T>,
}

impl<T> Future for OpFuture<T> {
    type Output = Result<T, Abandoned>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.map_err(|_| Abandoned))
    }
}

/// Token that defers the operation until the returned [`Awaitable`] is first
/// polled, delivering the result on the awaiting task's executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct UseAwaitable;

impl<T: Send + 'static> CompletionToken<T> for UseAwaitable {
    type Output<I: Initiation<T>> = Awaitable<I, T>;

    fn async_initiate<I>(self, initiation: I) -> Self::Output<I>
    where
        I: Initiation<T>,
    {
        Awaitable {
            initiation: Some(initiation),
            receiver: None,
        }
    }
}

/// Suspension point for an operation started with [`UseAwaitable`].
///
/// Nothing happens until the first poll. That poll starts the operation with
/// a handler bound to the executor running the awaiting task, if there is
/// one.
#[must_use = "the operation does not start until awaited"]
pub struct Awaitable<I, T> {
    initiation: Option<I>,
    receiver: Option<oneshot::Receiver<T>>,
}

impl<I, T> Awaitable<I, T> {
    /// Returns `true` once the operation has been started.
    pub fn is_started(&self) -> bool {
        self.initiation.is_none()
    }
}

// Neither field is ever pinned in place.
impl<I, T> Unpin for Awaitable<I, T> {}

impl<I, T> Future for Awaitable<I, T>
where
    I: Initiation<T>,
    T: Send + 'static,
{
    type Output = Result<T, Abandoned>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let Some(initiation) = this.initiation.take() {
            let (sender, receiver) = oneshot::channel();
            this.receiver = Some(receiver);

            initiation.initiate(Promise::new(sender, Executor::current()));
        }

        match this.receiver.as_mut() {
            Some(receiver) => Pin::new(receiver)
                .poll(cx)
                .map(|result| result.map_err(|_| Abandoned)),
            None => Poll::Ready(Err(Abandoned)),
        }
    }
}
