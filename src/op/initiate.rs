use crate::op::WaitResult;
use crate::op::handler::CompletionHandler;
use crate::op::state::WaitOp;
use crate::op::token::{CompletionToken, Initiation};
use crate::resource::WaitableResource;

/// Initiation of the composed wait against one resource.
///
/// Created by [`start_wait`]; tokens decide when to run it.
pub struct WaitInitiation<'a, R> {
    resource: &'a R,
}

impl<R> Initiation<WaitResult> for WaitInitiation<'_, R>
where
    R: WaitableResource,
{
    fn initiate<H>(self, handler: H)
    where
        H: CompletionHandler<WaitResult>,
    {
        let resource_executor = self.resource.executor();
        let executor = handler
            .associated_executor()
            .unwrap_or_else(|| resource_executor.clone());

        WaitOp::new(&resource_executor, executor, handler).start(self.resource);
    }
}

/// Waits on `resource` and reports `(error, succeeded)` through `token`.
///
/// - normal expiry reports `(None, true)`
/// - cancellation, including dropping the resource, reports `(None, false)`
/// - any other failure reports `(Some(error), false)`
///
/// The result is delivered exactly once, on the executor associated with the
/// token's handler (see [`bind_executor`](crate::bind_executor)) or, failing
/// that, the resource's executor. It is never delivered from within the call
/// that cancelled or completed the underlying wait.
///
/// ```ignore
/// let timer = WaitTimer::with_duration(rt.executor(), Duration::from_secs(1));
///
/// // callback
/// start_wait(&timer, |(error, ok): WaitResult| println!("{error:?} {ok}"));
///
/// // future
/// let (error, ok) = rt.block_on(start_wait(&timer, UseFuture))?;
///
/// // suspension point
/// rt.block_on(async { start_wait(&timer, UseAwaitable).await })?;
/// ```
pub fn start_wait<'a, R, K>(resource: &'a R, token: K) -> K::Output<WaitInitiation<'a, R>>
where
    R: WaitableResource,
    K: CompletionToken<WaitResult>,
{
    token.async_initiate(WaitInitiation { resource })
}
