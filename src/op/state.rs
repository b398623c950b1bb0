//! The composed wait's state machine.
//!
//! [`State::on`] is a pure transition function; [`WaitOp`] applies its
//! decisions: it issues the wait on `BeginWait` and hands the result to the
//! completion dispatcher on `Complete`. Reaching `Complete` consumes the
//! operation, so no state is ever revisited and the handler can only be
//! dispatched once.

use crate::error::InvalidTransition;
use crate::op::WaitResult;
use crate::op::dispatch::post_completion;
use crate::op::handler::CompletionHandler;
use crate::resource::WaitableResource;
use crate::runtime::{Executor, WorkGuard};
use crate::timer::WaitStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Init,
    Waiting,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            State::Init => "init",
            State::Waiting => "waiting",
        }
    }

    /// Decides what an operation in this state does with `input`.
    pub fn on(self, input: Input) -> Result<Transition, InvalidTransition> {
        match (self, input) {
            (State::Init, Input::Start) => Ok(Transition::BeginWait(State::Waiting)),
            (State::Waiting, Input::WaitFinished(status)) => {
                Ok(Transition::Complete(classify(status)))
            }
            (state, input) => Err(InvalidTransition {
                state: state.name(),
                input: input.name(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// First invocation, right after construction.
    Start,
    /// The resource's wait callback fired.
    WaitFinished(WaitStatus),
}

impl Input {
    fn name(&self) -> &'static str {
        match self {
            Input::Start => "start",
            Input::WaitFinished(_) => "wait finished",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Issue the wait and move to the given state.
    BeginWait(State),
    /// Deliver the result; the operation ends here.
    Complete(WaitResult),
}

/// Collapses a raw wait status into `(error, succeeded)`.
///
/// Cancellation is not an error: it reports `(None, false)` whatever
/// cancellation code the resource used.
pub fn classify(status: WaitStatus) -> WaitResult {
    match status {
        Ok(()) => (None, true),
        Err(error) if error.is_cancellation() => (None, false),
        Err(error) => (Some(error), false),
    }
}

/// One in-flight composed wait.
///
/// Holds a work guard on the resource's executor and one on the handler's
/// executor. Both are released only after the completion has been posted.
pub(crate) struct WaitOp<H> {
    state: State,
    executor: Executor,
    handler: H,
    resource_work: WorkGuard,
    handler_work: WorkGuard,
}

impl<H> WaitOp<H>
where
    H: CompletionHandler<WaitResult>,
{
    pub(crate) fn new(resource_executor: &Executor, executor: Executor, handler: H) -> Self {
        Self {
            state: State::Init,
            resource_work: WorkGuard::new(resource_executor),
            handler_work: WorkGuard::new(&executor),
            executor,
            handler,
        }
    }

    /// Drives the operation from `Init`: the wait is issued and the operation
    /// moves into the resource's callback.
    pub(crate) fn start<R>(self, resource: &R)
    where
        R: WaitableResource,
    {
        if let Some(op) = self.advance(Input::Start) {
            resource.begin_wait(move |status| {
                if op.advance(Input::WaitFinished(status)).is_some() {
                    tracing::error!("composed wait still pending after its wait finished");
                }
            });
        }
    }

    /// Applies one input. Returns the operation if it has to keep waiting.
    fn advance(mut self, input: Input) -> Option<Self> {
        let from = self.state;

        match from.on(input) {
            Ok(Transition::BeginWait(next)) => {
                tracing::debug!(from = from.name(), to = next.name(), "composed wait transition");
                self.state = next;
                Some(self)
            }
            Ok(Transition::Complete(result)) => {
                tracing::debug!(
                    from = from.name(),
                    succeeded = result.1,
                    error = ?result.0,
                    "composed wait completed"
                );
                self.complete(result);
                None
            }
            Err(error) => {
                tracing::error!(%error, "composed wait rejected input");
                None
            }
        }
    }

    fn complete(self, result: WaitResult) {
        let WaitOp {
            executor,
            handler,
            resource_work,
            handler_work,
            ..
        } = self;

        post_completion(&executor, handler, result);

        drop(handler_work);
        drop(resource_work);
    }
}
