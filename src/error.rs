//! Error types shared by resources, the composed operation and its adapters.

use thiserror::Error;

/// Raw failure reported by a waitable resource.
///
/// `OperationAborted` and `ResourceDropped` are both cancellation codes: the
/// composed operation reports them as `(None, false)` rather than as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError {
    /// The pending wait was cancelled explicitly.
    #[error("operation aborted")]
    OperationAborted,

    /// The resource was destroyed while the wait was still pending.
    #[error("resource dropped while a wait was pending")]
    ResourceDropped,

    /// Any other failure of the underlying resource.
    #[error("resource failure ({code}): {message}")]
    Resource { code: i32, message: String },
}

impl WaitError {
    pub fn resource(code: i32, message: impl Into<String>) -> Self {
        Self::Resource {
            code,
            message: message.into(),
        }
    }

    /// Returns `true` for the codes a resource uses to signal cancellation.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::OperationAborted | Self::ResourceDropped)
    }
}

/// Returned by [`OpFuture`](crate::op::OpFuture) and
/// [`Awaitable`](crate::op::Awaitable) when the completion handler was dropped
/// without being invoked, which only happens when the hosting runtime is torn
/// down with the completion still queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation abandoned before its completion was delivered")]
pub struct Abandoned;

/// An input the composed operation cannot accept in its current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {input} while {state}")]
pub struct InvalidTransition {
    pub state: &'static str,
    pub input: &'static str,
}
