//! Runtime subsystem modules.

pub(crate) mod context;
mod core;
pub(crate) mod driver;
pub(crate) mod executor;
pub mod guard;
pub(crate) mod queue;
pub(crate) mod waker;

pub use core::Runtime;
pub use executor::Executor;
pub use guard::WorkGuard;
