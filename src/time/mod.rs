//! Time utilities: the cancellable wait timer and async sleep.
//!
//! - [`WaitTimer`] is the steady timer composed operations wait on
//! - [`sleep`] is a non-blocking delay for async code running on a runtime
//!
//! # Example: Sleep
//!
//! ```ignore
//! use reactor_compose::time::sleep;
//! use std::time::Duration;
//!
//! async fn wait() {
//!     sleep(Duration::from_secs(1)).await;
//! }
//! ```
//!
//! # Example: Cancelling a timer
//!
//! ```ignore
//! use reactor_compose::{Runtime, UseFuture, start_wait, time::WaitTimer};
//! use std::time::Duration;
//!
//! let rt = Runtime::new();
//! let timer = WaitTimer::with_duration(rt.executor(), Duration::from_secs(5));
//! let result = start_wait(&timer, UseFuture);
//! timer.cancel();
//! assert_eq!(rt.block_on(result), Ok((None, false)));
//! ```

pub mod sleep;
pub mod wait_timer;

pub use sleep::{Sleep, sleep};
pub use wait_timer::WaitTimer;
