#![allow(dead_code)]

use reactor_compose::WaitResult;

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

/// Abstract time unit the scenarios are expressed in.
pub const UNIT: Duration = Duration::from_millis(40);

static TRACING: Once = Once::new();

/// Installs a test-friendly subscriber once per test binary, filtered by
/// `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Ordered log shared between a test body and the handlers it installs.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// A completion handler that records `label` with the result it receives.
    pub fn handler(&self, label: &str) -> impl FnOnce(WaitResult) + Send + 'static {
        let recorder = self.clone();
        let label = label.to_string();

        move |(error, succeeded): WaitResult| {
            recorder.push(format!("{label}: {error:?} {succeeded}"));
        }
    }
}
