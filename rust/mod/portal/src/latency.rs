//! Simulated network latency.
//!
//! The portal has no backend; submits pause for a fixed delay so the UI
//! behaves like it is talking to one. The delay is injected so tests can run
//! without it.

use std::time::Duration;

use tracing::debug;

pub trait Latency: Send + Sync {
    /// Block until the simulated round trip completes. Cannot be cancelled.
    fn wait(&self);
}

/// Sleep for a fixed duration.
pub struct FixedLatency {
    delay: Duration,
}

impl FixedLatency {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl Latency for FixedLatency {
    fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        debug!(delay_ms = self.delay.as_millis() as u64, "simulating round trip");
        std::thread::sleep(self.delay);
    }
}

/// Return immediately.
pub struct NoLatency;

impl Latency for NoLatency {
    fn wait(&self) {}
}
