//! Wall-clock delay adapter.
//!
//! Implements [`DelayNs`] with `std::thread::sleep` for real fixture runs.
//! Tests use the simulated board's virtual clock instead.

use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl StdDelay {
    pub fn new() -> Self {
        Self
    }
}

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Monotonic uptime for log context.
pub struct Uptime {
    start: Instant,
}

impl Default for Uptime {
    fn default() -> Self {
        Self::new()
    }
}

impl Uptime {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}
