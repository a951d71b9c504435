//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing harness events to the logger, which
//! the binary routes to stdout for the operator.

use log::{Level, log};

use crate::app::events::HarnessEvent;
use crate::app::ports::EventSink;
use crate::drivers::programmer::{FLASH_FAILED_MSG, FLASH_OK_MSG};

pub const PASSED_MSG: &str = "System test passed.";
pub const FAILED_MSG: &str = "System test FAILED.";

/// Adapter that logs every [`HarnessEvent`] to the console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &HarnessEvent) {
        let (level, line) = render(event);
        log!(level, "{}", line);
    }
}

/// Console line and severity for one event.
pub fn render(event: &HarnessEvent) -> (Level, String) {
    match event {
        HarnessEvent::Ready(backend) => (Level::Info, format!("READY | backend={}", backend)),
        HarnessEvent::CycleStarted(n) => (Level::Info, format!("CYCLE | #{} started", n)),
        HarnessEvent::Check(msg) => (Level::Info, (*msg).to_string()),
        HarnessEvent::FirmwareFlashed(0) => (Level::Info, FLASH_OK_MSG.to_string()),
        HarnessEvent::FirmwareFlashed(code) => (
            Level::Error,
            format!("{} (exit code {})", FLASH_FAILED_MSG, code),
        ),
        HarnessEvent::Compared(c) => (Level::Info, c.to_string()),
        HarnessEvent::CycleFinished(report) if report.passed => {
            (Level::Info, PASSED_MSG.to_string())
        }
        HarnessEvent::CycleFinished(report) => (
            Level::Error,
            format!(
                "{} ({} of {} checks failed)",
                FAILED_MSG, report.failures, report.comparisons
            ),
        ),
    }
}
