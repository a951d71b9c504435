//! Outbound harness events.
//!
//! The [`Harness`](super::service::Harness) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (console log, test recorder).

use super::systest::Comparison;

/// Structured events emitted by the test sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum HarnessEvent {
    /// All pins are configured; carries the backend name.
    Ready(&'static str),

    /// A new test cycle started (1-based).
    CycleStarted(u64),

    /// About to run the comparisons described by the message.
    Check(&'static str),

    /// The programmer exited with this code (-1 if it never ran to exit).
    FirmwareFlashed(i32),

    /// A comparison was recorded (verbose mode only).
    Compared(Comparison),

    /// The cycle's comparisons are complete.
    CycleFinished(CycleReport),
}

/// Summary of one finished cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub passed: bool,
    pub comparisons: usize,
    pub failures: usize,
}
