//! Port traits: the boundary between the test sequence and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Harness (domain)
//! ```
//!
//! Driven adapters (GPIO backends, operator console, process runner, event
//! sinks, config files) implement these traits.  The
//! [`Harness`](super::service::Harness) consumes them via generics, so the
//! test sequence never touches hardware directly.

use core::fmt;

use crate::config::HarnessConfig;
use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// Logic levels
// ───────────────────────────────────────────────────────────────

/// Physical level of a digital pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Self::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Pin capabilities (driven adapter: domain ↔ GPIO)
// ───────────────────────────────────────────────────────────────

/// A GPIO configured as output.  Writes are assumed to succeed.
pub trait DigitalOutput {
    fn write(&mut self, level: Level);
}

/// A GPIO configured as input.  Each call samples the pin.
pub trait DigitalInput {
    fn read(&self) -> Level;
}

/// A PWM channel on a single pin.  Duty cycle is in percent (0–100).
pub trait PwmChannel {
    /// Start (or restart) the channel at the given frequency and duty.
    fn start(&mut self, frequency_hz: f64, duty_percent: f64);

    /// Change the duty cycle of the running channel.
    fn change_duty_cycle(&mut self, duty_percent: f64);

    /// Stop the channel.  The pin is left low.
    fn stop(&mut self);
}

/// Initialised GPIO backend.  Every pin is created through this handle.
///
/// Pin numbers are physical header positions (see [`crate::pins`]).
pub trait Board {
    type Output: DigitalOutput;
    type Input: DigitalInput;
    type Pwm: PwmChannel;

    /// Claim `header_pin` as an output driven to `initial`.
    fn output(&mut self, header_pin: u8, initial: Level) -> Result<Self::Output>;

    /// Claim `header_pin` as an input with the pull-down enabled.
    fn input_pulldown(&mut self, header_pin: u8) -> Result<Self::Input>;

    /// Claim `header_pin` as a PWM output.  The channel is not started.
    fn pwm(&mut self, header_pin: u8) -> Result<Self::Pwm>;
}

// ───────────────────────────────────────────────────────────────
// Operator port (driving adapter: human → domain)
// ───────────────────────────────────────────────────────────────

/// Blocks until the operator confirms the next step.
///
/// An error ends the test loop (e.g. the console was closed).
pub trait OperatorPort {
    fn confirm(&mut self, prompt: &str) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Process runner (driven adapter: domain → external tools)
// ───────────────────────────────────────────────────────────────

/// Exit code and captured stdout of a finished program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
}

/// Runs an external program to completion.
pub trait CommandRunner {
    /// Returns the exit code, or `None` if the process was killed by a signal.
    /// Output goes straight to the console.
    fn run(&mut self, program: &str, args: &[String]) -> std::io::Result<Option<i32>>;

    /// Like [`run`](Self::run), but stdout is captured instead of shown.
    fn capture(&mut self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`HarnessEvent`](super::events::HarnessEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::HarnessEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads harness configuration.
///
/// Implementations MUST validate before returning.  Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    fn load(&self) -> core::result::Result<HarnessConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(std::io::Error),
    /// The config file is not valid JSON for [`HarnessConfig`].
    Parse(serde_json::Error),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Parse(e) => write!(f, "parse error: {}", e),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
