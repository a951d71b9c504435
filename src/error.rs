//! Unified error types for the PowerBlock system-test harness.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level control loop's error handling uniform.  Pin reads and writes
//! deliberately have no error path; only initialisation, configuration,
//! operator I/O and the external tools can fail.

use core::fmt;
use std::io;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level harness error
// ---------------------------------------------------------------------------

/// Every fallible operation in the harness funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// Board or pin initialisation failed (e.g. unknown header pin).
    Init(&'static str),
    /// The GPIO backend refused an operation during setup.
    Gpio(String),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The operator console could not be read (closed stdin, I/O error).
    Operator(io::Error),
    /// The external programmer could not be started.
    Programmer(io::Error),
    /// The I²C bus scanner could not be started.
    Scan(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Gpio(msg) => write!(f, "gpio: {msg}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Operator(e) => write!(f, "operator console: {e}"),
            Self::Programmer(e) => write!(f, "programmer: {e}"),
            Self::Scan(e) => write!(f, "i2c scan: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Operator(e) | Self::Programmer(e) | Self::Scan(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(feature = "rpi")]
impl From<rppal::gpio::Error> for Error {
    fn from(e: rppal::gpio::Error) -> Self {
        Self::Gpio(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Harness-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
