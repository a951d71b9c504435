//! AVR firmware programmer (avrdude over an STK500v2 programmer).
//!
//! Flash image and fuse bytes come from [`ProgrammerConfig`]; the defaults
//! target the ATtiny85 power controller on the PowerBlock.  The exit code
//! of the tool is passed through untouched; nothing is retried.  The
//! outcome message is reported by the harness as a
//! [`FirmwareFlashed`](crate::app::events::HarnessEvent::FirmwareFlashed)
//! event.

use log::{info, warn};

use crate::app::ports::CommandRunner;
use crate::config::ProgrammerConfig;
use crate::error::{Error, Result};

pub const FLASH_FAILED_MSG: &str = "Error while flashing firmware!";
pub const FLASH_OK_MSG: &str = "Successfully downloaded firmware to uC!";

/// Exit code reported when the tool was killed by a signal.
pub const KILLED_EXIT_CODE: i32 = -1;

pub struct Programmer {
    config: ProgrammerConfig,
}

impl Programmer {
    pub fn new(config: ProgrammerConfig) -> Self {
        Self { config }
    }

    /// Full argument list passed to the tool.
    pub fn args(&self) -> Vec<String> {
        let c = &self.config;
        vec![
            format!("-p{}", c.part),
            format!("-c{}", c.programmer),
            format!("-P{}", c.port),
            "-u".to_string(),
            format!("-Uflash:w:{}:a", c.firmware_path),
            format!("-Ulfuse:w:{}:m", c.lfuse),
            format!("-Uhfuse:w:{}:m", c.hfuse),
            format!("-Uefuse:w:{}:m", c.efuse),
        ]
    }

    /// Write flash and fuses; returns the tool's exit code.
    ///
    /// Only a tool that cannot be started is an error.
    pub fn flash_firmware(&self, runner: &mut impl CommandRunner) -> Result<i32> {
        let args = self.args();
        info!("Flashing {} via {}", self.config.firmware_path, self.config.tool);
        match runner
            .run(&self.config.tool, &args)
            .map_err(Error::Programmer)?
        {
            Some(code) => Ok(code),
            None => {
                warn!("{} terminated by signal", self.config.tool);
                Ok(KILLED_EXIT_CODE)
            }
        }
    }
}
