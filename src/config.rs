//! Harness configuration parameters
//!
//! All tunable parameters for the system-test fixture.  Defaults reproduce
//! the behaviour of the production fixture; a JSON file can override any
//! subset of fields.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Which pin backend the harness drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Real Raspberry Pi GPIO (requires the `rpi` feature).
    Hardware,
    /// In-memory board with a modelled device under test.
    Simulated,
}

/// Settings for the external AVR programmer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgrammerConfig {
    /// Programmer executable (looked up on `PATH`).
    pub tool: String,
    /// Target part id (`-p`).
    pub part: String,
    /// Programmer type (`-c`).
    pub programmer: String,
    /// Serial port of the programmer (`-P`).
    pub port: String,
    /// Intel-hex image written to flash.
    pub firmware_path: String,
    pub lfuse: String,
    pub hfuse: String,
    pub efuse: String,
}

impl Default for ProgrammerConfig {
    fn default() -> Self {
        Self {
            tool: "avrdude".into(),
            part: "t85".into(),
            programmer: "stk500v2".into(),
            port: "/dev/ttyUSB0".into(),
            firmware_path: "/home/pi/attiny.hex".into(),
            lfuse: "0xe2".into(),
            hfuse: "0xdf".into(),
            efuse: "0xff".into(),
        }
    }
}

/// Settings for the GPIO-expander scan on the board's I²C bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpanderScanConfig {
    /// Bus scanner executable (looked up on `PATH`).
    pub tool: String,
    /// I²C bus number passed to the scanner.
    pub bus: u8,
    /// Leading part of the `i2cdetect` row that must show the expanders.
    pub expected_row: String,
}

impl Default for ExpanderScanConfig {
    fn default() -> Self {
        Self {
            tool: "i2cdetect".into(),
            bus: 1,
            // MCP23017 at 0x20 and 0x27
            expected_row: "20: 20 -- -- -- -- -- -- 27".into(),
        }
    }
}

/// Core harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub backend: Backend,
    /// Log every comparison, not only the verdict.
    pub verbose: bool,

    // --- Optional steps ---
    /// Flash firmware before the power-on checks.
    pub flash_firmware: bool,
    /// Gate cycles on the board-attached contact instead of ENTER prompts.
    pub await_board_attach: bool,
    /// Scan the I²C bus for the GPIO expanders after power-on.
    pub scan_expanders: bool,

    // --- Timing ---
    /// Pause after every digital write (milliseconds)
    pub settle_ms: u32,
    /// Wait between pressing the button and the first 5V check (milliseconds)
    pub power_on_wait_ms: u32,
    /// Wait before the shutdown and power-off checks (milliseconds)
    pub check_wait_ms: u32,
    /// Board-attached contact must hold for this long (milliseconds)
    pub attach_debounce_ms: u32,
    /// Board-attached polling interval (milliseconds)
    pub attach_poll_ms: u32,

    // --- Indicator ---
    /// Base blink frequency (Hz)
    pub idle_frequency_hz: f64,
    /// Blink frequency reporting a failed cycle (Hz)
    pub fail_frequency_hz: f64,
    /// Duty cycle while a cycle runs (0-100%)
    pub running_duty_percent: f64,
    /// Duty cycle reporting a passed cycle (0-100%)
    pub pass_duty_percent: f64,

    pub programmer: ProgrammerConfig,
    pub expander_scan: ExpanderScanConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Hardware,
            verbose: true,

            flash_firmware: false,
            await_board_attach: false,
            scan_expanders: false,

            settle_ms: 100,
            power_on_wait_ms: 1200,
            check_wait_ms: 100,
            attach_debounce_ms: 1000,
            attach_poll_ms: 50,

            idle_frequency_hz: 1.0,
            fail_frequency_hz: 5.0,
            running_duty_percent: 50.0,
            pass_duty_percent: 100.0,

            programmer: ProgrammerConfig::default(),
            expander_scan: ExpanderScanConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the fixture cannot honour.  Nothing is clamped here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn duty_ok(d: f64) -> bool {
            (0.0..=100.0).contains(&d)
        }
        fn freq_ok(f: f64) -> bool {
            f.is_finite() && f > 0.0
        }

        if !duty_ok(self.running_duty_percent) {
            return Err(ConfigError::ValidationFailed("running_duty_percent outside 0-100"));
        }
        if !duty_ok(self.pass_duty_percent) {
            return Err(ConfigError::ValidationFailed("pass_duty_percent outside 0-100"));
        }
        if !freq_ok(self.idle_frequency_hz) {
            return Err(ConfigError::ValidationFailed("idle_frequency_hz must be > 0"));
        }
        if !freq_ok(self.fail_frequency_hz) {
            return Err(ConfigError::ValidationFailed("fail_frequency_hz must be > 0"));
        }
        if self.await_board_attach && self.attach_poll_ms == 0 {
            return Err(ConfigError::ValidationFailed("attach_poll_ms must be > 0"));
        }
        if self.flash_firmware {
            if self.programmer.tool.is_empty() {
                return Err(ConfigError::ValidationFailed("programmer.tool is empty"));
            }
            if self.programmer.firmware_path.is_empty() {
                return Err(ConfigError::ValidationFailed("programmer.firmware_path is empty"));
            }
        }
        if self.scan_expanders {
            if self.expander_scan.tool.is_empty() {
                return Err(ConfigError::ValidationFailed("expander_scan.tool is empty"));
            }
            if !self.expander_scan.expected_row.contains(':') {
                return Err(ConfigError::ValidationFailed(
                    "expander_scan.expected_row needs a row label like \"20:\"",
                ));
            }
        }
        Ok(())
    }
}
