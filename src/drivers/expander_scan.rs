//! GPIO-expander presence check over the board's I²C bus (`i2cdetect`).
//!
//! The scanner prints one row per 16 addresses:
//!
//! ```text
//!      0  1  2  3  4  5  6  7  8  9  a  b  c  d  e  f
//! 20: 20 -- -- -- -- -- -- 27 -- -- -- -- -- -- -- --
//! ```
//!
//! The row carrying the expected label is cut to the length of the
//! expected row, and that prefix is what the harness compares.

use log::warn;

use crate::app::ports::CommandRunner;
use crate::config::ExpanderScanConfig;
use crate::drivers::programmer::KILLED_EXIT_CODE;
use crate::error::{Error, Result};

/// Result of one bus scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Leading part of the matching row, cut to the expected length.
    Row(String),
    /// The scanner ran but printed no row with the expected label.
    RowMissing,
    /// The scanner exited non-zero; -1 if killed by a signal.
    ToolFailed(i32),
}

pub struct ExpanderScan {
    config: ExpanderScanConfig,
}

impl ExpanderScan {
    pub fn new(config: ExpanderScanConfig) -> Self {
        Self { config }
    }

    pub fn args(&self) -> Vec<String> {
        vec!["-y".to_string(), self.config.bus.to_string()]
    }

    pub fn expected_row(&self) -> &str {
        &self.config.expected_row
    }

    /// Row label of the expected row, colon included (`"20:"`).
    fn row_label(&self) -> &str {
        let row = &self.config.expected_row;
        row.find(':').map_or(row.as_str(), |i| &row[..=i])
    }

    /// Run the scanner.  Only a scanner that cannot be started is an error.
    pub fn scan(&self, runner: &mut impl CommandRunner) -> Result<ScanOutcome> {
        let out = runner
            .capture(&self.config.tool, &self.args())
            .map_err(Error::Scan)?;

        let code = out.code.unwrap_or(KILLED_EXIT_CODE);
        if code != 0 {
            warn!("{} exited with code {}", self.config.tool, code);
            return Ok(ScanOutcome::ToolFailed(code));
        }

        let width = self.config.expected_row.chars().count();
        Ok(match find_row(&out.stdout, self.row_label(), width) {
            Some(row) => ScanOutcome::Row(row),
            None => ScanOutcome::RowMissing,
        })
    }
}

fn find_row(stdout: &str, label: &str, width: usize) -> Option<String> {
    stdout
        .lines()
        .find(|line| line.starts_with(label))
        .map(|line| line.chars().take(width).collect())
}
