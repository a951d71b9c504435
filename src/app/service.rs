//! Test sequence: the core of the harness.
//!
//! [`Harness`] owns every fixture signal and runs the fixed
//! stimulus/observe script once per cycle.  All I/O flows through port
//! traits, so the whole sequence runs against the simulated board in tests.
//!
//! ```text
//!  OperatorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                   │        Harness         │
//!  Board pins   ◀──▶│  script · SystemTest   │
//!                   └────────────────────────┘
//! ```

use core::convert::Infallible;
use core::fmt::Display;

use embedded_hal::delay::DelayNs;
use log::{debug, error, info};

use crate::config::HarnessConfig;
use crate::drivers::expander_scan::{ExpanderScan, ScanOutcome};
use crate::drivers::input::InputSignal;
use crate::drivers::output::{OutputSignal, Polarity};
use crate::drivers::programmer::{KILLED_EXIT_CODE, Programmer};
use crate::drivers::status_led::StatusIndicator;
use crate::error::Result;
use crate::pins;

use super::events::{CycleReport, HarnessEvent};
use super::ports::{Board, CommandRunner, EventSink, Level, OperatorPort};
use super::systest::SystemTest;

pub const START_PROMPT: &str = "Press ENTER to start system test.";
pub const FINISH_PROMPT: &str = "Press ENTER to finish system test.";

pub const CHECK_FIRMWARE: &str = "Testing, if firmware was successfully loaded.";
pub const CHECK_POWER_ON: &str = "Testing, if button turns on the supply voltage.";
pub const CHECK_EXPANDERS: &str = "Testing, if GPIO expanders can be found.";
pub const CHECK_SHUTDOWN: &str =
    "Testing, if supply voltage is high and if shutdown signal is high.";
pub const CHECK_POWER_OFF: &str = "Testing, if supply voltage is low.";

// ───────────────────────────────────────────────────────────────
// Harness
// ───────────────────────────────────────────────────────────────

pub struct Harness<B: Board, D, R> {
    config: HarnessConfig,
    shutdown: InputSignal<B::Input>,
    supply_5v: InputSignal<B::Input>,
    board_attached: InputSignal<B::Input>,
    status: OutputSignal<B::Output, D>,
    button: OutputSignal<B::Output, D>,
    indicator: StatusIndicator<B::Pwm>,
    programmer: Programmer,
    expander_scan: ExpanderScan,
    runner: R,
    delay: D,
    cycles: u64,
}

impl<B, D, R> Harness<B, D, R>
where
    B: Board,
    D: DelayNs + Clone,
    R: CommandRunner,
{
    /// Claim and initialise every fixture pin.
    ///
    /// Leaves the status line low, the button released and the indicator
    /// dark.
    pub fn new(board: &mut B, config: HarnessConfig, delay: D, runner: R) -> Result<Self> {
        let settle = config.settle_ms;

        let shutdown = InputSignal::new(
            "RPi_Shutdown",
            pins::SHUTDOWN_SIGNAL_PIN,
            board.input_pulldown(pins::SHUTDOWN_SIGNAL_PIN)?,
        );

        let mut status = OutputSignal::new(
            "RPi_Status",
            pins::STATUS_PIN,
            Polarity::ActiveHigh,
            board.output(pins::STATUS_PIN, Level::High)?,
            Level::High,
            delay.clone(),
            settle,
        );
        status.deassert();

        let button = OutputSignal::new(
            "Btn",
            pins::BUTTON_PIN,
            Polarity::ActiveLow,
            board.output(pins::BUTTON_PIN, Level::High)?,
            Level::High,
            delay.clone(),
            settle,
        );

        let supply_5v = InputSignal::new(
            "RPi_5V",
            pins::SUPPLY_5V_PIN,
            board.input_pulldown(pins::SUPPLY_5V_PIN)?,
        );
        let board_attached = InputSignal::new(
            "BoardAttached",
            pins::BOARD_ATTACHED_PIN,
            board.input_pulldown(pins::BOARD_ATTACHED_PIN)?,
        );

        let mut indicator = StatusIndicator::new("Status-LED", board.pwm(pins::INDICATOR_PIN)?);
        indicator.set_duty_cycle(0.0);

        for line in [
            shutdown.to_string(),
            supply_5v.to_string(),
            board_attached.to_string(),
            status.to_string(),
            button.to_string(),
        ] {
            debug!("{}", line);
        }

        let programmer = Programmer::new(config.programmer.clone());
        let expander_scan = ExpanderScan::new(config.expander_scan.clone());

        Ok(Self {
            config,
            shutdown,
            supply_5v,
            board_attached,
            status,
            button,
            indicator,
            programmer,
            expander_scan,
            runner,
            delay,
            cycles: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run cycles forever.  Returns only when the operator channel fails.
    pub fn run(
        &mut self,
        operator: &mut impl OperatorPort,
        sink: &mut impl EventSink,
    ) -> Result<Infallible> {
        loop {
            self.run_cycle(operator, sink)?;
        }
    }

    /// One gated cycle: wait for start, test, report, wait for finish, reset.
    pub fn run_cycle(
        &mut self,
        operator: &mut impl OperatorPort,
        sink: &mut impl EventSink,
    ) -> Result<CycleReport> {
        self.wait_for_start(operator)?;
        self.cycles += 1;
        sink.emit(&HarnessEvent::CycleStarted(self.cycles));
        self.indicator.set_duty_cycle(self.config.running_duty_percent);

        let systest = self.execute_checks(sink);

        let passed = systest.has_passed();
        if passed {
            self.indicator.set_duty_cycle(self.config.pass_duty_percent);
        } else {
            self.indicator.set_frequency(self.config.fail_frequency_hz);
        }
        let report = CycleReport {
            cycle: self.cycles,
            passed,
            comparisons: systest.comparisons().len(),
            failures: systest.failure_count(),
        };
        sink.emit(&HarnessEvent::CycleFinished(report.clone()));

        self.wait_for_finish(operator)?;
        self.indicator.set_frequency(self.config.idle_frequency_hz);
        self.indicator.set_duty_cycle(0.0);
        Ok(report)
    }

    // ── Script ────────────────────────────────────────────────

    fn execute_checks(&mut self, sink: &mut impl EventSink) -> SystemTest {
        let mut systest = SystemTest::new();
        systest.set_verbose(self.config.verbose);

        if self.config.flash_firmware {
            let code = match self.programmer.flash_firmware(&mut self.runner) {
                Ok(code) => code,
                Err(e) => {
                    error!("{}", e);
                    KILLED_EXIT_CODE
                }
            };
            sink.emit(&HarnessEvent::FirmwareFlashed(code));
            sink.emit(&HarnessEvent::Check(CHECK_FIRMWARE));
            compare(&mut systest, sink, code, 0);
        }

        // Press the button to power the board.
        self.button.assert();
        self.delay.delay_ms(self.config.power_on_wait_ms);
        sink.emit(&HarnessEvent::Check(CHECK_POWER_ON));
        compare(&mut systest, sink, self.supply_5v.read(), Level::High);

        if self.config.scan_expanders {
            self.check_expanders(&mut systest, sink);
        }

        // Report host alive, then release the button to request shutdown.
        self.status.assert();
        self.button.deassert();
        self.delay.delay_ms(self.config.check_wait_ms);
        sink.emit(&HarnessEvent::Check(CHECK_SHUTDOWN));
        compare(&mut systest, sink, self.supply_5v.read(), Level::High);
        compare(&mut systest, sink, self.shutdown.read(), Level::High);

        // Host done: dropping status must cut the supply.
        self.status.deassert();
        self.delay.delay_ms(self.config.check_wait_ms);
        sink.emit(&HarnessEvent::Check(CHECK_POWER_OFF));
        compare(&mut systest, sink, self.supply_5v.read(), Level::Low);

        systest
    }

    /// One comparison: the expected row prefix, or the scanner's exit code
    /// against 0 when it failed.
    fn check_expanders(&mut self, systest: &mut SystemTest, sink: &mut impl EventSink) {
        let outcome = match self.expander_scan.scan(&mut self.runner) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{}", e);
                ScanOutcome::ToolFailed(KILLED_EXIT_CODE)
            }
        };
        sink.emit(&HarnessEvent::Check(CHECK_EXPANDERS));
        let expected = self.expander_scan.expected_row();
        match outcome {
            ScanOutcome::Row(row) => compare(systest, sink, row.as_str(), expected),
            ScanOutcome::RowMissing => compare(systest, sink, "", expected),
            ScanOutcome::ToolFailed(code) => compare(systest, sink, code, 0),
        }
    }

    // ── Gating ────────────────────────────────────────────────

    fn wait_for_start(&mut self, operator: &mut impl OperatorPort) -> Result<()> {
        if self.config.await_board_attach {
            info!("Waiting for a board to be attached");
            self.wait_for_attach(Level::High);
            Ok(())
        } else {
            operator.confirm(START_PROMPT)
        }
    }

    fn wait_for_finish(&mut self, operator: &mut impl OperatorPort) -> Result<()> {
        if self.config.await_board_attach {
            info!("Waiting for the board to be removed");
            self.wait_for_attach(Level::Low);
            Ok(())
        } else {
            operator.confirm(FINISH_PROMPT)
        }
    }

    /// Block until the attach contact reads `level` twice, one debounce
    /// interval apart.
    fn wait_for_attach(&mut self, level: Level) {
        loop {
            if self.board_attached.read() == level {
                self.delay.delay_ms(self.config.attach_debounce_ms);
                if self.board_attached.read() == level {
                    return;
                }
            } else {
                self.delay.delay_ms(self.config.attach_poll_ms);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Cycles started since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn indicator(&self) -> &StatusIndicator<B::Pwm> {
        &self.indicator
    }

    pub fn status(&self) -> &OutputSignal<B::Output, D> {
        &self.status
    }

    pub fn button(&self) -> &OutputSignal<B::Output, D> {
        &self.button
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

/// Record one comparison and, in verbose mode, report it.
fn compare<T: PartialEq + Display>(
    systest: &mut SystemTest,
    sink: &mut impl EventSink,
    observed: T,
    expected: T,
) {
    systest.test_equals(observed, expected);
    if let Some(c) = systest.last().filter(|_| systest.is_verbose()) {
        sink.emit(&HarnessEvent::Compared(c.clone()));
    }
}
