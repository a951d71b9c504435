//! Integration tests: Harness → simulated PowerBlock → verdict + indicator.

use powerblock_systest::Error;
use powerblock_systest::adapters::log_sink::{self, FAILED_MSG, PASSED_MSG};
use powerblock_systest::adapters::sim::DutFault;
use powerblock_systest::app::events::{CycleReport, HarnessEvent};
use powerblock_systest::app::ports::Level;
use powerblock_systest::app::service::{
    CHECK_POWER_OFF, CHECK_POWER_ON, CHECK_SHUTDOWN, FINISH_PROMPT, START_PROMPT,
};
use powerblock_systest::config::HarnessConfig;
use powerblock_systest::pins;

use super::mock_hw::{Fixture, ScriptedRunner};

// ── Initial state ─────────────────────────────────────────────

#[test]
fn construction_leaves_fixture_idle() {
    let fx = Fixture::new();
    assert_eq!(fx.sim.output(pins::STATUS_PIN), Some(Level::Low));
    assert_eq!(fx.sim.output(pins::BUTTON_PIN), Some(Level::High));
    assert!(!fx.harness.status().is_asserted());
    assert!(!fx.harness.button().is_asserted());

    let led = fx.indicator();
    assert!(led.running);
    assert_eq!(led.frequency_hz, 1.0);
    assert_eq!(led.duty_percent, 0.0);
    assert_eq!(fx.harness.cycles(), 0);
}

// ── Passing board ─────────────────────────────────────────────

#[test]
fn healthy_board_passes_and_lights_solid() {
    let mut fx = Fixture::new();
    let mut op = fx.operator(2);

    let report = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();
    assert_eq!(
        report,
        CycleReport {
            cycle: 1,
            passed: true,
            comparisons: 4,
            failures: 0,
        }
    );

    assert_eq!(op.prompts[0].0, START_PROMPT);
    assert_eq!(op.prompts[1].0, FINISH_PROMPT);

    // While waiting to finish: solid at full duty, still 1 Hz.
    let shown = op.indicator_at(1);
    assert_eq!(shown.duty_percent, 100.0);
    assert_eq!(shown.frequency_hz, 1.0);

    // After finishing: reset to dark.
    let led = fx.indicator();
    assert_eq!(led.duty_percent, 0.0);
    assert_eq!(led.frequency_hz, 1.0);
}

#[test]
fn cycle_emits_checks_in_order() {
    let mut fx = Fixture::new();
    let mut op = fx.operator(2);
    fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();

    let steps = fx.sink.steps();
    assert_eq!(*steps[0], HarnessEvent::CycleStarted(1));
    assert_eq!(*steps[1], HarnessEvent::Check(CHECK_POWER_ON));
    assert_eq!(*steps[2], HarnessEvent::Check(CHECK_SHUTDOWN));
    assert_eq!(*steps[3], HarnessEvent::Check(CHECK_POWER_OFF));
    assert!(matches!(
        steps[4],
        HarnessEvent::CycleFinished(CycleReport { passed: true, .. })
    ));
    assert_eq!(steps.len(), 5);
    assert_eq!(log_sink::render(steps[4]).1, PASSED_MSG);
}

// ── Verbose comparison reports ────────────────────────────────

#[test]
fn verbose_reports_each_comparison_after_its_check() {
    let mut fx = Fixture::new();
    let mut op = fx.operator(2);
    fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();

    // Check(power-on), Compared, Check(shutdown), Compared, Compared, ...
    assert_eq!(fx.sink.events[1], HarnessEvent::Check(CHECK_POWER_ON));
    assert!(matches!(&fx.sink.events[2], HarnessEvent::Compared(c) if c.passed));
    assert_eq!(fx.sink.events[3], HarnessEvent::Check(CHECK_SHUTDOWN));

    let lines: Vec<String> = fx.sink.comparisons().iter().map(|c| c.to_string()).collect();
    assert_eq!(
        lines,
        [
            "Expected: HIGH, Observed: HIGH. Test PASSED",
            "Expected: HIGH, Observed: HIGH. Test PASSED",
            "Expected: HIGH, Observed: HIGH. Test PASSED",
            "Expected: LOW, Observed: LOW. Test PASSED",
        ]
    );
}

#[test]
fn comparisons_after_failure_are_still_reported() {
    let mut fx = Fixture::new();
    fx.sim.set_fault(Some(DutFault::NoPowerOn));
    let mut op = fx.operator(2);
    fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();

    let lines: Vec<String> = fx.sink.comparisons().iter().map(|c| c.to_string()).collect();
    assert_eq!(
        lines,
        [
            "Expected: HIGH, Observed: LOW. Test FAILED",
            "Expected: HIGH, Observed: LOW. Test FAILED",
            "Expected: HIGH, Observed: LOW. Test FAILED",
            "Expected: LOW, Observed: LOW. Test PASSED",
        ]
    );

    let verdict = fx.sink.events.last().unwrap();
    assert!(log_sink::render(verdict).1.starts_with(FAILED_MSG));
}

#[test]
fn quiet_mode_reports_no_comparisons() {
    let config = HarnessConfig {
        verbose: false,
        ..HarnessConfig::default()
    };
    let mut fx = Fixture::with(config, ScriptedRunner::default());
    let mut op = fx.operator(2);
    let report = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();

    assert_eq!(report.comparisons, 4);
    assert!(fx.sink.comparisons().is_empty());
}

#[test]
fn stimulus_order_matches_script() {
    let mut fx = Fixture::new();
    let before = fx.sim.writes().len();
    let mut op = fx.operator(2);
    fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();

    assert_eq!(
        fx.sim.writes()[before..],
        [
            (pins::BUTTON_PIN, Level::Low),
            (pins::STATUS_PIN, Level::High),
            (pins::BUTTON_PIN, Level::High),
            (pins::STATUS_PIN, Level::Low),
        ]
    );
}

#[test]
fn cycle_waits_settle_and_check_intervals() {
    let mut fx = Fixture::new();
    let start = fx.sim.elapsed_ms();
    let mut op = fx.operator(2);
    fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();

    // 4 writes × 100 ms settle + 1200 ms power-on + 2 × 100 ms checks
    assert_eq!(fx.sim.elapsed_ms() - start, 400 + 1200 + 200);
}

// ── Failing board ─────────────────────────────────────────────

#[test]
fn no_power_on_fails_and_blinks_fast() {
    let mut fx = Fixture::new();
    fx.sim.set_fault(Some(DutFault::NoPowerOn));
    let mut op = fx.operator(2);

    let report = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();
    assert!(!report.passed);
    // 5V low at power-on and shutdown checks, shutdown never raised.
    assert_eq!(report.failures, 3);

    let shown = op.indicator_at(1);
    assert!(shown.running);
    assert_eq!(shown.frequency_hz, 5.0);
    assert_eq!(shown.duty_percent, 50.0, "running duty carried into blink");

    let led = fx.indicator();
    assert_eq!(led.frequency_hz, 1.0);
    assert_eq!(led.duty_percent, 0.0);
}

#[test]
fn missing_shutdown_request_fails_single_check() {
    let mut fx = Fixture::new();
    fx.sim.force_input(pins::SHUTDOWN_SIGNAL_PIN, Level::Low);
    let mut op = fx.operator(2);

    let report = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();
    assert!(!report.passed);
    assert_eq!(report.failures, 1);
    assert_eq!(report.comparisons, 4);
}

#[test]
fn stuck_rail_fails_power_off_check() {
    let mut fx = Fixture::new();
    fx.sim.set_fault(Some(DutFault::StuckOn));
    let mut op = fx.operator(2);

    let report = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();
    assert!(!report.passed);
    assert_eq!(report.failures, 1);
}

#[test]
fn verdict_is_fresh_each_cycle() {
    let mut fx = Fixture::new();
    let mut op = fx.operator(4);

    fx.sim.set_fault(Some(DutFault::NoPowerOn));
    let first = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();
    fx.sim.set_fault(None);
    let second = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();

    assert!(!first.passed);
    assert!(second.passed);
    assert_eq!(second.cycle, 2);
}

// ── Loop termination ──────────────────────────────────────────

#[test]
fn run_loops_until_operator_console_closes() {
    let mut fx = Fixture::new();
    let mut op = fx.operator(4);

    let err = fx.harness.run(&mut op, &mut fx.sink).unwrap_err();
    assert!(matches!(err, Error::Operator(_)));
    assert_eq!(fx.harness.cycles(), 2);
    assert_eq!(op.prompts.len(), 5);
}

#[test]
fn closing_console_mid_cycle_leaves_verdict_on_indicator() {
    let mut fx = Fixture::new();
    let mut op = fx.operator(1);

    assert!(fx.harness.run_cycle(&mut op, &mut fx.sink).is_err());
    assert_eq!(fx.indicator().duty_percent, 100.0);
}
