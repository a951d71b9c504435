//! Integration tests: optional firmware flash step inside a cycle.

use std::io;

use powerblock_systest::adapters::log_sink;
use powerblock_systest::app::events::HarnessEvent;
use powerblock_systest::app::service::{CHECK_FIRMWARE, CHECK_POWER_ON};
use powerblock_systest::config::HarnessConfig;
use powerblock_systest::drivers::programmer::FLASH_FAILED_MSG;

use super::mock_hw::{Fixture, ScriptedRunner};

fn flashing(results: Vec<io::Result<Option<i32>>>) -> Fixture {
    let config = HarnessConfig {
        flash_firmware: true,
        ..HarnessConfig::default()
    };
    Fixture::with(config, ScriptedRunner::returning(results))
}

#[test]
fn flash_is_skipped_by_default() {
    let mut fx = Fixture::new();
    let mut op = fx.operator(2);
    let report = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();
    assert_eq!(report.comparisons, 4);
    assert!(
        !fx.sink
            .events
            .iter()
            .any(|e| matches!(e, HarnessEvent::FirmwareFlashed(_)))
    );
}

#[test]
fn successful_flash_adds_passing_check_before_power_on() {
    let mut fx = flashing(vec![Ok(Some(0))]);
    let mut op = fx.operator(2);
    let report = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();

    assert!(report.passed);
    assert_eq!(report.comparisons, 5);
    let steps = fx.sink.steps();
    assert_eq!(*steps[1], HarnessEvent::FirmwareFlashed(0));
    assert_eq!(*steps[2], HarnessEvent::Check(CHECK_FIRMWARE));
    assert_eq!(*steps[3], HarnessEvent::Check(CHECK_POWER_ON));
    assert_eq!(fx.sink.comparisons()[0].to_string(), "Expected: 0, Observed: 0. Test PASSED");

    let calls = &fx.harness.runner().calls;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "avrdude");
}

#[test]
fn failed_flash_fails_cycle_with_tool_exit_code() {
    let mut fx = flashing(vec![Ok(Some(1))]);
    let mut op = fx.operator(2);
    let report = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();

    assert!(!report.passed);
    assert_eq!(report.failures, 1);
    assert_eq!(fx.sink.events[1], HarnessEvent::FirmwareFlashed(1));
    assert!(log_sink::render(&fx.sink.events[1]).1.starts_with(FLASH_FAILED_MSG));
    assert_eq!(fx.sink.comparisons()[0].to_string(), "Expected: 0, Observed: 1. Test FAILED");
}

#[test]
fn unstartable_tool_fails_cycle_without_aborting() {
    let mut fx = flashing(vec![Err(io::Error::new(io::ErrorKind::NotFound, "avrdude"))]);
    let mut op = fx.operator(2);
    let report = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();

    assert!(!report.passed);
    assert_eq!(report.comparisons, 5);
    assert_eq!(fx.sink.events[1], HarnessEvent::FirmwareFlashed(-1));
}
