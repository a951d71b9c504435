//! Integration tests: cycles gated on the board-attached contact.

use powerblock_systest::adapters::sim::SimHandle;
use powerblock_systest::app::events::HarnessEvent;
use powerblock_systest::app::ports::{EventSink, Level};
use powerblock_systest::config::HarnessConfig;
use powerblock_systest::pins;

use super::mock_hw::{Fixture, ScriptedRunner};

/// Notes the virtual time at which the cycle started.
struct TimedSink {
    sim: SimHandle,
    started_at: Option<u64>,
}

impl EventSink for TimedSink {
    fn emit(&mut self, event: &HarnessEvent) {
        if matches!(event, HarnessEvent::CycleStarted(_)) {
            self.started_at = Some(self.sim.elapsed_ms());
        }
    }
}

fn attach_gated() -> Fixture {
    let config = HarnessConfig {
        await_board_attach: true,
        ..HarnessConfig::default()
    };
    Fixture::with(config, ScriptedRunner::default())
}

#[test]
fn attach_and_removal_replace_operator_prompts() {
    let mut fx = attach_gated();
    fx.sim.schedule_input(10_000, pins::BOARD_ATTACHED_PIN, Level::Low);
    let mut op = fx.operator(0);

    let report = fx.harness.run_cycle(&mut op, &mut fx.sink).unwrap();
    assert!(report.passed);
    assert!(op.prompts.is_empty(), "operator must not be prompted");
    // Removal seen at 10 s, confirmed one debounce later.
    assert!(fx.sim.elapsed_ms() >= 11_000);
    assert_eq!(fx.indicator().duty_percent, 0.0);
}

#[test]
fn contact_bounce_does_not_start_cycle() {
    let mut fx = attach_gated();
    fx.sim.force_input(pins::BOARD_ATTACHED_PIN, Level::Low);
    fx.sim.schedule_input(200, pins::BOARD_ATTACHED_PIN, Level::High);
    fx.sim.schedule_input(700, pins::BOARD_ATTACHED_PIN, Level::Low);
    fx.sim.schedule_input(2_000, pins::BOARD_ATTACHED_PIN, Level::High);
    fx.sim.schedule_input(8_000, pins::BOARD_ATTACHED_PIN, Level::Low);

    let mut sink = TimedSink {
        sim: fx.sim.clone(),
        started_at: None,
    };
    let mut op = fx.operator(0);
    fx.harness.run_cycle(&mut op, &mut sink).unwrap();

    let started = sink.started_at.expect("cycle started");
    assert!(started >= 3_000, "started at {} ms, before contact settled", started);
}
