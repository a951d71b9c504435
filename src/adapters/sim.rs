//! In-memory board for host runs and tests.
//!
//! [`SimBoard`] hands out pins backed by one shared state.  By default a
//! model of the PowerBlock reacts to the button and status lines the way
//! a healthy board does, so the full sequence passes without hardware.
//! Faults can be injected into the model, and any input can be forced.
//!
//! Time is virtual: [`SimDelay`] advances a clock instead of sleeping and
//! applies input changes scheduled with [`SimHandle::schedule_input`].

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::ports::{Board, DigitalInput, DigitalOutput, Level, PwmChannel};
use crate::error::{Error, Result};
use crate::pins;

// ───────────────────────────────────────────────────────────────
// Device-under-test model
// ───────────────────────────────────────────────────────────────

/// Defects the modelled board can be given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutFault {
    /// Pressing the button never enables the 5V rail.
    NoPowerOn,
    /// Releasing the button never raises the shutdown request.
    NoShutdownRequest,
    /// The 5V rail stays on after the host drops its status line.
    StuckOn,
}

/// Power-path behaviour of the PowerBlock as seen from the fixture.
#[derive(Debug, Default, Clone, Copy)]
struct PowerBlockModel {
    powered: bool,
    shutdown_requested: bool,
    button_held: bool,
    fault: Option<DutFault>,
}

impl PowerBlockModel {
    fn update(&mut self, button: Level, status: Level) {
        if button == Level::Low {
            if !self.button_held && self.fault != Some(DutFault::NoPowerOn) {
                self.powered = true;
                self.shutdown_requested = false;
            }
            self.button_held = true;
        } else if self.button_held {
            self.button_held = false;
            if self.powered
                && status == Level::High
                && self.fault != Some(DutFault::NoShutdownRequest)
            {
                self.shutdown_requested = true;
            }
        }

        if self.shutdown_requested && status == Level::Low && self.fault != Some(DutFault::StuckOn)
        {
            self.powered = false;
            self.shutdown_requested = false;
        }
    }

    fn drives(&self, header_pin: u8) -> Option<Level> {
        match header_pin {
            pins::SUPPLY_5V_PIN => Some(self.powered.into()),
            pins::SHUTDOWN_SIGNAL_PIN => Some(self.shutdown_requested.into()),
            pins::BOARD_ATTACHED_PIN => Some(Level::High),
            _ => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Shared state
// ───────────────────────────────────────────────────────────────

/// Observable state of a simulated PWM channel.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PwmState {
    pub running: bool,
    pub frequency_hz: f64,
    pub duty_percent: f64,
    /// Number of times the channel was (re)started.
    pub starts: u32,
}

/// Output writes kept for inspection; older entries are dropped.
pub const WRITE_LOG_CAPACITY: usize = 256;

#[derive(Default)]
struct SimState {
    claimed: HashSet<u8>,
    outputs: HashMap<u8, Level>,
    forced: HashMap<u8, Level>,
    pwm: HashMap<u8, PwmState>,
    model: Option<PowerBlockModel>,
    writes: VecDeque<(u8, Level)>,
    elapsed_ns: u64,
    scheduled: Vec<(u64, u8, Level)>,
}

impl SimState {
    fn claim(&mut self, header_pin: u8) -> Result<()> {
        if pins::header_to_bcm(header_pin).is_none() {
            return Err(Error::Init("header pin is not a GPIO"));
        }
        if !self.claimed.insert(header_pin) {
            return Err(Error::Init("header pin already claimed"));
        }
        Ok(())
    }

    fn write(&mut self, header_pin: u8, level: Level) {
        self.outputs.insert(header_pin, level);
        if self.writes.len() == WRITE_LOG_CAPACITY {
            self.writes.pop_front();
        }
        self.writes.push_back((header_pin, level));
        let button = self.output(pins::BUTTON_PIN);
        let status = self.output(pins::STATUS_PIN);
        if let (Some(model), Some(button), Some(status)) = (self.model.as_mut(), button, status) {
            model.update(button, status);
        }
    }

    fn output(&self, header_pin: u8) -> Option<Level> {
        self.outputs.get(&header_pin).copied()
    }

    fn input(&self, header_pin: u8) -> Level {
        if let Some(level) = self.forced.get(&header_pin) {
            return *level;
        }
        self.model
            .and_then(|m| m.drives(header_pin))
            .unwrap_or(Level::Low)
    }

    fn advance(&mut self, ns: u64) {
        self.elapsed_ns += ns;
        let now_ms = self.elapsed_ns / 1_000_000;
        let (due, pending): (Vec<_>, Vec<_>) = self
            .scheduled
            .drain(..)
            .partition(|(at_ms, _, _)| *at_ms <= now_ms);
        self.scheduled = pending;
        for (_, pin, level) in due {
            debug!("sim: pin {} forced {} at {} ms", pin, level, now_ms);
            self.forced.insert(pin, level);
        }
    }
}

type Shared = Rc<RefCell<SimState>>;

// ───────────────────────────────────────────────────────────────
// Board
// ───────────────────────────────────────────────────────────────

pub struct SimBoard {
    state: Shared,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    /// Board with a healthy PowerBlock attached.
    pub fn new() -> Self {
        let state = SimState {
            model: Some(PowerBlockModel::default()),
            ..SimState::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Board with nothing attached: unforced inputs read LOW.
    pub fn bare() -> Self {
        Self {
            state: Rc::new(RefCell::new(SimState::default())),
        }
    }

    /// Inspection and fault-injection handle sharing this board's state.
    pub fn handle(&self) -> SimHandle {
        SimHandle {
            state: Rc::clone(&self.state),
        }
    }

    /// Delay that advances this board's virtual clock.
    pub fn delay(&self) -> SimDelay {
        SimDelay {
            state: Rc::clone(&self.state),
        }
    }
}

impl Board for SimBoard {
    type Output = SimOutput;
    type Input = SimInput;
    type Pwm = SimPwm;

    fn output(&mut self, header_pin: u8, initial: Level) -> Result<SimOutput> {
        let mut state = self.state.borrow_mut();
        state.claim(header_pin)?;
        state.write(header_pin, initial);
        Ok(SimOutput {
            header_pin,
            state: Rc::clone(&self.state),
        })
    }

    fn input_pulldown(&mut self, header_pin: u8) -> Result<SimInput> {
        self.state.borrow_mut().claim(header_pin)?;
        Ok(SimInput {
            header_pin,
            state: Rc::clone(&self.state),
        })
    }

    fn pwm(&mut self, header_pin: u8) -> Result<SimPwm> {
        let mut state = self.state.borrow_mut();
        state.claim(header_pin)?;
        state.pwm.insert(header_pin, PwmState::default());
        Ok(SimPwm {
            header_pin,
            state: Rc::clone(&self.state),
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Pins
// ───────────────────────────────────────────────────────────────

pub struct SimOutput {
    header_pin: u8,
    state: Shared,
}

impl DigitalOutput for SimOutput {
    fn write(&mut self, level: Level) {
        self.state.borrow_mut().write(self.header_pin, level);
    }
}

pub struct SimInput {
    header_pin: u8,
    state: Shared,
}

impl DigitalInput for SimInput {
    fn read(&self) -> Level {
        self.state.borrow().input(self.header_pin)
    }
}

pub struct SimPwm {
    header_pin: u8,
    state: Shared,
}

impl SimPwm {
    fn with<F: FnOnce(&mut PwmState)>(&mut self, f: F) {
        let mut state = self.state.borrow_mut();
        if let Some(pwm) = state.pwm.get_mut(&self.header_pin) {
            f(pwm);
        }
    }
}

impl PwmChannel for SimPwm {
    fn start(&mut self, frequency_hz: f64, duty_percent: f64) {
        self.with(|pwm| {
            pwm.running = true;
            pwm.frequency_hz = frequency_hz;
            pwm.duty_percent = duty_percent;
            pwm.starts += 1;
        });
    }

    fn change_duty_cycle(&mut self, duty_percent: f64) {
        self.with(|pwm| pwm.duty_percent = duty_percent);
    }

    fn stop(&mut self) {
        self.with(|pwm| pwm.running = false);
    }
}

// ───────────────────────────────────────────────────────────────
// Virtual clock
// ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct SimDelay {
    state: Shared,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.state.borrow_mut().advance(u64::from(ns));
    }
}

// ───────────────────────────────────────────────────────────────
// Test handle
// ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct SimHandle {
    state: Shared,
}

impl SimHandle {
    /// Pin `header_pin` to `level` regardless of the model.
    pub fn force_input(&self, header_pin: u8, level: Level) {
        self.state.borrow_mut().forced.insert(header_pin, level);
    }

    /// Return `header_pin` to model control.
    pub fn release_input(&self, header_pin: u8) {
        self.state.borrow_mut().forced.remove(&header_pin);
    }

    /// Force `header_pin` to `level` once the virtual clock reaches `at_ms`.
    pub fn schedule_input(&self, at_ms: u64, header_pin: u8, level: Level) {
        self.state
            .borrow_mut()
            .scheduled
            .push((at_ms, header_pin, level));
    }

    pub fn set_fault(&self, fault: Option<DutFault>) {
        if let Some(model) = self.state.borrow_mut().model.as_mut() {
            model.fault = fault;
        }
    }

    /// Last level written to `header_pin`, `None` if it was never driven.
    pub fn output(&self, header_pin: u8) -> Option<Level> {
        self.state.borrow().output(header_pin)
    }

    pub fn input(&self, header_pin: u8) -> Level {
        self.state.borrow().input(header_pin)
    }

    pub fn pwm(&self, header_pin: u8) -> Option<PwmState> {
        self.state.borrow().pwm.get(&header_pin).copied()
    }

    /// The most recent output writes in order, initial levels included.
    /// At most [`WRITE_LOG_CAPACITY`] are kept.
    pub fn writes(&self) -> Vec<(u8, Level)> {
        self.state.borrow().writes.iter().copied().collect()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.state.borrow().elapsed_ns / 1_000_000
    }
}
