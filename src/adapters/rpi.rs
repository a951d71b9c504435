//! Raspberry Pi GPIO adapter (rppal).
//!
//! [`RpiBoard::open`] is the one-time hardware initialisation: it maps the
//! GPIO peripheral and returns the handle every fixture pin is claimed
//! through.  Header numbers are translated to BCM with
//! [`pins::header_to_bcm`].
//!
//! Pins are not reset when dropped, so an interrupted run leaves the
//! fixture lines at their last-written level.  The indicator uses rppal's
//! software PWM.

use log::{info, warn};
use rppal::gpio::{self, Gpio, InputPin, OutputPin};

use crate::app::ports::{Board, DigitalInput, DigitalOutput, Level, PwmChannel};
use crate::error::{Error, Result};
use crate::pins;

impl From<Level> for gpio::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => gpio::Level::Low,
            Level::High => gpio::Level::High,
        }
    }
}

impl From<gpio::Level> for Level {
    fn from(level: gpio::Level) -> Self {
        match level {
            gpio::Level::Low => Level::Low,
            gpio::Level::High => Level::High,
        }
    }
}

pub struct RpiBoard {
    gpio: Gpio,
}

impl RpiBoard {
    pub fn open() -> Result<Self> {
        let gpio = Gpio::new()?;
        info!("rpi: GPIO peripheral mapped (header numbering)");
        Ok(Self { gpio })
    }

    fn claim(&self, header_pin: u8) -> Result<gpio::Pin> {
        let bcm = pins::header_to_bcm(header_pin).ok_or(Error::Init("header pin is not a GPIO"))?;
        Ok(self.gpio.get(bcm)?)
    }
}

impl Board for RpiBoard {
    type Output = RpiOutput;
    type Input = RpiInput;
    type Pwm = RpiPwm;

    fn output(&mut self, header_pin: u8, initial: Level) -> Result<RpiOutput> {
        let pin = self.claim(header_pin)?;
        let mut out = match initial {
            Level::Low => pin.into_output_low(),
            Level::High => pin.into_output_high(),
        };
        out.set_reset_on_drop(false);
        Ok(RpiOutput(out))
    }

    fn input_pulldown(&mut self, header_pin: u8) -> Result<RpiInput> {
        let mut input = self.claim(header_pin)?.into_input_pulldown();
        input.set_reset_on_drop(false);
        Ok(RpiInput(input))
    }

    fn pwm(&mut self, header_pin: u8) -> Result<RpiPwm> {
        let mut pin = self.claim(header_pin)?.into_output_low();
        pin.set_reset_on_drop(false);
        Ok(RpiPwm {
            header_pin,
            pin,
            frequency_hz: 0.0,
        })
    }
}

pub struct RpiOutput(OutputPin);

impl DigitalOutput for RpiOutput {
    fn write(&mut self, level: Level) {
        self.0.write(level.into());
    }
}

pub struct RpiInput(InputPin);

impl DigitalInput for RpiInput {
    fn read(&self) -> Level {
        self.0.read().into()
    }
}

pub struct RpiPwm {
    header_pin: u8,
    pin: OutputPin,
    frequency_hz: f64,
}

impl RpiPwm {
    fn apply(&mut self, duty_percent: f64) {
        if let Err(e) = self
            .pin
            .set_pwm_frequency(self.frequency_hz, duty_percent / 100.0)
        {
            warn!("rpi: PWM on pin {} rejected: {}", self.header_pin, e);
        }
    }
}

impl PwmChannel for RpiPwm {
    fn start(&mut self, frequency_hz: f64, duty_percent: f64) {
        self.frequency_hz = frequency_hz;
        self.apply(duty_percent);
    }

    fn change_duty_cycle(&mut self, duty_percent: f64) {
        self.apply(duty_percent);
    }

    fn stop(&mut self) {
        if let Err(e) = self.pin.clear_pwm() {
            warn!("rpi: PWM stop on pin {} failed: {}", self.header_pin, e);
        }
        self.pin.set_low();
    }
}
