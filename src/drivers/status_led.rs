//! Status indicator LED on a PWM channel.
//!
//! Duty cycle encodes progress (50 = running, 100 = passed), frequency
//! encodes failure (fast blink).
//!
//! Changing the frequency stops the channel and starts a new one at the
//! new frequency, carrying over the last duty cycle that was set.
//! Out-of-range values are clamped with a warning.

use log::warn;

use crate::app::ports::PwmChannel;

/// Lowest frequency the indicator will run at.
pub const MIN_PWM_FREQUENCY_HZ: f64 = 0.1;

/// Channel settings applied when the indicator is created.
pub const INITIAL_FREQUENCY_HZ: f64 = 1.0;
pub const INITIAL_DUTY_PERCENT: f64 = 1.0;

pub struct StatusIndicator<C> {
    name: &'static str,
    channel: C,
    duty_percent: f64,
    frequency_hz: f64,
}

impl<C: PwmChannel> StatusIndicator<C> {
    /// Take ownership of the channel and start it at the initial settings.
    pub fn new(name: &'static str, mut channel: C) -> Self {
        channel.start(INITIAL_FREQUENCY_HZ, INITIAL_DUTY_PERCENT);
        Self {
            name,
            channel,
            duty_percent: INITIAL_DUTY_PERCENT,
            frequency_hz: INITIAL_FREQUENCY_HZ,
        }
    }

    pub fn set_duty_cycle(&mut self, duty_percent: f64) {
        let duty = clamp_duty(self.name, duty_percent);
        self.channel.change_duty_cycle(duty);
        self.duty_percent = duty;
    }

    pub fn set_frequency(&mut self, frequency_hz: f64) {
        let freq = clamp_frequency(self.name, frequency_hz);
        self.channel.stop();
        self.channel.start(freq, self.duty_percent);
        self.frequency_hz = freq;
    }

    pub fn duty_cycle(&self) -> f64 {
        self.duty_percent
    }

    pub fn frequency(&self) -> f64 {
        self.frequency_hz
    }
}

fn clamp_duty(name: &str, duty: f64) -> f64 {
    if duty.is_nan() {
        warn!("{}: duty cycle NaN, using 0", name);
        return 0.0;
    }
    if !(0.0..=100.0).contains(&duty) {
        let clamped = duty.clamp(0.0, 100.0);
        warn!("{}: duty cycle {} clamped to {}", name, duty, clamped);
        return clamped;
    }
    duty
}

fn clamp_frequency(name: &str, freq: f64) -> f64 {
    if !freq.is_finite() || freq < MIN_PWM_FREQUENCY_HZ {
        warn!(
            "{}: frequency {} Hz out of range, using {} Hz",
            name, freq, MIN_PWM_FREQUENCY_HZ
        );
        return MIN_PWM_FREQUENCY_HZ;
    }
    freq
}
