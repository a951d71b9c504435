//! Digital output signal driving a line of the board under test.
//!
//! Every write is followed by a fixed settle delay so downstream circuitry
//! has reacted before the next read.  The recorded level is only changed by
//! the setters below, so it always equals the last value written.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::app::ports::{DigitalOutput, Level};

/// Which physical level counts as "asserted".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    pub fn asserted(self) -> Level {
        match self {
            Self::ActiveHigh => Level::High,
            Self::ActiveLow => Level::Low,
        }
    }

    pub fn deasserted(self) -> Level {
        match self {
            Self::ActiveHigh => Level::Low,
            Self::ActiveLow => Level::High,
        }
    }
}

pub struct OutputSignal<P, D> {
    name: &'static str,
    header_pin: u8,
    polarity: Polarity,
    level: Level,
    settle_ms: u32,
    pin: P,
    delay: D,
}

impl<P: DigitalOutput, D: DelayNs> OutputSignal<P, D> {
    /// Wrap a pin that the board already drives to `initial`.
    pub fn new(
        name: &'static str,
        header_pin: u8,
        polarity: Polarity,
        pin: P,
        initial: Level,
        delay: D,
        settle_ms: u32,
    ) -> Self {
        Self {
            name,
            header_pin,
            polarity,
            level: initial,
            settle_ms,
            pin,
            delay,
        }
    }

    pub fn assert(&mut self) {
        self.set_level(self.polarity.asserted());
    }

    pub fn deassert(&mut self) {
        self.set_level(self.polarity.deasserted());
    }

    pub fn set_level(&mut self, level: Level) {
        self.pin.write(level);
        self.level = level;
        self.delay.delay_ms(self.settle_ms);
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_asserted(&self) -> bool {
        self.level == self.polarity.asserted()
    }
}

impl<P, D> fmt::Display for OutputSignal<P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Button '{}' on pin {}, current level: {}",
            self.name, self.header_pin, self.level
        )
    }
}
