//! Digital input signal observed on the board under test.

use core::fmt;

use crate::app::ports::{DigitalInput, Level};

pub struct InputSignal<P> {
    name: &'static str,
    header_pin: u8,
    pin: P,
}

impl<P: DigitalInput> InputSignal<P> {
    pub fn new(name: &'static str, header_pin: u8, pin: P) -> Self {
        Self {
            name,
            header_pin,
            pin,
        }
    }

    /// Sample the pin.  No caching.
    pub fn read(&self) -> Level {
        self.pin.read()
    }

    pub fn is_high(&self) -> bool {
        self.read().is_high()
    }
}

impl<P: DigitalInput> fmt::Display for InputSignal<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signal '{}' on pin {}, current level: {}",
            self.name,
            self.header_pin,
            self.read()
        )
    }
}
