//! Fixture signal drivers built on the pin ports.

pub mod expander_scan;
pub mod input;
pub mod output;
pub mod programmer;
pub mod status_led;
