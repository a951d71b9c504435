//! PowerBlock system-test harness library.
//!
//! Exposes the test sequence, signal drivers and adapters for the binary
//! and for integration testing.  Raspberry Pi GPIO access is guarded by the
//! `rpi` feature; everything else runs on any host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;

pub use error::{Error, Result};
