//! Application core: the test sequence and its verdict, zero direct I/O.
//!
//! All interaction with pins, the operator and external tools happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable against the simulated board.

pub mod events;
pub mod ports;
pub mod service;
pub mod systest;
