//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the harness against the
//! simulated board and mock adapters.  All tests run on the host with no
//! real hardware required.

mod gating_tests;
mod harness_tests;
mod programmer_tests;
