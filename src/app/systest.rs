//! Pass/fail aggregation across one test cycle.
//!
//! ```text
//!   PASSING ──(mismatch)──▶ FAILED   (terminal)
//! ```
//!
//! A fresh [`SystemTest`] is created for every cycle; it never resets.
//! In verbose mode the harness reports every recorded [`Comparison`],
//! including those made after the transition to FAILED.

use core::fmt::{self, Display};

/// One recorded expected-vs-observed comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub expected: String,
    pub observed: String,
    pub passed: bool,
}

impl Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Expected: {}, Observed: {}. Test {}",
            self.expected,
            self.observed,
            if self.passed { "PASSED" } else { "FAILED" }
        )
    }
}

#[derive(Debug, Default)]
pub struct SystemTest {
    failed: bool,
    verbose: bool,
    history: Vec<Comparison>,
}

impl SystemTest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Compare `observed` against `expected`; a mismatch fails the test for
    /// the rest of this accumulator's life.
    ///
    /// The return value reflects only this comparison.
    pub fn test_equals<T: PartialEq + Display>(&mut self, observed: T, expected: T) -> bool {
        let passed = observed == expected;
        if !passed {
            self.failed = true;
        }
        self.history.push(Comparison {
            expected: expected.to_string(),
            observed: observed.to_string(),
            passed,
        });
        passed
    }

    pub fn has_passed(&self) -> bool {
        !self.failed
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.history
    }

    /// Most recent comparison, if any.
    pub fn last(&self) -> Option<&Comparison> {
        self.history.last()
    }

    pub fn failure_count(&self) -> usize {
        self.history.iter().filter(|c| !c.passed).count()
    }
}
