//! Operator console adapter.
//!
//! Prints the prompt and blocks until a line is read.  Generic over the
//! reader/writer so tests can drive it from a byte buffer.

use std::io::{self, BufRead, Write};

use crate::app::ports::OperatorPort;
use crate::error::{Error, Result};

pub struct ConsoleOperator<I, O> {
    input: I,
    output: O,
}

impl ConsoleOperator<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<I: BufRead, O: Write> ConsoleOperator<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

impl<I: BufRead, O: Write> OperatorPort for ConsoleOperator<I, O> {
    fn confirm(&mut self, prompt: &str) -> Result<()> {
        write!(self.output, "{} ", prompt).map_err(Error::Operator)?;
        self.output.flush().map_err(Error::Operator)?;

        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(Error::Operator)?;
        if n == 0 {
            return Err(Error::Operator(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "console closed",
            )));
        }
        Ok(())
    }
}
