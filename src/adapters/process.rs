//! External process adapter.
//!
//! `run` inherits stdio so the programmer's progress output reaches the
//! operator console unchanged; `capture` collects stdout for tools whose
//! output is inspected (the I²C bus scan).

use std::io;
use std::process::{Command, Stdio};

use log::debug;

use crate::app::ports::{CommandOutput, CommandRunner};

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&mut self, program: &str, args: &[String]) -> io::Result<Option<i32>> {
        debug!("exec: {} {}", program, args.join(" "));
        let status = Command::new(program).args(args).status()?;
        Ok(status.code())
    }

    fn capture(&mut self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        debug!("exec (captured): {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
