//! Synchronous external command execution.
//!
//! Every mount, unmount, copy, link, and removal the bind manager performs
//! is an argv handed to a [`CommandRunner`]. A non-zero exit is reported as
//! [`KiwiError::Command`] with the captured stderr.

use std::process::Command;

use kiwi_common::error::{KiwiError, Result};

/// Output from a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output from the command.
    pub stdout: String,
    /// Standard error from the command.
    pub stderr: String,
}

/// Runs an argument vector to completion.
///
/// Implementations block until the command exits and fail on any non-zero
/// exit status.
pub trait CommandRunner {
    /// Executes `argv`, where `argv[0]` is the program.
    ///
    /// # Errors
    ///
    /// Returns [`KiwiError::Command`] on non-zero exit, or
    /// [`KiwiError::Config`] / [`KiwiError::Io`] if the command cannot be
    /// started at all.
    fn run(&self, argv: &[String]) -> Result<CommandOutput>;
}

/// Runner that spawns real host processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String]) -> Result<CommandOutput> {
        let (program, args) = argv.split_first().ok_or_else(|| KiwiError::Config {
            message: "command is empty".into(),
        })?;
        tracing::debug!(cmd = ?argv, "running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| KiwiError::Io {
                path: program.into(),
                source: e,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(KiwiError::Command {
                command: argv.join(" "),
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_owned(),
            });
        }
        Ok(CommandOutput { stdout, stderr })
    }
}

/// Builds an owned argv from string-like parts.
pub fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}
