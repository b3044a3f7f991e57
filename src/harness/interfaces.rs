//! Process boundary of the harness
//!
//! A case hands one composed command line to a `CommandExecutor` and reads back only the exit
//! status. The trait exists so runs can be redirected (dry-run, recording in tests) without
//! touching case logic.

use std::process::Command;

use thiserror::Error;

use super::command::CommandError;

/// Errors that occur while preparing or executing a case
#[derive(Debug, Error)]
pub enum TestError {
    #[error("failed to build command: {0}")]
    Command(#[from] CommandError),

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve fixture `{name}`: {reason}")]
    Fixture { name: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Exit status of an executed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The process exited with this code.
    Code(i32),
    /// The process was terminated without an exit code (e.g. by a signal).
    Terminated,
}

impl ExitStatus {
    /// A command succeeded iff it exited with code 0.
    pub fn success(self) -> bool {
        self == ExitStatus::Code(0)
    }
}

/// Execute a composed command line and report how it exited.
pub trait CommandExecutor {
    /// Run `command` to completion. Blocks the caller until the child terminates.
    fn execute(&self, command: &str) -> Result<ExitStatus, TestError>;
}

/// Runs commands through `sh -c`, the way a shell `system()` call does.
///
/// Standard streams are inherited; commands that want logs redirect them themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command: &str) -> Result<ExitStatus, TestError> {
        tracing::debug!(command, "spawning shell");
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .map_err(|source| TestError::Spawn {
                command: command.to_string(),
                source,
            })?;

        Ok(match status.code() {
            Some(code) => ExitStatus::Code(code),
            None => ExitStatus::Terminated,
        })
    }
}
