//! Executes one [`TaskDefinition`] to completion.
//!
//! A run moves through `Launched -> Draining -> Terminated`. A launch error
//! never reaches `Launched`; a read error while draining kills the child and
//! hands back whatever output was gathered before the failure.

mod process;
mod result;

pub use process::{ProcessRunner, RunningProcess, SystemChild, SystemProcess};
pub use result::{Outcome, RunResult, classify};

use crate::task::TaskDefinition;
use colored::*;
use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("lost the output of `{command}` after {} line(s): {source}", .partial_output.len())]
    Drain {
        command: String,
        partial_output: Vec<String>,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    pub fn command(&self) -> &str {
        match self {
            RunError::Launch { command, .. } | RunError::Drain { command, .. } => command,
        }
    }

    /// Output gathered before the failure. Always empty for launch errors.
    pub fn partial_output(&self) -> &[String] {
        match self {
            RunError::Launch { .. } => &[],
            RunError::Drain { partial_output, .. } => partial_output,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Launched,
    Draining,
    Terminated,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Launched => "launched",
            RunPhase::Draining => "draining output",
            RunPhase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

pub struct TaskRunner<P = SystemProcess> {
    process: P,
    verbose: bool,
}

impl TaskRunner<SystemProcess> {
    pub fn system() -> Self {
        Self::new(SystemProcess)
    }
}

impl<P: ProcessRunner> TaskRunner<P> {
    pub fn new(process: P) -> Self {
        Self {
            process,
            verbose: false,
        }
    }

    /// Logs phase transitions to stderr.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn process(&self) -> &P {
        &self.process
    }

    pub fn run(&self, task: &TaskDefinition) -> Result<RunResult, RunError> {
        let mut child = self
            .process
            .spawn(task)
            .map_err(|source| RunError::Launch {
                command: task.command_line(),
                source,
            })?;
        self.trace(task, RunPhase::Launched);

        self.trace(task, RunPhase::Draining);
        let mut captured = Vec::new();
        while let Some(line) = child.next_line() {
            match line {
                Ok(line) => captured.push(line),
                Err(source) => {
                    child.kill();
                    return Err(RunError::Drain {
                        command: task.command_line(),
                        partial_output: captured,
                        source,
                    });
                }
            }
        }

        let exit_code = match child.wait() {
            Ok(code) => code,
            Err(source) => {
                return Err(RunError::Drain {
                    command: task.command_line(),
                    partial_output: captured,
                    source,
                });
            }
        };
        self.trace(task, RunPhase::Terminated);

        if self.verbose {
            eprintln!(
                "   {} {} line(s) captured, exit code {}",
                "·".dimmed(),
                captured.len(),
                exit_code
            );
        }

        Ok(RunResult::new(exit_code, captured))
    }

    fn trace(&self, task: &TaskDefinition, phase: RunPhase) {
        if self.verbose {
            eprintln!("   {} [{}] {}", "·".dimmed(), task.label().cyan(), phase);
        }
    }
}
