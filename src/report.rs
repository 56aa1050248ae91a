//! Human-readable run reports and the exit status they map to.
//!
//! Every failure path prints the command line that was attempted and any
//! output that was captured, so a failed run can be diagnosed without running
//! it again.

use crate::runner::{Outcome, RunError, RunResult};
use crate::task::TaskDefinition;
use colored::*;
use std::io::{self, Write};
use std::process::ExitCode;

/// Final status of a harness invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessExit {
    Success,
    /// The toolchain ran and exited non-zero.
    ToolchainFailure,
    /// The toolchain could not be started, or its output could not be read.
    LaunchFailure,
    /// A task or the configuration holding it was malformed.
    InvalidTask,
}

impl HarnessExit {
    pub fn code(self) -> u8 {
        match self {
            HarnessExit::Success => 0,
            HarnessExit::ToolchainFailure => 1,
            HarnessExit::LaunchFailure => 2,
            HarnessExit::InvalidTask => 3,
        }
    }

    pub fn is_success(self) -> bool {
        self == HarnessExit::Success
    }
}

impl From<HarnessExit> for ExitCode {
    fn from(exit: HarnessExit) -> Self {
        ExitCode::from(exit.code())
    }
}

pub fn exit_for(result: &Result<RunResult, RunError>) -> HarnessExit {
    match result {
        Ok(run) => match run.outcome() {
            Outcome::Success => HarnessExit::Success,
            Outcome::Failure => HarnessExit::ToolchainFailure,
        },
        Err(_) => HarnessExit::LaunchFailure,
    }
}

/// Writes the report for one run and returns the matching exit status.
pub fn write_report<W: Write>(
    out: &mut W,
    task: &TaskDefinition,
    result: &Result<RunResult, RunError>,
) -> io::Result<HarnessExit> {
    match result {
        Ok(run) if run.succeeded() => {
            writeln!(out, "{} {} ({})", "✓".green(), "Success!".green().bold(), task.label())?;
            for line in run.captured_output() {
                writeln!(out, "{line}")?;
            }
        }
        Ok(run) => {
            writeln!(
                out,
                "{} {} '{}' exited with code {}",
                "x".red(),
                "Failure!".red().bold(),
                task.label(),
                run.exit_code()
            )?;
            writeln!(out, "   {} {}", "command:".bold(), task.command_line())?;
            write_output(out, run.captured_output())?;
        }
        Err(RunError::Launch { command, source }) => {
            writeln!(
                out,
                "{} {} could not run the toolchain for '{}'",
                "x".red(),
                "Launch failure!".red().bold(),
                task.label()
            )?;
            writeln!(out, "   {} {}", "command:".bold(), command)?;
            writeln!(out, "   {} {}", "reason:".bold(), source)?;
        }
        Err(RunError::Drain {
            command,
            partial_output,
            source,
        }) => {
            writeln!(
                out,
                "{} {} output of '{}' could not be read",
                "x".red(),
                "Launch failure!".red().bold(),
                task.label()
            )?;
            writeln!(out, "   {} {}", "command:".bold(), command)?;
            writeln!(out, "   {} {}", "reason:".bold(), source)?;
            write_output(out, partial_output)?;
        }
    }

    Ok(exit_for(result))
}

fn write_output<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    if lines.is_empty() {
        writeln!(out, "   {}", "(no output captured)".dimmed())?;
        return Ok(());
    }

    writeln!(out, "   {}", format!("--- output ({} lines) ---", lines.len()).dimmed())?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
