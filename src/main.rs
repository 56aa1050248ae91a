//! # tlrun CLI Entry Point
//!
//! Parses arguments with clap, builds the task list and hands it to the
//! harness. This is the only place an outcome becomes a process exit status.
//!
//! ## Commands
//!
//! - `run [LABEL] [--all]` - run tasks from `harness.toml`
//! - `exec <EXECUTABLE> [ARGS]...` - run a one-off command
//! - `list` - show the configured tasks
//! - `init` - write a starter `harness.toml`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tlrun::config::{self, CONFIG_FILE};
use tlrun::harness;
use tlrun::report::HarnessExit;
use tlrun::runner::TaskRunner;
use tlrun::task::TaskDefinition;
use tlrun::ui;

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
}

#[cfg(windows)]
fn enable_windows_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_windows_utf8_console() {}

#[derive(Parser)]
#[command(name = "tlrun")]
#[command(about = "Run a compiler toolchain and report pass/fail", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the task table
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,
    /// Print the command line and each run phase
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a task from the task table
    Run {
        /// Task label (defaults to `default`, then the first task)
        label: Option<String>,
        /// Run every task in order, stopping at the first failure
        #[arg(long, conflicts_with = "label")]
        all: bool,
    },
    /// Run a single command without a task table
    Exec {
        /// Label shown in the report
        #[arg(long, default_value = "exec")]
        label: String,
        /// Leave stderr on the terminal instead of capturing it
        #[arg(long)]
        no_merge_stderr: bool,
        /// Toolchain binary to invoke
        executable: String,
        /// Arguments passed to the toolchain, in order
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List the configured tasks
    List,
    /// Write a starter task table
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    enable_windows_utf8_console();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version also arrive here
            if !e.use_stderr() {
                return ExitCode::SUCCESS;
            }
            return HarnessExit::InvalidTask.into();
        }
    };

    match dispatch(&cli) {
        Ok(exit) => exit.into(),
        Err(e) => {
            eprintln!("{} {:#}", "x".red(), e);
            HarnessExit::InvalidTask.into()
        }
    }
}

fn dispatch(cli: &Cli) -> Result<HarnessExit> {
    match &cli.command {
        Commands::Run { label, all } => {
            let config = config::load_config(&cli.config)?;
            let base_dir = config::base_dir(&cli.config);
            let tasks = if *all {
                config.definitions(&base_dir)?
            } else {
                vec![config.task(label.as_deref(), &base_dir)?]
            };
            Ok(execute(&tasks, cli.verbose))
        }

        Commands::Exec {
            label,
            no_merge_stderr,
            executable,
            args,
        } => {
            let task = TaskDefinition::new(executable, args, label)?
                .with_merge_stderr(!*no_merge_stderr);
            Ok(execute(&[task], cli.verbose))
        }

        Commands::List => {
            let config = config::load_config(&cli.config)?;
            let base_dir = config::base_dir(&cli.config);
            let mut table = ui::Table::new(&["Task", "Command", "Stderr"]);
            for task in config.definitions(&base_dir)? {
                let label = if config.default.as_deref() == Some(task.label()) {
                    format!("{} {}", task.label().bold().green(), "(default)".dimmed())
                } else {
                    task.label().bold().green().to_string()
                };
                let stderr = if task.merge_stderr() { "captured" } else { "terminal" };
                table.add_row(vec![label, task.command_line(), stderr.to_string()]);
            }
            table.print();
            Ok(HarnessExit::Success)
        }

        Commands::Init { force } => {
            init_config(&cli.config, *force)?;
            Ok(HarnessExit::Success)
        }
    }
}

fn execute(tasks: &[TaskDefinition], verbose: bool) -> HarnessExit {
    if verbose {
        for task in tasks {
            eprintln!("   {} {}", "$".dimmed(), task.command_line());
        }
    }

    let runner = TaskRunner::system().verbose(verbose);
    let stdout = io::stdout();
    match harness::run_tasks(&runner, tasks, &mut stdout.lock()) {
        Ok(exit) => exit,
        Err(e) => {
            eprintln!("{} Failed to write the run report: {}", "x".red(), e);
            HarnessExit::LaunchFailure
        }
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        ));
    }

    fs::write(path, config::starter_config())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Created {}", "✓".green(), path.display());
    Ok(())
}
