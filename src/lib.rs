//! # tlrun - Build/Test Harness
//!
//! tlrun runs a native toolchain (usually a C compiler) as a child process,
//! drains everything it prints, waits for it to exit and reports pass/fail
//! from the exit status.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a starter harness.toml
//! tlrun init
//!
//! # Run the default task, or a named one
//! tlrun run
//! tlrun run lexer-test
//!
//! # Run a one-off command
//! tlrun exec -- gcc -o hello hello.c
//! ```
//!
//! ## Module Organization
//!
//! - [`task`] - Task definitions (executable, arguments, label)
//! - [`runner`] - Child process execution and output draining
//! - [`report`] - Pass/fail reports and exit statuses
//! - [`config`] - Task table parsing (`harness.toml`)
//! - [`harness`] - Sequential execution of several tasks

/// Task table parsing (`harness.toml`).
pub mod config;

/// Sequential execution with reporting.
pub mod harness;

/// Run reports and exit statuses.
pub mod report;

/// Child process execution.
pub mod runner;

/// Task definitions.
pub mod task;

/// Terminal UI utilities (tables).
pub mod ui;
