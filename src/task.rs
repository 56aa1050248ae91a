//! Task definitions.
//!
//! A [`TaskDefinition`] is plain data: the toolchain binary to invoke, the
//! arguments in the exact order the toolchain expects them, and a label used
//! when reporting. Building one never touches the filesystem or spawns
//! anything.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task '{label}' has an empty executable name")]
    EmptyExecutable { label: String },
}

/// One invocable build or test step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    executable: String,
    arguments: Vec<String>,
    label: String,
    merge_stderr: bool,
    working_dir: Option<PathBuf>,
}

impl TaskDefinition {
    /// Creates a task, rejecting a blank executable.
    ///
    /// Standard error is merged into the captured output by default.
    pub fn new<E, I, A, L>(executable: E, arguments: I, label: L) -> Result<Self, TaskError>
    where
        E: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
        L: Into<String>,
    {
        let executable = executable.into();
        let label = label.into();

        if executable.trim().is_empty() {
            return Err(TaskError::EmptyExecutable { label });
        }

        Ok(Self {
            executable,
            arguments: arguments.into_iter().map(Into::into).collect(),
            label,
            merge_stderr: true,
            working_dir: None,
        })
    }

    pub fn with_merge_stderr(mut self, merge: bool) -> Self {
        self.merge_stderr = merge;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn merge_stderr(&self) -> bool {
        self.merge_stderr
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Renders the invocation the way a user would type it into a shell.
    pub fn command_line(&self) -> String {
        std::iter::once(self.executable.as_str())
            .chain(self.arguments.iter().map(String::as_str))
            .map(quote_arg)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote_arg(arg: &str) -> String {
    let needs_quotes =
        arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'');
    if needs_quotes {
        format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_argument_order() {
        let task = TaskDefinition::new(
            "gcc",
            ["-Isource/utils", "-o", "_bin/lexerTest", "test/LexerTest.c"],
            "lexer-test",
        )
        .unwrap();

        assert_eq!(task.executable(), "gcc");
        assert_eq!(
            task.arguments(),
            ["-Isource/utils", "-o", "_bin/lexerTest", "test/LexerTest.c"]
        );
        assert_eq!(task.label(), "lexer-test");
        assert!(task.merge_stderr());
        assert!(task.working_dir().is_none());
    }

    #[test]
    fn test_empty_executable_is_rejected() {
        let err = TaskDefinition::new("", Vec::<String>::new(), "broken").unwrap_err();
        assert_eq!(
            err,
            TaskError::EmptyExecutable {
                label: "broken".to_string()
            }
        );
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_whitespace_executable_is_rejected() {
        assert!(TaskDefinition::new("   ", ["x"], "blank").is_err());
    }

    #[test]
    fn test_no_arguments_is_allowed() {
        let task = TaskDefinition::new("false", Vec::<String>::new(), "false").unwrap();
        assert!(task.arguments().is_empty());
        assert_eq!(task.command_line(), "false");
    }

    #[test]
    fn test_builders() {
        let task = TaskDefinition::new("make", ["all"], "make")
            .unwrap()
            .with_merge_stderr(false)
            .with_working_dir("project");
        assert!(!task.merge_stderr());
        assert_eq!(task.working_dir(), Some(Path::new("project")));
    }

    #[test]
    fn test_command_line_quotes_when_needed() {
        let task = TaskDefinition::new(
            "gcc",
            ["-DNAME=\"x\"", "my file.c", "", "-o", "out"],
            "quoted",
        )
        .unwrap();
        assert_eq!(
            task.command_line(),
            r#"gcc "-DNAME=\"x\"" "my file.c" "" -o out"#
        );
    }
}
