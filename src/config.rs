use crate::task::{TaskDefinition, TaskError};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "harness.toml";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Task label used when none is given on the command line.
    pub default: Option<String>,
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskConfig>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    pub label: String,
    pub executable: String,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default = "default_merge_stderr")]
    pub merge_stderr: bool,
    pub working_dir: Option<PathBuf>,
}

fn default_merge_stderr() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no [[task]] entries defined")]
    NoTasks,
    #[error("task label '{0}' is defined more than once")]
    DuplicateLabel(String),
    #[error("default task '{0}' is not defined")]
    UnknownDefault(String),
    #[error("no task named '{label}' (available: {available})")]
    UnknownTask { label: String, available: String },
    #[error(transparent)]
    InvalidTask(#[from] TaskError),
}

impl TaskConfig {
    /// Relative working directories resolve against `base_dir`.
    pub fn to_definition(&self, base_dir: &Path) -> Result<TaskDefinition, TaskError> {
        let task = TaskDefinition::new(&self.executable, &self.arguments, &self.label)?
            .with_merge_stderr(self.merge_stderr);

        Ok(match &self.working_dir {
            Some(dir) if dir.is_absolute() => task.with_working_dir(dir),
            Some(dir) => task.with_working_dir(base_dir.join(dir)),
            None => task,
        })
    }
}

impl HarnessConfig {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tasks.is_empty() {
            return Err(ConfigError::NoTasks);
        }

        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.label.as_str()) {
                return Err(ConfigError::DuplicateLabel(task.label.clone()));
            }
            task.to_definition(Path::new("."))?;
        }

        if let Some(default) = &self.default
            && !seen.contains(default.as_str())
        {
            return Err(ConfigError::UnknownDefault(default.clone()));
        }

        Ok(())
    }

    /// Picks a task by label, falling back to `default` and then to the first task.
    pub fn task(&self, label: Option<&str>, base_dir: &Path) -> Result<TaskDefinition, ConfigError> {
        let wanted = label.or(self.default.as_deref());

        let entry = match wanted {
            Some(wanted) => self
                .tasks
                .iter()
                .find(|t| t.label == wanted)
                .ok_or_else(|| ConfigError::UnknownTask {
                    label: wanted.to_string(),
                    available: self.labels().join(", "),
                })?,
            None => self.tasks.first().ok_or(ConfigError::NoTasks)?,
        };

        Ok(entry.to_definition(base_dir)?)
    }

    /// Every task, in file order.
    pub fn definitions(&self, base_dir: &Path) -> Result<Vec<TaskDefinition>, ConfigError> {
        if self.tasks.is_empty() {
            return Err(ConfigError::NoTasks);
        }
        self.tasks
            .iter()
            .map(|t| t.to_definition(base_dir).map_err(ConfigError::from))
            .collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.label.as_str()).collect()
    }
}

/// Directory that relative paths in the config file are resolved against.
pub fn base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "{} not found.\n\n\
            💡 Tip: Run 'tlrun init' to create one, or 'tlrun exec <tool> [args]...' to run a single command.",
            path.display()
        ));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} - check file permissions", path.display()))?;
    let config = HarnessConfig::parse(&content)
        .with_context(|| format!("Failed to parse {} - check for syntax errors", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid task table in {}", path.display()))?;

    Ok(config)
}

/// Starter file written by `tlrun init`: the project's build and lexer test.
pub fn starter_config() -> &'static str {
    r#"# Task table for tlrun. Each [[task]] is one toolchain invocation.
default = "build"

[[task]]
label = "build"
executable = "gcc"
arguments = ["source/main.c", "source/foo/foo.c", "source/foo/foo.h", "-o", "cplay"]

[[task]]
label = "lexer-test"
executable = "gcc"
arguments = [
    "-Isource/utils",
    "-o", "_bin/lexerTest",
    "test/LexerTest.c",
    "source/utils/String.c",
    "source/utils/Arena.c",
]
"#
}
