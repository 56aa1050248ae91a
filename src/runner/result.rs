/// Pass/fail decision for a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Only a zero exit status counts as success.
pub fn classify(exit_code: i32) -> Outcome {
    if exit_code == 0 {
        Outcome::Success
    } else {
        Outcome::Failure
    }
}

/// Outcome record of one executed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    exit_code: i32,
    captured_output: Vec<String>,
}

impl RunResult {
    pub fn new(exit_code: i32, captured_output: Vec<String>) -> Self {
        Self {
            exit_code,
            captured_output,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Lines in the order the child wrote them.
    pub fn captured_output(&self) -> &[String] {
        &self.captured_output
    }

    pub fn outcome(&self) -> Outcome {
        classify(self.exit_code)
    }

    pub fn succeeded(&self) -> bool {
        self.outcome() == Outcome::Success
    }
}
