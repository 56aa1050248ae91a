use crate::report::{self, HarnessExit};
use crate::runner::{ProcessRunner, TaskRunner};
use crate::task::TaskDefinition;
use colored::*;
use std::io::{self, Write};

/// Runs tasks one after another, reporting each, and stops at the first failure.
pub fn run_tasks<P, W>(
    runner: &TaskRunner<P>,
    tasks: &[TaskDefinition],
    out: &mut W,
) -> io::Result<HarnessExit>
where
    P: ProcessRunner,
    W: Write,
{
    for task in tasks {
        writeln!(out, "{} {}", "🔨".yellow(), task.label().bold())?;
        let result = runner.run(task);
        let exit = report::write_report(out, task, &result)?;
        out.flush()?;
        if !exit.is_success() {
            return Ok(exit);
        }
    }
    Ok(HarnessExit::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunningProcess;
    use std::cell::RefCell;

    /// Exits with the code given as the task's first argument.
    #[derive(Default)]
    struct ExitWithArg {
        spawned: RefCell<Vec<String>>,
    }

    struct Finished(i32);

    impl ProcessRunner for ExitWithArg {
        type Child = Finished;

        fn spawn(&self, task: &TaskDefinition) -> io::Result<Finished> {
            self.spawned.borrow_mut().push(task.label().to_string());
            let code = task.arguments()[0].parse().map_err(io::Error::other)?;
            Ok(Finished(code))
        }
    }

    impl RunningProcess for Finished {
        fn next_line(&mut self) -> Option<io::Result<String>> {
            None
        }

        fn wait(&mut self) -> io::Result<i32> {
            Ok(self.0)
        }

        fn kill(&mut self) {}
    }

    fn task(label: &str, code: &str) -> TaskDefinition {
        TaskDefinition::new("tool", [code], label).unwrap()
    }

    #[test]
    fn test_all_tasks_run_on_success() {
        let runner = TaskRunner::new(ExitWithArg::default());
        let mut out = Vec::new();
        let exit = run_tasks(&runner, &[task("a", "0"), task("b", "0")], &mut out).unwrap();

        assert_eq!(exit, HarnessExit::Success);
        assert_eq!(*runner_spawned(&runner), ["a", "b"]);
    }

    #[test]
    fn test_stops_at_first_failure() {
        let runner = TaskRunner::new(ExitWithArg::default());
        let mut out = Vec::new();
        let tasks = [task("a", "0"), task("b", "2"), task("c", "0")];
        let exit = run_tasks(&runner, &tasks, &mut out).unwrap();

        assert_eq!(exit, HarnessExit::ToolchainFailure);
        assert_eq!(*runner_spawned(&runner), ["a", "b"]);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("exited with code 2"));
    }

    #[test]
    fn test_launch_failure_stops_the_sequence() {
        let runner = TaskRunner::new(ExitWithArg::default());
        let mut out = Vec::new();
        let exit = run_tasks(&runner, &[task("bad", "nan"), task("b", "0")], &mut out).unwrap();

        assert_eq!(exit, HarnessExit::LaunchFailure);
        assert_eq!(*runner_spawned(&runner), ["bad"]);
    }

    fn runner_spawned(runner: &TaskRunner<ExitWithArg>) -> std::cell::Ref<'_, Vec<String>> {
        runner.process().spawned.borrow()
    }
}
