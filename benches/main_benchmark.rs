use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::io;
use std::path::Path;
use tlrun::config::{self, HarnessConfig};
use tlrun::runner::{ProcessRunner, RunningProcess, TaskRunner};
use tlrun::task::TaskDefinition;

const MOCK_CONFIG: &str = r#"
default = "build"

[[task]]
label = "build"
executable = "gcc"
arguments = ["source/main.c", "source/foo/foo.c", "-o", "cplay"]

[[task]]
label = "lexer-test"
executable = "gcc"
arguments = ["-Isource/utils", "-o", "_bin/lexerTest", "test/LexerTest.c"]
merge_stderr = false
"#;

/// Emits a fixed number of lines without touching the OS.
struct Chatty(usize);

struct ChattyChild {
    remaining: usize,
}

impl ProcessRunner for Chatty {
    type Child = ChattyChild;

    fn spawn(&self, _task: &TaskDefinition) -> io::Result<ChattyChild> {
        Ok(ChattyChild { remaining: self.0 })
    }
}

impl RunningProcess for ChattyChild {
    fn next_line(&mut self) -> Option<io::Result<String>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(Ok(format!("source/main.c:{}: warning: unused variable", self.remaining)))
    }

    fn wait(&mut self) -> io::Result<i32> {
        Ok(0)
    }

    fn kill(&mut self) {}
}

fn bench_config_parse(c: &mut Criterion) {
    c.bench_function("parse_harness_toml", |b| {
        b.iter(|| {
            let config = HarnessConfig::parse(black_box(MOCK_CONFIG)).unwrap();
            config.validate().unwrap();
        })
    });
}

fn bench_starter_config(c: &mut Criterion) {
    c.bench_function("resolve_starter_tasks", |b| {
        b.iter(|| {
            let config = HarnessConfig::parse(config::starter_config()).unwrap();
            config.definitions(black_box(Path::new("."))).unwrap()
        })
    });
}

fn bench_drain(c: &mut Criterion) {
    let task = TaskDefinition::new("gcc", ["source/main.c"], "build").unwrap();
    let runner = TaskRunner::new(Chatty(10_000));

    c.bench_function("drain_10k_lines", |b| {
        b.iter(|| runner.run(black_box(&task)).unwrap())
    });
}

#[cfg(unix)]
fn bench_spawn_echo(c: &mut Criterion) {
    let task = TaskDefinition::new("echo", ["ok"], "echo").unwrap();
    let runner = TaskRunner::system();

    c.bench_function("spawn_echo", |b| b.iter(|| runner.run(black_box(&task)).unwrap()));
}

#[cfg(not(unix))]
fn bench_spawn_echo(_c: &mut Criterion) {}

criterion_group!(
    benches,
    bench_config_parse,
    bench_starter_config,
    bench_drain,
    bench_spawn_echo
);
criterion_main!(benches);
