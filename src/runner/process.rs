//! Child process access.
//!
//! Each captured pipe is read on its own thread and the lines are funnelled
//! into a single channel, so the child can never stall on a full pipe while
//! the runner is busy with the other stream.

use crate::task::TaskDefinition;
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Creates child processes for tasks.
pub trait ProcessRunner {
    type Child: RunningProcess;

    fn spawn(&self, task: &TaskDefinition) -> io::Result<Self::Child>;
}

/// A launched child whose output is being drained.
pub trait RunningProcess {
    /// Blocks for the next output line. `None` once every stream is closed.
    fn next_line(&mut self) -> Option<io::Result<String>>;

    /// Waits for termination and returns the raw exit code.
    fn wait(&mut self) -> io::Result<i32>;

    /// Stops the child and reaps it. Errors are ignored.
    fn kill(&mut self);
}

/// Spawns real OS processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcess;

impl ProcessRunner for SystemProcess {
    type Child = SystemChild;

    fn spawn(&self, task: &TaskDefinition) -> io::Result<SystemChild> {
        let mut cmd = Command::new(task.executable());
        cmd.args(task.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped());

        if task.merge_stderr() {
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stderr(Stdio::inherit());
        }

        if let Some(dir) = task.working_dir() {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn()?;

        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_reader(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_reader(stderr, tx.clone()));
        }
        // The channel closes once every reader thread drops its sender.
        drop(tx);

        Ok(SystemChild {
            child,
            lines: rx,
            readers,
        })
    }
}

pub struct SystemChild {
    child: Child,
    lines: Receiver<io::Result<String>>,
    readers: Vec<JoinHandle<()>>,
}

impl RunningProcess for SystemChild {
    fn next_line(&mut self) -> Option<io::Result<String>> {
        self.lines.recv().ok()
    }

    fn wait(&mut self) -> io::Result<i32> {
        for reader in self.readers.drain(..) {
            let _ = reader.join();
        }
        let status = self.child.wait()?;
        Ok(exit_code(status))
    }

    fn kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn spawn_reader<R>(stream: R, tx: Sender<io::Result<String>>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(Ok(decode_line(&buf))).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    let _ = tx.send(Err(e));
                    break;
                }
            }
        }
    })
}

/// Strips the line terminator and decodes lossily.
fn decode_line(buf: &[u8]) -> String {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Signal deaths map to the shell convention of `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
