//! Shared utilities for integration tests.

use std::io::{BufRead, BufReader, Read};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread;

/// Output of a finished demo run.
#[allow(dead_code)]
pub struct RunOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Spawn the demo binary with piped output and no logging noise.
pub fn spawn_demo(args: &[&str]) -> Child {
    Command::new(env!("CARGO_BIN_EXE_interrupt-demo"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("TUTL_INTERRUPT_MODE")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn interrupt-demo")
}

/// Read stdout until a line equal to `marker` has been seen.
/// Returns the lines read so far and the reader for the rest.
#[allow(dead_code)]
pub fn read_until(stdout: ChildStdout, marker: &str) -> (Vec<String>, BufReader<ChildStdout>) {
    let mut reader = BufReader::new(stdout);
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).expect("read demo stdout");
        assert!(n > 0, "demo exited before printing {:?}; got {:?}", marker, lines);
        let line = line.trim_end().to_string();
        let done = line == marker;
        lines.push(line);
        if done {
            return (lines, reader);
        }
    }
}

/// Collect the remaining output and the exit status.
pub fn finish(mut child: Child, stdout_head: Vec<String>, stdout_rest: Option<BufReader<ChildStdout>>) -> RunOutput {
    let mut stderr_pipe = child.stderr.take().expect("stderr piped");
    let stderr_reader = thread::spawn(move || {
        let mut s = String::new();
        let _ = stderr_pipe.read_to_string(&mut s);
        s
    });

    let mut stdout = stdout_head.join("\n");
    if !stdout.is_empty() {
        stdout.push('\n');
    }
    let rest = match stdout_rest {
        Some(reader) => Some(reader),
        None => child.stdout.take().map(BufReader::new),
    };
    if let Some(mut reader) = rest {
        let _ = reader.read_to_string(&mut stdout);
    }

    let status = child.wait().expect("wait for demo");
    RunOutput {
        code: status.code(),
        stdout,
        stderr: stderr_reader.join().expect("stderr reader"),
    }
}
