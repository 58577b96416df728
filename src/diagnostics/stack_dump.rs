//! Stack dump carried by a fatal interrupt.

use std::backtrace::Backtrace;
use std::fmt;

use crate::config::DiagnosticsConfig;
#[cfg(target_os = "linux")]
use crate::diagnostics::sampler;
use crate::diagnostics::threads::{self, ThreadInfo};

/// One thread's entry in a [`StackDump`].
#[derive(Debug, Clone)]
pub struct ThreadStack {
    pub thread: ThreadInfo,
    /// Rendered frames, when the thread could be sampled.
    pub backtrace: Option<String>,
}

/// Snapshot of what every thread of the process was doing.
#[derive(Debug, Clone, Default)]
pub struct StackDump {
    pub threads: Vec<ThreadStack>,
    /// Rendered traces of async tasks, when the runtime supports task dumps.
    pub tasks: Vec<String>,
}

#[cfg(target_os = "linux")]
type Round = Option<sampler::Round>;
#[cfg(not(target_os = "linux"))]
type Round = ();

#[cfg(target_os = "linux")]
fn begin_round(config: &DiagnosticsConfig) -> Round {
    (config.list_threads && config.sample_threads).then(sampler::Round::begin)
}

#[cfg(not(target_os = "linux"))]
fn begin_round(_config: &DiagnosticsConfig) -> Round {}

/// Running threads are left alone: one may be inside the allocator, which
/// the signal handler needs too.
#[cfg(target_os = "linux")]
fn sample(round: &Round, thread: &ThreadInfo) -> Option<Backtrace> {
    match round {
        Some(round) if thread.state == threads::ThreadState::Sleeping => round.sample(thread.tid),
        _ => None,
    }
}

#[cfg(not(target_os = "linux"))]
fn sample(_round: &Round, _thread: &ThreadInfo) -> Option<Backtrace> {
    None
}

impl StackDump {
    /// Capture the calling thread's backtrace and, if `list_threads` is
    /// set, describe every other thread of the process. Sleeping threads
    /// also get their frames when `sample_threads` is set.
    ///
    /// Backtraces are captured regardless of `RUST_BACKTRACE`.
    pub fn capture(config: &DiagnosticsConfig) -> Self {
        let round = begin_round(config);
        let backtrace = Backtrace::force_capture();

        let mut infos = if config.list_threads {
            match threads::list_threads() {
                Ok(infos) => infos,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to enumerate threads");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        if !infos.iter().any(|t| t.current) {
            infos.insert(0, threads::current_thread_info());
        }

        // Capturing thread first.
        infos.sort_by_key(|t| !t.current);

        let mut own = Some(backtrace);
        let threads = infos
            .into_iter()
            .map(|thread| {
                let frames = if thread.current {
                    own.take()
                } else {
                    sample(&round, &thread)
                };
                ThreadStack {
                    thread,
                    backtrace: frames.map(|bt| bt.to_string()),
                }
            })
            .collect();

        Self {
            threads,
            tasks: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}

/// Traces of every task on the current runtime.
///
/// Needs `--cfg tokio_unstable --cfg tokio_taskdump`. Gives up after a
/// second, since a task stuck in blocking code never yields to the dump.
#[cfg(all(tokio_unstable, tokio_taskdump))]
pub async fn capture_tasks() -> Vec<String> {
    let handle = tokio::runtime::Handle::current();
    match tokio::time::timeout(std::time::Duration::from_secs(1), handle.dump()).await {
        Ok(dump) => dump.tasks().iter().map(|task| task.trace().to_string()).collect(),
        Err(_) => {
            tracing::warn!("Task dump timed out");
            Vec::new()
        }
    }
}

impl fmt::Display for ThreadStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.thread;
        writeln!(f, "thread {} \"{}\" [{}]:", t.tid, t.name, t.state)?;
        match (&self.backtrace, &t.wchan) {
            (Some(frames), _) => {
                for line in frames.lines() {
                    writeln!(f, "{}", line)?;
                }
            }
            (None, Some(wchan)) => writeln!(f, "    blocked in {}", wchan)?,
            (None, None) => writeln!(f, "    (frames unavailable)")?,
        }
        Ok(())
    }
}

impl fmt::Display for StackDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stack) in self.threads.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", stack)?;
        }
        for (i, trace) in self.tasks.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "task {}:", i)?;
            for line in trace.lines() {
                writeln!(f, "    {}", line)?;
            }
        }
        Ok(())
    }
}
