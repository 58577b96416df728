//! OS thread enumeration.
//!
//! On Linux every thread of the process is listed from `/proc/self/task`.
//! Elsewhere only the calling thread is known.

use std::fmt;

/// Scheduler state of a thread, as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    Running,
    Sleeping,
    DiskSleep,
    Stopped,
    Zombie,
    Idle,
    Unknown,
}

impl ThreadState {
    /// Decode the state letter from `/proc/<pid>/task/<tid>/stat`.
    pub fn from_proc_code(code: char) -> Self {
        match code {
            'R' => ThreadState::Running,
            'S' => ThreadState::Sleeping,
            'D' => ThreadState::DiskSleep,
            'T' | 't' => ThreadState::Stopped,
            'Z' | 'X' | 'x' => ThreadState::Zombie,
            'I' => ThreadState::Idle,
            _ => ThreadState::Unknown,
        }
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ThreadState::Running => "running",
            ThreadState::Sleeping => "sleeping",
            ThreadState::DiskSleep => "disk sleep",
            ThreadState::Stopped => "stopped",
            ThreadState::Zombie => "zombie",
            ThreadState::Idle => "idle",
            ThreadState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// One OS thread of this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    pub tid: u64,
    pub name: String,
    pub state: ThreadState,
    /// Kernel function the thread is blocked in, when known.
    pub wchan: Option<String>,
    /// Whether this is the thread that did the enumeration.
    pub current: bool,
}

/// Parse the state letter out of a `stat` line. The command name is in
/// parentheses and may itself contain spaces or parentheses.
pub fn parse_stat_state(stat: &str) -> Option<ThreadState> {
    let rest = &stat[stat.rfind(')')? + 1..];
    let code = rest.trim_start().chars().next()?;
    Some(ThreadState::from_proc_code(code))
}

/// Id of the calling thread.
#[cfg(target_os = "linux")]
pub fn current_tid() -> Option<u64> {
    // "/proc/thread-self" links to "<pid>/task/<tid>"
    let link = std::fs::read_link("/proc/thread-self").ok()?;
    link.file_name()?.to_str()?.parse().ok()
}

#[cfg(not(target_os = "linux"))]
pub fn current_tid() -> Option<u64> {
    None
}

/// List the threads of this process, sorted by id.
#[cfg(target_os = "linux")]
pub fn list_threads() -> std::io::Result<Vec<ThreadInfo>> {
    let current = current_tid();
    let mut threads = Vec::new();

    for entry in std::fs::read_dir("/proc/self/task")? {
        let entry = entry?;
        let Some(tid) = entry.file_name().to_str().and_then(|s| s.parse::<u64>().ok()) else {
            continue;
        };
        let dir = entry.path();

        // Threads may exit while we look; skip the ones that vanished.
        let Ok(stat) = std::fs::read_to_string(dir.join("stat")) else {
            continue;
        };
        let name = std::fs::read_to_string(dir.join("comm"))
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default();
        let wchan = std::fs::read_to_string(dir.join("wchan"))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s != "0");

        let is_current = current == Some(tid);
        let state = if is_current {
            ThreadState::Running
        } else {
            parse_stat_state(&stat).unwrap_or(ThreadState::Unknown)
        };

        threads.push(ThreadInfo {
            tid,
            name,
            state,
            wchan,
            current: is_current,
        });
    }

    threads.sort_by_key(|t| t.tid);
    Ok(threads)
}

#[cfg(not(target_os = "linux"))]
pub fn list_threads() -> std::io::Result<Vec<ThreadInfo>> {
    Ok(vec![current_thread_info()])
}

/// Best-effort description of the calling thread alone.
pub fn current_thread_info() -> ThreadInfo {
    let thread = std::thread::current();
    ThreadInfo {
        tid: current_tid().unwrap_or_else(|| u64::from(std::process::id())),
        name: thread.name().unwrap_or("<unnamed>").to_string(),
        state: ThreadState::Running,
        wchan: None,
        current: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stat_state() {
        let stat = "4242 (tokio-runtime-w) S 1 4242 4242 0 -1 4194368";
        assert_eq!(parse_stat_state(stat), Some(ThreadState::Sleeping));

        // Names can contain ") " themselves.
        let stat = "7 (odd) name) R 1 7";
        assert_eq!(parse_stat_state(stat), Some(ThreadState::Running));

        assert_eq!(parse_stat_state("garbage"), None);
    }

    #[test]
    fn test_state_codes() {
        assert_eq!(ThreadState::from_proc_code('D'), ThreadState::DiskSleep);
        assert_eq!(ThreadState::from_proc_code('t'), ThreadState::Stopped);
        assert_eq!(ThreadState::from_proc_code('?'), ThreadState::Unknown);
        assert_eq!(ThreadState::Running.to_string(), "running");
    }

    #[test]
    fn test_list_contains_current_thread() {
        let threads = list_threads().unwrap();
        let current: Vec<_> = threads.iter().filter(|t| t.current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].state, ThreadState::Running);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_lists_other_threads() {
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<()>();
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let parked = std::thread::Builder::new()
            .name("parked-worker".into())
            .spawn(move || {
                let _ = ready_tx.send(());
                let _ = rx.recv();
            })
            .unwrap();
        ready_rx.recv().unwrap();

        let threads = list_threads().unwrap();
        assert!(threads.iter().any(|t| t.name == "parked-worker" && !t.current));

        drop(tx);
        parked.join().unwrap();
    }
}
