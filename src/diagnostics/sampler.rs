//! Backtraces of other threads.
//!
//! The target thread is sent a real-time signal; its handler captures its
//! own backtrace and hands it over through an atomic slot. Symbols are
//! resolved later, on the sampling thread, when the backtrace is rendered.
//! A thread that does not answer in time is left without frames.

use std::backtrace::Backtrace;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use parking_lot::{const_mutex, Mutex, MutexGuard};

/// How long to wait for one thread to answer.
const REPLY_TIMEOUT: Duration = Duration::from_millis(250);

/// Thread currently asked for its backtrace, 0 when none.
static TARGET: AtomicU64 = AtomicU64::new(0);
/// Answer from the target: its tid and its backtrace.
static REPLY: AtomicPtr<(u64, Backtrace)> = AtomicPtr::new(ptr::null_mut());
/// One round at a time; the slot above holds a single answer.
static ROUND: Mutex<()> = const_mutex(());
static INSTALLED: OnceLock<bool> = OnceLock::new();

fn sample_signal() -> libc::c_int {
    libc::SIGRTMIN() + 4
}

fn gettid() -> u64 {
    // SAFETY: gettid takes no arguments and cannot fail.
    unsafe { libc::syscall(libc::SYS_gettid) as u64 }
}

extern "C" fn on_sample_signal(_signum: libc::c_int) {
    let tid = gettid();
    if TARGET.load(Ordering::Acquire) != tid {
        return;
    }
    let reply = Box::into_raw(Box::new((tid, Backtrace::force_capture())));
    if REPLY
        .compare_exchange(ptr::null_mut(), reply, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        // SAFETY: never published, still owned here.
        drop(unsafe { Box::from_raw(reply) });
    }
}

fn install_handler() -> bool {
    *INSTALLED.get_or_init(|| {
        // SAFETY: the action is fully initialised before it is installed and
        // the handler only touches atomics and its own backtrace.
        let rc = unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = on_sample_signal as libc::sighandler_t;
            action.sa_flags = libc::SA_RESTART;
            libc::sigemptyset(&mut action.sa_mask);
            libc::sigaction(sample_signal(), &action, ptr::null_mut())
        };
        if rc != 0 {
            tracing::warn!(
                error = %std::io::Error::last_os_error(),
                "Failed to install thread sampling handler"
            );
        }
        rc == 0
    })
}

fn take_reply() -> Option<(u64, Backtrace)> {
    let reply = REPLY.swap(ptr::null_mut(), Ordering::AcqRel);
    if reply.is_null() {
        None
    } else {
        // SAFETY: published by the handler via Box::into_raw and taken once.
        Some(*unsafe { Box::from_raw(reply) })
    }
}

/// Exclusive right to sample threads. Hold it while capturing the calling
/// thread's own backtrace too, so no sampler interrupts that capture.
pub struct Round {
    _guard: MutexGuard<'static, ()>,
    installed: bool,
}

impl Round {
    pub fn begin() -> Self {
        let guard = ROUND.lock();
        Self {
            _guard: guard,
            installed: install_handler(),
        }
    }

    /// Ask thread `tid` of this process for its backtrace.
    pub fn sample(&self, tid: u64) -> Option<Backtrace> {
        if !self.installed || tid == gettid() {
            return None;
        }
        // Leftover from a thread that answered too late.
        drop(take_reply());

        TARGET.store(tid, Ordering::Release);
        // SAFETY: plain syscall; an exited thread yields ESRCH.
        let sent = unsafe {
            libc::syscall(
                libc::SYS_tgkill,
                libc::getpid(),
                tid as libc::pid_t,
                sample_signal(),
            )
        };

        let mut answer = None;
        if sent == 0 {
            let deadline = Instant::now() + REPLY_TIMEOUT;
            while Instant::now() < deadline {
                match take_reply() {
                    Some((from, backtrace)) if from == tid => {
                        answer = Some(backtrace);
                        break;
                    }
                    _ => std::thread::sleep(Duration::from_millis(1)),
                }
            }
        }
        TARGET.store(0, Ordering::Release);

        if answer.is_none() {
            tracing::debug!(tid, "Thread did not answer sampling signal");
        }
        answer
    }
}
