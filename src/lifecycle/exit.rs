//! Process termination after an interrupt.
//!
//! # Responsibilities
//! - Render the interrupt outcome to the diagnostic stream
//! - Pick the exit status for the outcome
//!
//! # Design Decisions
//! - Rendering is separate from exiting so it can be tested
//! - stdout is flushed first so handler output is not lost

use std::io::{self, Write};

use crate::config::ExitConfig;
use crate::interrupt::InterruptError;

/// Marker written before the stack dump of a fatal interrupt.
pub const FATAL_MARKER: &str = "panic: Interrupted";

/// Notice written for a quiet interrupt.
pub const QUIET_NOTICE: &str = "Interrupted.";

/// Exit status for an outcome.
pub fn exit_code(error: &InterruptError, exit: &ExitConfig) -> i32 {
    match error {
        InterruptError::Fatal(_) => exit.fatal_code,
        InterruptError::Quiet | InterruptError::Subscribe(_) => exit.quiet_code,
    }
}

/// Write the outcome to `out` and return the status to exit with.
pub fn report<W: Write>(error: &InterruptError, exit: &ExitConfig, out: &mut W) -> io::Result<i32> {
    match error {
        InterruptError::Quiet => writeln!(out, "{}", QUIET_NOTICE)?,
        InterruptError::Fatal(dump) => {
            writeln!(out, "{}", FATAL_MARKER)?;
            writeln!(out)?;
            write!(out, "{}", dump)?;
        }
        InterruptError::Subscribe(_) => writeln!(out, "{}", error)?,
    }
    out.flush()?;
    Ok(exit_code(error, exit))
}

/// Report the outcome on stderr and exit the process.
pub fn terminate(error: &InterruptError, exit: &ExitConfig) -> ! {
    let _ = io::stdout().flush();

    let stderr = io::stderr();
    let mut out = stderr.lock();
    let code = match report(error, exit, &mut out) {
        Ok(code) => code,
        Err(_) => exit_code(error, exit),
    };
    drop(out);

    std::process::exit(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagnosticsConfig;
    use crate::diagnostics::StackDump;

    #[test]
    fn test_quiet_report() {
        let mut out = Vec::new();
        let code = report(&InterruptError::Quiet, &ExitConfig::default(), &mut out).unwrap();
        assert_eq!(code, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "Interrupted.\n");
    }

    #[test]
    fn test_fatal_report() {
        let dump = StackDump::capture(&DiagnosticsConfig {
            list_threads: false,
            sample_threads: false,
        });
        let mut out = Vec::new();
        let code = report(&InterruptError::Fatal(dump), &ExitConfig::default(), &mut out).unwrap();
        assert_eq!(code, 2);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("panic: Interrupted\n\nthread "));
        assert!(text.contains("[running]:"));
    }

    #[test]
    fn test_configured_codes() {
        let exit = ExitConfig {
            quiet_code: 10,
            fatal_code: 20,
        };
        assert_eq!(exit_code(&InterruptError::Quiet, &exit), 10);
        assert_eq!(exit_code(&InterruptError::Fatal(StackDump::default()), &exit), 20);
    }
}
