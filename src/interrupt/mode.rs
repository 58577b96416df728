//! Termination mode requested by callers of the watcher.

use serde::{Deserialize, Serialize};

/// How the process ends once an interrupt has been handled.
///
/// Requests from independent callers are merged with [`InterruptMode::merge`]:
/// once any caller has asked for `Fatal`, a later `Quiet` request never
/// downgrades it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterruptMode {
    /// Dump every thread's stack and exit with the fatal status.
    #[default]
    Fatal,
    /// Print a one-line notice and exit with the quiet status.
    Quiet,
}

impl InterruptMode {
    /// Combine an already recorded mode with a new request.
    pub fn merge(self, requested: InterruptMode) -> InterruptMode {
        if self.is_fatal() || requested.is_fatal() {
            InterruptMode::Fatal
        } else {
            InterruptMode::Quiet
        }
    }

    pub fn is_fatal(self) -> bool {
        matches!(self, InterruptMode::Fatal)
    }
}

/// `true` requests fatal mode, `false` quiet mode.
impl From<bool> for InterruptMode {
    fn from(fatal: bool) -> Self {
        if fatal {
            InterruptMode::Fatal
        } else {
            InterruptMode::Quiet
        }
    }
}

impl std::str::FromStr for InterruptMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fatal" | "stack" => Ok(InterruptMode::Fatal),
            "quiet" => Ok(InterruptMode::Quiet),
            other => Err(format!("unknown interrupt mode \"{}\"", other)),
        }
    }
}

impl std::fmt::Display for InterruptMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterruptMode::Fatal => f.write_str("fatal"),
            InterruptMode::Quiet => f.write_str("quiet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_upgrade_only() {
        use InterruptMode::*;
        assert_eq!(Quiet.merge(Quiet), Quiet);
        assert_eq!(Quiet.merge(Fatal), Fatal);
        assert_eq!(Fatal.merge(Quiet), Fatal);
        assert_eq!(Fatal.merge(Fatal), Fatal);
    }

    #[test]
    fn test_default_and_bool() {
        assert_eq!(InterruptMode::default(), InterruptMode::Fatal);
        assert_eq!(InterruptMode::from(true), InterruptMode::Fatal);
        assert_eq!(InterruptMode::from(false), InterruptMode::Quiet);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Quiet".parse::<InterruptMode>(), Ok(InterruptMode::Quiet));
        assert_eq!(" stack ".parse::<InterruptMode>(), Ok(InterruptMode::Fatal));
        assert!("loud".parse::<InterruptMode>().is_err());
    }
}
