//! Exit status of a terminated child

use std::fmt;
use std::process;

/// Outcome of a terminated child process
///
/// Immutable once produced: either a numeric exit code or an indication of
/// abnormal termination by signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Normal termination with an exit code
    Exited(i32),
    /// Abnormal termination by a signal (Unix)
    Signaled(i32),
}

impl ExitStatus {
    /// Exit code, if the child terminated normally
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        match self {
            Self::Exited(code) => Some(*code),
            Self::Signaled(_) => None,
        }
    }

    /// Signal number, if the child was terminated by a signal
    #[must_use]
    pub const fn signal(&self) -> Option<i32> {
        match self {
            Self::Exited(_) => None,
            Self::Signaled(signal) => Some(*signal),
        }
    }

    /// Whether the child exited normally with code 0
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exit code {code}"),
            Self::Signaled(signal) => write!(f, "terminated by signal {signal}"),
        }
    }
}

#[cfg(unix)]
impl From<process::ExitStatus> for ExitStatus {
    fn from(status: process::ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        match status.code() {
            Some(code) => Self::Exited(code),
            // wait(2) never reports a stopped child here, so a missing code
            // means a terminating signal.
            None => Self::Signaled(status.signal().unwrap_or_default()),
        }
    }
}

#[cfg(not(unix))]
impl From<process::ExitStatus> for ExitStatus {
    fn from(status: process::ExitStatus) -> Self {
        Self::Exited(status.code().unwrap_or_default())
    }
}
