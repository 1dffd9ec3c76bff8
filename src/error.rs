//! Error types for the subprocess harness

use std::io;
use std::path::Path;

use thiserror::Error;

/// Main error type for harness operations
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Channel (pipe) or descriptor allocation failed
    ///
    /// Recoverable: the caller may retry after freeing resources. No child
    /// process exists and no descriptor is leaked when this is returned.
    #[error("channel allocation failed: {source}")]
    ResourceExhausted {
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// The underlying process-creation primitive failed
    #[error("failed to spawn `{program}`: {source}")]
    ProcessCreationFailed {
        /// Program that could not be started
        program: String,
        /// Underlying OS error, preserved for diagnostics
        #[source]
        source: io::Error,
    },

    /// Program lookup failed
    #[error("program not found on the search path: {0}")]
    ProgramNotFound(String),

    /// Operation on an endpoint that was closed, taken, or never redirected
    #[error("handle closed: {0}")]
    HandleClosed(String),

    /// I/O error on a redirected stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

impl HarnessError {
    /// Create a handle closed error
    pub fn handle_closed(msg: impl Into<String>) -> Self {
        Self::HandleClosed(msg.into())
    }

    /// Create a program not found error
    pub fn program_not_found(program: impl Into<String>) -> Self {
        Self::ProgramNotFound(program.into())
    }

    /// Classify a failure from the spawn primitive.
    ///
    /// Descriptor/memory exhaustion is split out as [`Self::ResourceExhausted`]
    /// so callers can distinguish "free resources and retry" from "the program
    /// itself could not be started".
    pub(crate) fn spawn_failure(program: &Path, source: io::Error) -> Self {
        if is_resource_exhaustion(&source) {
            Self::ResourceExhausted { source }
        } else {
            Self::ProcessCreationFailed {
                program: program.display().to_string(),
                source,
            }
        }
    }
}

#[cfg(unix)]
fn is_resource_exhaustion(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::EMFILE | libc::ENFILE | libc::ENOMEM)
    )
}

#[cfg(not(unix))]
fn is_resource_exhaustion(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::OutOfMemory
}
