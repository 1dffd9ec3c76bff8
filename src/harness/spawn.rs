//! Spawn implementation: channel wiring and failure classification

use tokio::io::BufReader;

use crate::error::{HarnessError, Result};

use super::command::CommandBuilder;
use super::config::HarnessConfig;
use super::handle::ChildHandle;

impl HarnessConfig {
    /// Spawn a child process with the configured redirections
    ///
    /// A channel (pipe) is allocated for every requested redirection before
    /// the child is created; if allocation fails, no child exists and all
    /// already-allocated endpoints are closed before the error is returned.
    /// After a successful spawn the parent keeps only the endpoints it talks
    /// through (the input write end, the output read end); the child-side
    /// copies are closed in this process, so a reader on either channel
    /// observes end-of-stream as soon as the single remaining writer closes.
    ///
    /// # Errors
    /// Returns [`HarnessError::ResourceExhausted`] if channel allocation
    /// fails, or [`HarnessError::ProcessCreationFailed`] if the underlying
    /// process-creation primitive fails (e.g. executable missing, permission
    /// denied). In both cases nothing happened: no handle, no child, no
    /// leaked descriptor. The configuration may be reused for a retry.
    pub fn spawn(&self) -> Result<ChildHandle> {
        let mut cmd = CommandBuilder::new(self).build();

        let mut child = cmd
            .spawn()
            .map_err(|e| HarnessError::spawn_failure(&self.program, e))?;

        let stdin = if self.redirect_stdin {
            Some(
                child
                    .stdin
                    .take()
                    .ok_or_else(|| self.missing_endpoint("stdin"))?,
            )
        } else {
            None
        };

        let stdout = if self.redirect_stdout {
            let stdout = child
                .stdout
                .take()
                .ok_or_else(|| self.missing_endpoint("stdout"))?;
            Some(BufReader::new(stdout))
        } else {
            None
        };

        log::debug!(
            "spawned {} as pid {:?} (stdin piped: {}, stdout piped: {})",
            self.program.display(),
            child.id(),
            self.redirect_stdin,
            self.redirect_stdout,
        );

        Ok(ChildHandle::new(child, stdin, stdout))
    }

    fn missing_endpoint(&self, stream: &str) -> HarnessError {
        HarnessError::ProcessCreationFailed {
            program: self.program.display().to_string(),
            source: std::io::Error::other(format!("{stream} endpoint missing after spawn")),
        }
    }
}
