//! Child process handle: endpoints, termination, cleanup

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout};

use crate::error::{HarnessError, Result};

use super::status::ExitStatus;

/// A live or terminated child process and its parent-side channel endpoints
///
/// Created by [`HarnessConfig::spawn`](super::HarnessConfig::spawn). The
/// handle owns the write endpoint of the input channel and the read endpoint
/// of the output channel, when the corresponding stream was redirected; the
/// child's copies were already closed in the parent at spawn time.
///
/// Endpoints close exactly once: on [`close_input`](Self::close_input), when
/// taken out of the handle, or when the handle is dropped. Dropping the
/// handle before [`wait`](Self::wait) kills the child unless
/// [`kill_on_drop`](super::HarnessConfigBuilder::kill_on_drop) was disabled.
#[derive(Debug)]
pub struct ChildHandle {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<BufReader<ChildStdout>>,
    status: Option<ExitStatus>,
}

impl ChildHandle {
    pub(super) fn new(
        child: Child,
        stdin: Option<ChildStdin>,
        stdout: Option<BufReader<ChildStdout>>,
    ) -> Self {
        Self {
            child,
            stdin,
            stdout,
            status: None,
        }
    }

    /// OS process identifier, while the child is running
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Write bytes into the child's standard input and flush them
    ///
    /// The input channel is a bounded byte conduit: if the child stops
    /// reading, a large enough write blocks until it drains. A caller
    /// feeding a large payload while the child also produces redirected
    /// output must drain that output concurrently (see
    /// [`communicate`](Self::communicate)) or the two processes deadlock,
    /// each blocked on the other's full channel.
    ///
    /// # Errors
    /// [`HarnessError::HandleClosed`] if the input endpoint was closed,
    /// taken, or never redirected; [`HarnessError::Io`] on write failure.
    pub async fn write_input(&mut self, data: &[u8]) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            HarnessError::handle_closed("input endpoint is closed or was never redirected")
        })?;

        stdin.write_all(data).await?;
        stdin.flush().await?;

        Ok(())
    }

    /// Close the input endpoint
    ///
    /// The child observes end-of-stream on its next read: this is the
    /// designed mechanism for telling it "no more input". Idempotent; a
    /// no-op when the input was never redirected.
    ///
    /// # Errors
    /// Returns [`HarnessError::Io`] if the final flush fails.
    pub async fn close_input(&mut self) -> Result<()> {
        if let Some(mut stdin) = self.stdin.take() {
            stdin.shutdown().await?;
            log::trace!("input endpoint closed for pid {:?}", self.child.id());
        }
        Ok(())
    }

    /// Read output bytes into `buf`, returning how many were read
    ///
    /// Returns `Ok(0)` at end-of-stream, observed exactly when every copy of
    /// the channel's write endpoint has been closed (normally: when the
    /// child exits or closes its standard output).
    ///
    /// # Errors
    /// [`HarnessError::HandleClosed`] if the output endpoint was taken or
    /// never redirected.
    pub async fn read_output(&mut self, buf: &mut [u8]) -> Result<usize> {
        let stdout = self.stdout.as_mut().ok_or_else(|| {
            HarnessError::handle_closed("output endpoint is closed or was never redirected")
        })?;

        Ok(stdout.read(buf).await?)
    }

    /// Drain the child's output until end-of-stream
    ///
    /// Blocks until the output channel's writers are all closed. Call this
    /// *before* [`wait`](Self::wait) (or concurrently with it): a child
    /// producing more output than the channel buffers cannot exit until the
    /// parent drains.
    ///
    /// # Errors
    /// [`HarnessError::HandleClosed`] if the output endpoint was taken or
    /// never redirected.
    pub async fn drain_output(&mut self) -> Result<Vec<u8>> {
        let stdout = self.stdout.as_mut().ok_or_else(|| {
            HarnessError::handle_closed("output endpoint is closed or was never redirected")
        })?;

        let mut output = Vec::new();
        stdout.read_to_end(&mut output).await?;
        Ok(output)
    }

    /// Take ownership of the input write endpoint
    ///
    /// For split-direction concurrency: move the endpoint into its own task
    /// while another task drains output. Handle-level input operations fail
    /// with [`HarnessError::HandleClosed`] afterwards. Returns `None` if the
    /// endpoint is gone or was never redirected.
    #[must_use]
    pub fn take_input(&mut self) -> Option<ChildStdin> {
        self.stdin.take()
    }

    /// Take ownership of the output read endpoint
    ///
    /// Counterpart of [`take_input`](Self::take_input) for the read side.
    #[must_use]
    pub fn take_output(&mut self) -> Option<BufReader<ChildStdout>> {
        self.stdout.take()
    }

    /// Feed the whole input to the child and collect its whole output
    ///
    /// Writes `input` to the child's standard input, closes it, and drains
    /// the output to end-of-stream, concurrently, so neither a full input
    /// channel nor a full output channel can deadlock the exchange. This is
    /// the recommended pattern for finite request/response children; it
    /// consumes both endpoints. Follow with [`wait`](Self::wait) to collect
    /// the exit status.
    ///
    /// Streams that were not redirected are skipped: with no output channel
    /// the result is empty, and a non-empty `input` without an input channel
    /// is an error.
    ///
    /// # Errors
    /// [`HarnessError::HandleClosed`] if `input` is non-empty but the input
    /// endpoint is gone; [`HarnessError::Io`] on stream failure.
    pub async fn communicate(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        if !input.is_empty() && self.stdin.is_none() {
            return Err(HarnessError::handle_closed(
                "input endpoint is closed or was never redirected",
            ));
        }

        let stdin = self.stdin.take();
        let stdout = self.stdout.take();

        let feed = async {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), HarnessError>(())
        };

        let drain = async {
            let mut output = Vec::new();
            if let Some(mut stdout) = stdout {
                stdout.read_to_end(&mut output).await?;
            }
            Ok::<Vec<u8>, HarnessError>(output)
        };

        let ((), output) = futures::future::try_join(feed, drain).await?;
        Ok(output)
    }

    /// Wait for the child to terminate
    ///
    /// Blocks the calling task until termination; the only place the parent
    /// observes it. Idempotent: the first completed call caches the status
    /// and later calls return the cached value. A child that already exited
    /// before the first call still yields its correct status.
    ///
    /// `wait` does not close the input endpoint: a child reading until
    /// end-of-stream needs [`close_input`](Self::close_input) first, and a
    /// child producing redirected output needs a concurrent drain, or both
    /// sides block forever. There is no built-in deadline; to enforce one,
    /// race this future against a timer and [`kill`](Self::kill) on expiry;
    /// the abnormal termination is then observed through this same path.
    ///
    /// # Errors
    /// Returns [`HarnessError::Io`] if the underlying wait primitive fails.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        if let Some(status) = self.status {
            return Ok(status);
        }

        let id = self.child.id();
        let status = ExitStatus::from(self.child.wait().await?);
        log::debug!("child {id:?} terminated: {status}");
        self.status = Some(status);

        Ok(status)
    }

    /// Send the kill signal without waiting for the child to exit
    ///
    /// # Errors
    /// Returns [`HarnessError::Io`] if the signal cannot be delivered.
    pub fn start_kill(&mut self) -> Result<()> {
        if self.status.is_some() {
            return Ok(());
        }
        Ok(self.child.start_kill()?)
    }

    /// Forcibly terminate the child and collect its status
    ///
    /// A no-op if the child was already waited on. The abnormal termination
    /// remains observable through [`wait`](Self::wait), which returns the
    /// cached signaled status.
    ///
    /// # Errors
    /// Returns [`HarnessError::Io`] if the signal cannot be delivered or the
    /// wait primitive fails.
    pub async fn kill(&mut self) -> Result<()> {
        if self.status.is_some() {
            return Ok(());
        }
        self.child.start_kill()?;
        self.wait().await?;
        Ok(())
    }
}
