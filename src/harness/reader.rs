//! Background line reading from the child's output

use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use crate::error::{HarnessError, Result};

use super::handle::ChildHandle;

impl ChildHandle {
    /// Stream the child's output line-by-line from a background task
    ///
    /// Takes ownership of the output read endpoint and spawns a task that
    /// drains it as the child produces, so the caller is free to feed input
    /// or block in [`wait`](Self::wait) without risking the full-channel
    /// deadlock. Each line is yielded without its terminator; the receiver
    /// closes at end-of-stream. If the output endpoint is gone or was never
    /// redirected, the receiver yields a single
    /// [`HarnessError::HandleClosed`] error.
    ///
    /// Handle-level output operations fail with
    /// [`HarnessError::HandleClosed`] once the endpoint is taken.
    pub fn output_lines(&mut self) -> mpsc::UnboundedReceiver<Result<String>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let stdout = self.take_output();

        tokio::spawn(async move {
            let Some(stdout) = stdout else {
                let _ = tx.send(Err(HarnessError::handle_closed(
                    "output endpoint is closed or was never redirected",
                )));
                return;
            };

            let mut lines = stdout.lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(Ok(line)).is_err() {
                            // Receiver dropped, stop reading
                            break;
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        let _ = tx.send(Err(HarnessError::Io(e)));
                        break;
                    }
                }
            }
        });

        rx
    }
}
