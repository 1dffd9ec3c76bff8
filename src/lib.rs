//! # procpipe
//!
//! A minimal, deterministic subprocess I/O-redirection harness: spawn a
//! controlled child process with zero or more of its standard streams
//! rebound to harness-managed channels, feed it input, capture its output,
//! and observe its termination, without data loss or descriptor leakage.
//!
//! ## Quick Start
//!
//! ```no_run
//! use procpipe::HarnessConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HarnessConfig::builder("cat")
//!         .redirect_stdin(true)
//!         .redirect_stdout(true)
//!         .build();
//!
//!     let mut child = config.spawn()?;
//!     child.write_input(b"ping\n").await?;
//!     child.close_input().await?;
//!
//!     let output = child.drain_output().await?;
//!     assert_eq!(output, b"ping\n");
//!
//!     let status = child.wait().await?;
//!     assert!(status.success());
//!     Ok(())
//! }
//! ```
//!
//! ## Channels and ownership
//!
//! Each redirected stream is a one-directional byte channel with a read
//! endpoint and a write endpoint. Both endpoints are allocated before the
//! child is created; immediately after the spawn, each endpoint belongs to
//! exactly one side. The parent keeps the ends it talks through (the input
//! write end, the output read end) and every other copy is closed, so a
//! reader observes end-of-stream exactly when the single remaining writer
//! closes. Endpoints are ownership-typed and close themselves exactly once,
//! on [`ChildHandle::close_input`], on being taken out of the handle, or on
//! drop.
//!
//! Closing the parent's input endpoint is the designed way to tell the
//! child "no more input": its next read returns end-of-stream.
//!
//! ## Backpressure and the deadlock hazard
//!
//! Channels buffer a bounded number of bytes. A child producing more
//! redirected output than the channel holds blocks on write until the
//! parent drains. That is intrinsic backpressure, not a bug. Consequently:
//!
//! - Never drain output only *after* [`ChildHandle::wait`] returns; a child
//!   blocked on a full output channel cannot exit.
//! - A caller feeding a large input while the child produces redirected
//!   output can deadlock: the child blocks writing to a full output channel
//!   while the parent blocks writing to a full input channel. The harness does not
//!   prevent this; run one task per direction instead, either via
//!   [`ChildHandle::communicate`] (concurrent feed + drain) or by moving
//!   [`ChildHandle::take_input`]/[`ChildHandle::take_output`] into separate
//!   tasks, with [`ChildHandle::output_lines`] as the line-oriented variant.
//!
//! ## Termination
//!
//! [`ChildHandle::wait`] blocks until the child terminates and returns an
//! immutable [`ExitStatus`]: a numeric exit code or the terminating
//! signal. It is idempotent (later calls return the cached status) and has
//! no built-in deadline: to bound it, race it against a timer and call
//! [`ChildHandle::kill`] on expiry; the abnormal termination is still
//! observed through the ordinary `wait` path. Handles are independent;
//! concurrent harness uses need no coordination.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod harness;

// Re-export commonly used types for external API
pub use error::{HarnessError, Result};
pub use harness::{
    ChildHandle, DANGEROUS_ENV_VARS, ExitStatus, HarnessConfig, HarnessConfigBuilder, find_program,
};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
