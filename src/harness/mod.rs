//! Subprocess harness: spawn a child with redirected standard streams
//!
//! This module provides the harness implementation: a [`HarnessConfig`]
//! describing which streams to intercept, the spawn path that wires the
//! channels, and the [`ChildHandle`] through which the parent feeds input,
//! drains output, and observes termination.

mod command;
mod config;
mod handle;
mod reader;
mod spawn;
mod status;

// Re-export public types
pub use config::{DANGEROUS_ENV_VARS, HarnessConfig, HarnessConfigBuilder, find_program};
pub use handle::ChildHandle;
pub use status::ExitStatus;
