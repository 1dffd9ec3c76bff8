//! Configuration for spawning a redirected child process

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::error::{HarnessError, Result};

/// Environment variables never forwarded to the child via overrides
///
/// These variables change how the child process loads and executes code.
/// They are filtered from [`HarnessConfig::env`] overrides; the inherited
/// environment is passed through untouched.
pub const DANGEROUS_ENV_VARS: &[&str] = &[
    "LD_PRELOAD",
    "LD_LIBRARY_PATH",
    "DYLD_INSERT_LIBRARIES",
    "DYLD_LIBRARY_PATH",
];

/// Immutable configuration consumed by [`HarnessConfig::spawn`]
///
/// Each of the child's standard streams is either inherited from the parent
/// (the default) or rebound to a harness-managed channel. Build one with
/// [`HarnessConfig::new`] for the defaults or [`HarnessConfig::builder`] to
/// set redirections and process attributes.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Program to execute (a path, or a bare name resolved via the search path)
    pub program: PathBuf,
    /// Arguments passed to the program
    pub args: Vec<OsString>,
    /// Extra environment variables layered over the inherited environment
    pub env: HashMap<String, String>,
    /// Working directory for the child
    pub cwd: Option<PathBuf>,
    /// Whether to rebind the child's standard input to a harness channel
    pub redirect_stdin: bool,
    /// Whether to rebind the child's standard output to a harness channel
    pub redirect_stdout: bool,
    /// Whether to kill the child when its handle is dropped before `wait`
    pub kill_on_drop: bool,
}

impl HarnessConfig {
    /// Create a configuration with both streams inherited
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
            redirect_stdin: false,
            redirect_stdout: false,
            kill_on_drop: true,
        }
    }

    /// Create a new builder for `HarnessConfig`
    #[must_use]
    pub fn builder(program: impl Into<PathBuf>) -> HarnessConfigBuilder {
        HarnessConfigBuilder {
            config: Self::new(program),
        }
    }
}

/// Builder for [`HarnessConfig`]
#[derive(Debug)]
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    /// Add an argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.config.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    #[must_use]
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.config.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child
    ///
    /// Overrides are layered over the inherited environment; variables in
    /// [`DANGEROUS_ENV_VARS`] are silently dropped.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.env.insert(key.into(), value.into());
        self
    }

    /// Set the child's working directory
    #[must_use]
    pub fn cwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cwd = Some(path.into());
        self
    }

    /// Intercept the child's standard input
    #[must_use]
    pub const fn redirect_stdin(mut self, redirect: bool) -> Self {
        self.config.redirect_stdin = redirect;
        self
    }

    /// Intercept the child's standard output
    #[must_use]
    pub const fn redirect_stdout(mut self, redirect: bool) -> Self {
        self.config.redirect_stdout = redirect;
        self
    }

    /// Control whether the child is killed when its handle is dropped
    /// without being waited on (default: true)
    #[must_use]
    pub const fn kill_on_drop(mut self, kill: bool) -> Self {
        self.config.kill_on_drop = kill;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> HarnessConfig {
        self.config
    }
}

/// Locate a program on the search path
///
/// # Errors
/// Returns [`HarnessError::ProgramNotFound`] if no matching executable exists
/// on the search path.
pub fn find_program(name: impl AsRef<OsStr>) -> Result<PathBuf> {
    let name = name.as_ref();
    which::which(name).map_err(|_| HarnessError::program_not_found(name.to_string_lossy()))
}
