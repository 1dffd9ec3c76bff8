//! Command construction for the harness

use std::collections::HashMap;
use std::env;
use std::process::Stdio;

use tokio::process::Command;

use super::config::{DANGEROUS_ENV_VARS, HarnessConfig};

/// Command builder translating a [`HarnessConfig`] into a process command
pub(super) struct CommandBuilder<'a> {
    config: &'a HarnessConfig,
}

impl<'a> CommandBuilder<'a> {
    /// Create a new command builder
    pub(super) fn new(config: &'a HarnessConfig) -> Self {
        Self { config }
    }

    /// Build the complete command with redirections applied
    pub(super) fn build(&self) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args);

        // Inherit the parent environment, then layer the caller's overrides.
        // Variables that alter how the child loads code are not forwarded.
        let mut process_env = env::vars().collect::<HashMap<_, _>>();
        for (key, value) in &self.config.env {
            if !DANGEROUS_ENV_VARS.contains(&key.as_str()) {
                process_env.insert(key.clone(), value.clone());
            }
        }
        cmd.envs(process_env);

        if let Some(ref cwd) = self.config.cwd {
            cmd.current_dir(cwd);
        }

        // Every requested redirection becomes a pipe; everything else stays
        // bound to the parent's streams. stderr is never intercepted, so
        // child diagnostics reach the terminal directly.
        cmd.stdin(stdio_for(self.config.redirect_stdin));
        cmd.stdout(stdio_for(self.config.redirect_stdout));
        cmd.stderr(Stdio::inherit());

        cmd.kill_on_drop(self.config.kill_on_drop);

        cmd
    }
}

fn stdio_for(redirect: bool) -> Stdio {
    if redirect {
        Stdio::piped()
    } else {
        Stdio::inherit()
    }
}
