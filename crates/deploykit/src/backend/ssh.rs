//! Executor that reaches a host with plain `ssh`.

use std::process::Command;

use crate::error::{Error, Result};
use crate::types::CommandOutput;

use super::{RemoteExecutor, collect_output};

/// Runs commands on `target` (`user@host`) over ssh in batch mode.
#[derive(Debug, Clone)]
pub struct SshExecutor {
    target: String,
    options: Vec<String>,
}

impl SshExecutor {
    /// Create an executor for `target`.
    ///
    /// An empty target is [`Error::ConfigurationMissing`].
    pub fn new(target: impl Into<String>) -> Result<Self> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(Error::ConfigurationMissing(
                "ssh target (user@host) is not set".to_string(),
            ));
        }
        Ok(Self {
            target,
            options: vec!["-o".to_string(), "BatchMode=yes".to_string()],
        })
    }

    /// Add an `-o` option (e.g. `StrictHostKeyChecking=no`).
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push("-o".to_string());
        self.options.push(option.into());
        self
    }

    /// Arguments passed to `ssh` for `command`
    fn args<'a>(&'a self, command: &'a str) -> Vec<&'a str> {
        let mut args: Vec<&str> = self.options.iter().map(String::as_str).collect();
        args.push(&self.target);
        args.push(command);
        args
    }
}

impl RemoteExecutor for SshExecutor {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        log::debug!("{}$ {command}", self.target);
        let mut process = Command::new("ssh");
        process.args(self.args(command));
        collect_output(process, "ssh")
    }
}
