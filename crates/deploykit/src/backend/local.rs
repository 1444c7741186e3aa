//! Executor for commands that run on this machine.
//!
//! The platform CLI and the vendoring script both run locally; only the
//! host log lives on the remote side.

use std::process::Command;

use crate::error::Result;
use crate::types::CommandOutput;

use super::{RemoteExecutor, collect_output};

/// Runs commands through `sh -c` in the current working directory.
#[derive(Debug, Clone)]
pub struct LocalExecutor {
    shell: String,
}

impl LocalExecutor {
    /// Create an executor using `/bin/sh`.
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }

    /// Use a different POSIX shell (e.g. `bash`).
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteExecutor for LocalExecutor {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        log::debug!("$ {command}");
        let mut process = Command::new(&self.shell);
        process.arg("-c").arg(command);
        collect_output(process, &self.shell)
    }
}
