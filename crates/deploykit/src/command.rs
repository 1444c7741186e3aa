//! Platform command construction.
//!
//! The orchestrator and the poller never format command strings; they ask a
//! [`CommandBuilder`] for one. Swapping the builder retargets the harness to
//! another platform CLI without touching the sequencing logic.

use crate::types::{Application, Operation};

/// Builds the command string that performs `operation` on `app`.
pub trait CommandBuilder: Send + Sync {
    /// Command for `operation` against `app`
    fn build(&self, operation: &Operation<'_>, app: &Application) -> String;
}

/// Cloud Foundry `cf` CLI syntax.
#[derive(Debug, Clone)]
pub struct CfCommandBuilder {
    cli: String,
}

impl CfCommandBuilder {
    /// Builder for the `cf` binary on `PATH`.
    pub fn new() -> Self {
        Self::with_cli("cf")
    }

    /// Builder for a differently named or located binary.
    pub fn with_cli(cli: impl Into<String>) -> Self {
        Self { cli: cli.into() }
    }
}

impl Default for CfCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuilder for CfCommandBuilder {
    fn build(&self, operation: &Operation<'_>, app: &Application) -> String {
        let cli = &self.cli;
        let name = shell_words::quote(&app.name);

        match operation {
            Operation::Push { start } => {
                let path = app.src_directory.to_string_lossy();
                let mut command = format!("{cli} push {name} -p {}", shell_words::quote(&path));
                if !start {
                    command.push_str(" --no-start");
                }
                command
            }
            Operation::Delete => format!("{cli} delete -f {name}"),
            Operation::SetEnv { key, value } => format!(
                "{cli} set-env {name} {} {}",
                shell_words::quote(key),
                shell_words::quote(value)
            ),
            Operation::Status => format!("{cli} app {name}"),
            Operation::Logs { recent: true } => format!("{cli} logs {name} --recent"),
            Operation::Logs { recent: false } => format!("{cli} logs {name}"),
            Operation::ApiEndpoint => format!("{cli} api"),
        }
    }
}
