//! Executor that reaches the platform VM through `vagrant ssh`.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::types::CommandOutput;

use super::{RemoteExecutor, collect_output};

/// Environment variable pointing at the directory with the Vagrantfile
pub const ENV_VAGRANT_CWD: &str = "VAGRANT_CWD";

/// Runs commands inside the Vagrant VM with `vagrant ssh -c`.
#[derive(Debug, Clone)]
pub struct VagrantExecutor {
    vagrant_cwd: PathBuf,
}

impl VagrantExecutor {
    /// Create an executor for the Vagrant project in `vagrant_cwd`.
    pub fn new(vagrant_cwd: impl Into<PathBuf>) -> Self {
        Self {
            vagrant_cwd: vagrant_cwd.into(),
        }
    }

    /// Create an executor from `VAGRANT_CWD`.
    ///
    /// Fails with [`Error::ConfigurationMissing`] when the variable is unset
    /// or empty, so no command is ever attempted against an unknown VM.
    pub fn from_env() -> Result<Self> {
        match std::env::var(ENV_VAGRANT_CWD) {
            Ok(dir) if !dir.trim().is_empty() => Ok(Self::new(dir)),
            _ => Err(Error::ConfigurationMissing(format!(
                "{ENV_VAGRANT_CWD} environment variable is not set"
            ))),
        }
    }

    /// Directory holding the Vagrantfile
    pub fn vagrant_cwd(&self) -> &Path {
        &self.vagrant_cwd
    }
}

impl RemoteExecutor for VagrantExecutor {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        log::debug!("vagrant$ {command}");
        let mut process = Command::new("vagrant");
        process
            .args(["ssh", "-c", command])
            .env(ENV_VAGRANT_CWD, &self.vagrant_cwd);
        collect_output(process, "vagrant ssh")
    }
}
