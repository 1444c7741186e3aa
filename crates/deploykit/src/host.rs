//! Host-side housekeeping.

use crate::backend::RemoteExecutor;
use crate::error::Result;

/// Where the host records outbound internet access
pub const INTERNET_ACCESS_LOG: &str = "/var/log/internet_access.log";

/// The host's internet access log.
///
/// Offline buildpack tests read this log to prove an app staged without
/// touching the network, so it must be emptied before each push.
pub struct HostLog<'a> {
    host: &'a dyn RemoteExecutor,
}

impl<'a> HostLog<'a> {
    /// Access log on `host`
    pub fn new(host: &'a dyn RemoteExecutor) -> Self {
        Self { host }
    }

    /// Command that removes the log
    pub fn clear_command() -> String {
        format!("sudo rm -f {INTERNET_ACCESS_LOG}")
    }

    /// Remove the log. A missing log is not an error.
    pub fn clear(&self) -> Result<()> {
        let output = self.host.run(&Self::clear_command())?;
        if !output.is_success() {
            log::debug!("Clearing {INTERNET_ACCESS_LOG} reported: {}", output.output.trim());
        }
        Ok(())
    }

    /// Current contents of the log
    pub fn contents(&self) -> Result<String> {
        let output = self.host.run(&format!("sudo cat {INTERNET_ACCESS_LOG}"))?;
        Ok(output.output)
    }
}
