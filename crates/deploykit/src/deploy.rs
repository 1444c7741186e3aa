//! Deployment sequencing.
//!
//! A deploy always runs, in order:
//! 1. clear the host's internet access log
//! 2. vendor dependencies (fatal on failure)
//! 3. delete any previous instance
//! 4. push; apps with environment variables are pushed without starting,
//!    configured, then pushed again to start
//!
//! Each step finishes before the next begins and the first failure stops
//! the sequence. Nothing is retried or rolled back.

use crate::backend::RemoteExecutor;
use crate::command::CommandBuilder;
use crate::error::{Error, Result};
use crate::host::HostLog;
use crate::reporter::Reporter;
use crate::types::{Application, CommandOutput, DeployOptions, Operation};
use crate::vendor::VendorStep;

/// Drives one deployment through its collaborators.
pub struct Deployer<'a> {
    platform: &'a dyn RemoteExecutor,
    host: &'a dyn RemoteExecutor,
    commands: &'a dyn CommandBuilder,
    vendor: &'a VendorStep,
    reporter: &'a dyn Reporter,
}

impl<'a> Deployer<'a> {
    /// `platform` runs the platform CLI and the vendoring script, `host`
    /// reaches the machine hosting the platform.
    pub fn new(
        platform: &'a dyn RemoteExecutor,
        host: &'a dyn RemoteExecutor,
        commands: &'a dyn CommandBuilder,
        vendor: &'a VendorStep,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            platform,
            host,
            commands,
            vendor,
            reporter,
        }
    }

    /// Deploy `app`.
    ///
    /// `options.start` only applies to apps without environment variables;
    /// the second push of the two-phase path always starts the app.
    pub fn deploy(&self, app: &Application, options: &DeployOptions) -> Result<()> {
        HostLog::new(self.host).clear()?;

        self.vendor.execute(app, self.platform, self.reporter)?;

        self.reporter.action(&format!("Deleting app {}", app.name));
        self.run(Operation::Delete, app)?;

        if app.has_environment_variables() {
            self.reporter
                .action(&format!("Pushing app {} without starting", app.name));
            self.run(Operation::Push { start: false }, app)?;

            self.reporter.action("Setting environment variables");
            for (key, value) in &app.environment {
                self.run(Operation::SetEnv { key, value }, app)?;
            }

            self.reporter.action(&format!("Starting app {}", app.name));
            self.run(Operation::Push { start: true }, app)?;
        } else {
            self.reporter.action(&format!("Pushing app {}", app.name));
            self.run(Operation::Push { start: options.start }, app)?;
        }

        Ok(())
    }

    /// Run one platform operation; a non-zero exit is a remote failure.
    fn run(&self, operation: Operation<'_>, app: &Application) -> Result<CommandOutput> {
        let command = self.commands.build(&operation, app);
        self.reporter.info(&format!("$ {command}"));

        let output = self.platform.run(&command)?;
        if !output.is_success() {
            return Err(Error::remote(operation.name(), output.output.trim()));
        }
        Ok(output)
    }
}
