//! # deploykit
//!
//! Deploy sample applications to a platform-as-a-service and check whether
//! they reach a running state. Built for buildpack integration tests: push
//! a fixture app, wait for it, and on failure show the platform's logs.
//!
//! ## Example
//!
//! ```no_run
//! use deploykit::{Application, DeployOptions, Harness};
//! use std::time::Duration;
//!
//! let harness = Harness::from_env().expect("VAGRANT_CWD not set");
//!
//! let app = Application::new("fixtures/node_web_app").with_env("NODE_ENV", "production");
//! harness.deploy(&app, &DeployOptions::default()).expect("deploy failed");
//!
//! // Err carries the recent logs when the app did not start
//! harness.expect_running(&app, Duration::from_secs(30)).unwrap();
//! ```
//!
//! ## Deployment sequence
//!
//! 1. Clear the host's internet access log
//! 2. Run `package.sh` from the app directory, if present
//! 3. Delete the previous instance
//! 4. Push. Apps with environment variables are pushed without starting,
//!    configured with `set-env`, then pushed again.
//!
//! ## Collaborators
//!
//! Everything that touches the outside world sits behind a trait:
//! - [`RemoteExecutor`]: runs a command string (local shell, `vagrant ssh`, `ssh`)
//! - [`CommandBuilder`]: turns an [`Operation`] into platform CLI syntax
//! - [`VendorScript`]: decides whether vendoring applies
//! - [`Reporter`]: receives progress messages
//!
//! [`backend::MockExecutor`] records every command for tests.

#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(missing_docs)]
#![warn(clippy::all)]

/// Command execution backends.
pub mod backend;
/// Platform command construction.
pub mod command;
/// Shared Postgres service binding.
pub mod database;
/// Deployment sequencing.
pub mod deploy;
/// Error types for deployment operations.
pub mod error;
/// Host-side housekeeping.
pub mod host;
/// Status polling.
pub mod poll;
/// Progress reporting.
pub mod reporter;
/// Common types.
pub mod types;
/// Dependency vendoring.
pub mod vendor;

pub use backend::RemoteExecutor;
pub use command::{CfCommandBuilder, CommandBuilder};
pub use error::{Error, ErrorCategory, Result};
pub use reporter::{LogReporter, NoReporter, Reporter};
pub use types::{
    AppStatus, Application, CommandOutput, DEFAULT_DATABASE_NAME, DatabaseConfig, DeployOptions,
    Operation, PollConfig, StagingOutcome,
};
pub use vendor::{VendorScript, VendorStep};

use backend::local::LocalExecutor;
use backend::vagrant::VagrantExecutor;
use deploy::Deployer;
use poll::StatusPoller;
use std::time::Duration;

/// Owns the collaborators and exposes deploy, poll and diagnostics.
pub struct Harness {
    platform: Box<dyn RemoteExecutor>,
    host: Option<Box<dyn RemoteExecutor>>,
    commands: Box<dyn CommandBuilder>,
    vendor: VendorStep,
    reporter: Box<dyn Reporter>,
    poll: PollConfig,
    database: DatabaseConfig,
}

impl Harness {
    /// Create a harness.
    ///
    /// `platform` runs the platform CLI and vendoring scripts. Status,
    /// logs and database binding need nothing else; [`deploy`](Self::deploy)
    /// also needs a host executor, see [`with_host`](Self::with_host).
    pub fn new(platform: Box<dyn RemoteExecutor>, commands: Box<dyn CommandBuilder>) -> Self {
        Self {
            platform,
            host: None,
            commands,
            vendor: VendorStep::new(),
            reporter: Box::new(LogReporter),
            poll: PollConfig::default(),
            database: DatabaseConfig::default(),
        }
    }

    /// The usual setup: `cf` on this machine, the platform inside the
    /// Vagrant VM named by `VAGRANT_CWD`.
    ///
    /// Fails with [`Error::ConfigurationMissing`] before any command runs
    /// when `VAGRANT_CWD` is unset.
    pub fn from_env() -> Result<Self> {
        let host = VagrantExecutor::from_env()?;
        Ok(Self::new(
            Box::new(LocalExecutor::new()),
            Box::new(CfCommandBuilder::new()),
        )
        .with_host(Box::new(host)))
    }

    /// Set the executor that reaches the machine running the platform
    pub fn with_host(mut self, host: Box<dyn RemoteExecutor>) -> Self {
        self.host = Some(host);
        self
    }

    /// Replace the progress reporter
    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replace the polling timing
    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.poll = config;
        self
    }

    /// Replace where the shared database lives
    pub fn with_database_config(mut self, config: DatabaseConfig) -> Self {
        self.database = config;
        self
    }

    // =========================================================================
    // Deployment
    // =========================================================================

    /// Deploy `app`. See [`deploy::Deployer::deploy`] for the sequence.
    ///
    /// Fails with [`Error::ConfigurationMissing`] before any command runs
    /// when no host executor is set.
    pub fn deploy(&self, app: &Application, options: &DeployOptions) -> Result<()> {
        self.deployer()?.deploy(app, options)
    }

    /// Bind `app` to the shared Postgres database `name`.
    ///
    /// Appends `DATABASE_URL` to the app's environment, so the next deploy
    /// takes the two-phase path.
    pub fn enable_database(&self, app: &mut Application, name: &str) -> Result<()> {
        let command = self.commands.build(&Operation::ApiEndpoint, app);
        self.reporter.info(&format!("$ {command}"));
        let output = self.platform.run(&command)?;

        let url = database::database_url(&output.output, name, &self.database)?;
        app.add_env(database::DATABASE_URL, url);
        Ok(())
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Wait up to `timeout` for `app` to run or fail staging.
    pub fn poll(&self, app: &Application, timeout: Duration) -> StagingOutcome {
        let config = PollConfig {
            timeout,
            ..self.poll
        };
        StatusPoller::new(config).poll(app, self.platform.as_ref(), self.commands.as_ref())
    }

    /// [`poll`](Self::poll) with the configured timeout (30 seconds unless changed).
    pub fn poll_default(&self, app: &Application) -> StagingOutcome {
        self.poll(app, self.poll.timeout)
    }

    /// Recent log tail for `app`.
    pub fn recent_logs(&self, app: &Application) -> Result<String> {
        let command = self.commands.build(&Operation::Logs { recent: true }, app);
        self.reporter.info(&format!("On Host: $ {command}"));
        let output = self.platform.run(&command)?;
        self.reporter.info(&output.output);
        Ok(output.output)
    }

    /// Poll and turn anything but [`StagingOutcome::Running`] into an error
    /// carrying the recent logs.
    pub fn expect_running(&self, app: &Application, timeout: Duration) -> Result<()> {
        match self.poll(app, timeout) {
            StagingOutcome::Running => Ok(()),
            outcome => {
                let logs = self.recent_logs(app)?;
                Err(Error::NotRunning { outcome, logs })
            }
        }
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn deployer(&self) -> Result<Deployer<'_>> {
        let host = self.host.as_deref().ok_or_else(|| {
            Error::ConfigurationMissing("host executor (needed to clear the host log)".to_string())
        })?;
        Ok(Deployer::new(
            self.platform.as_ref(),
            host,
            self.commands.as_ref(),
            &self.vendor,
            self.reporter.as_ref(),
        ))
    }
}
