use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

/// An application to deploy: a name, a source directory and the
/// environment variables it needs on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Name of the application on the platform
    pub name: String,
    /// Local directory holding the application's sources
    pub src_directory: PathBuf,
    /// Environment variables, in the order they are set
    #[serde(default)]
    pub environment: Vec<(String, String)>,
}

impl Application {
    /// Create an application from its source directory.
    ///
    /// The name is the last component of `path` (`fixtures/node_app` is
    /// deployed as `node_app`).
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            src_directory: path.to_path_buf(),
            environment: Vec::new(),
        }
    }

    /// Override the platform name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add an environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_env(key, value);
        self
    }

    /// Add an environment variable. Duplicates are kept.
    pub fn add_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.environment.push((key.into(), value.into()));
    }

    /// Whether the platform must be configured before the app can start
    pub fn has_environment_variables(&self) -> bool {
        !self.environment.is_empty()
    }
}

/// Options for a single `deploy` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOptions {
    /// Start the app after pushing it. Only honoured by the single-push path.
    pub start: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self { start: true }
    }
}

impl DeployOptions {
    /// Create options with defaults (start after push)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start behaviour
    pub fn start(mut self, start: bool) -> Self {
        self.start = start;
        self
    }
}

/// How a polling run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagingOutcome {
    /// The platform reported the app as running
    Running,
    /// The platform reported a staging failure
    StagingFailed,
    /// The deadline passed without a terminal status
    TimedOut,
}

impl StagingOutcome {
    /// Returns true if the app is running
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for StagingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::StagingFailed => write!(f, "staging failed"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Result of a single status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    /// At least one instance is running
    Running,
    /// Staging failed; the app will not start without a new push
    StagingFailed,
    /// Anything else: staging, starting, crashed-and-restarting, unknown
    Pending,
}

static STAGING_FAILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)staging\s*(error|failed)").expect("static regex")
});

static INSTANCE_RUNNING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(#\d+\s+running\b|state:\s*running\b|running\s*$)").expect("static regex")
});

impl AppStatus {
    /// Parse the output of the status command.
    ///
    /// A staging failure wins over a running instance, since the running
    /// instance belongs to a previous push.
    pub fn parse(output: &str) -> Self {
        if STAGING_FAILED.is_match(output) {
            Self::StagingFailed
        } else if INSTANCE_RUNNING.is_match(output) {
            Self::Running
        } else {
            Self::Pending
        }
    }

    /// The outcome this status ends polling with, if it is terminal
    pub fn terminal_outcome(&self) -> Option<StagingOutcome> {
        match self {
            Self::Running => Some(StagingOutcome::Running),
            Self::StagingFailed => Some(StagingOutcome::StagingFailed),
            Self::Pending => None,
        }
    }
}

/// Combined output and exit status of one executed command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// stdout followed by stderr
    pub output: String,
    /// Exit status; 0 when the executor could not report one
    pub exit_status: i32,
}

impl CommandOutput {
    /// A successful output
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            exit_status: 0,
        }
    }

    /// An output with the given exit status
    pub fn with_status(output: impl Into<String>, exit_status: i32) -> Self {
        Self {
            output: output.into(),
            exit_status,
        }
    }

    /// Returns true if the command exited with status 0
    pub fn is_success(&self) -> bool {
        self.exit_status == 0
    }
}

/// A platform operation a [`crate::CommandBuilder`] knows how to express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    /// Upload the application, optionally starting it
    Push {
        /// Start after upload
        start: bool,
    },
    /// Delete the application (no error if it does not exist)
    Delete,
    /// Set one environment variable
    SetEnv {
        /// Variable name
        key: &'a str,
        /// Variable value
        value: &'a str,
    },
    /// Query the application's state
    Status,
    /// Fetch application logs
    Logs {
        /// Only the recent tail instead of streaming
        recent: bool,
    },
    /// Print the platform API endpoint
    ApiEndpoint,
}

impl Operation<'_> {
    /// Short name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Self::Push { .. } => "push",
            Self::Delete => "delete",
            Self::SetEnv { .. } => "set-env",
            Self::Status => "status",
            Self::Logs { .. } => "logs",
            Self::ApiEndpoint => "api",
        }
    }
}

/// Timing for status polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Give up after this long without a terminal status
    pub timeout: Duration,
    /// Pause between queries, clamped to the time remaining
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            interval: Duration::from_millis(250),
        }
    }
}

impl PollConfig {
    /// Create a config with the default interval and the given timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Set the interval between queries
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Where the platform's shared Postgres service lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Port the service listens on
    pub port: u16,
    /// Last octet of the service address within the platform's subnet
    pub host_octet: u8,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "buildpacks".to_string(),
            password: "buildpacks".to_string(),
            port: 5524,
            host_octet: 30,
        }
    }
}

/// Database name used when the caller does not pick one
pub const DEFAULT_DATABASE_NAME: &str = "buildpacks";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_name_from_path() {
        let app = Application::new("path/app_name");
        assert_eq!(app.name, "app_name");
        assert_eq!(app.src_directory, PathBuf::from("path/app_name"));
        assert!(!app.has_environment_variables());
    }

    #[test]
    fn test_application_env_keeps_order_and_duplicates() {
        let app = Application::new("app")
            .with_env("B", "2")
            .with_env("A", "1")
            .with_env("B", "3");
        assert!(app.has_environment_variables());
        let keys: Vec<&str> = app.environment.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_deploy_options_default_starts() {
        assert!(DeployOptions::default().start);
        assert!(!DeployOptions::new().start(false).start);
    }

    #[test]
    fn test_parse_running_instance() {
        let output = "\
requested state: started
instances: 1/1

     state     since                    cpu    memory
#0   running   2014-06-24 05:25:13 PM   0.0%   19.2M of 256M
";
        assert_eq!(AppStatus::parse(output), AppStatus::Running);
    }

    #[test]
    fn test_parse_staging_failed() {
        let output = "FAILED\nServer error, status code: 400, error code: 170001, message: Staging error: cannot get instances";
        assert_eq!(AppStatus::parse(output), AppStatus::StagingFailed);
        assert_eq!(AppStatus::parse("staging failed"), AppStatus::StagingFailed);
    }

    #[test]
    fn test_parse_staging_failure_wins_over_running() {
        let output = "#0   running   2014-06-24\nStagingError";
        assert_eq!(AppStatus::parse(output), AppStatus::StagingFailed);
    }

    #[test]
    fn test_parse_pending() {
        assert_eq!(AppStatus::parse("#0   starting   2014-06-24"), AppStatus::Pending);
        assert_eq!(AppStatus::parse("#0   crashed"), AppStatus::Pending);
        assert_eq!(AppStatus::parse(""), AppStatus::Pending);
        assert_eq!(AppStatus::parse("instances: 0/1 not running yet"), AppStatus::Pending);
    }

    #[test]
    fn test_terminal_outcome() {
        assert_eq!(
            AppStatus::Running.terminal_outcome(),
            Some(StagingOutcome::Running)
        );
        assert_eq!(
            AppStatus::StagingFailed.terminal_outcome(),
            Some(StagingOutcome::StagingFailed)
        );
        assert_eq!(AppStatus::Pending.terminal_outcome(), None);
    }

    #[test]
    fn test_poll_config_default() {
        let config = PollConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.interval, Duration::from_millis(250));
    }

    #[test]
    fn test_command_output_success() {
        assert!(CommandOutput::success("ok").is_success());
        assert!(!CommandOutput::with_status("nope", 1).is_success());
    }
}
