use anyhow::{Context, Result};
use deploykit::backend::local::LocalExecutor;
use deploykit::backend::ssh::SshExecutor;
use deploykit::backend::vagrant::VagrantExecutor;
use deploykit::{
    CfCommandBuilder, DEFAULT_DATABASE_NAME, DatabaseConfig, Harness, PollConfig, RemoteExecutor,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;

// ============================================================================
// Config file
// ============================================================================

/// How the harness reaches the machine running the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// `vagrant ssh` into the VM named by `VAGRANT_CWD`
    #[default]
    Vagrant,
    /// Plain ssh to `host.ssh_target`
    Ssh,
    /// The platform runs on this machine
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HostConfig {
    pub transport: Transport,
    pub ssh_target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Platform CLI binary
    pub cli: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            cli: "cf".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSection {
    pub timeout_secs: u64,
    pub interval_ms: u64,
}

impl Default for PollSection {
    fn default() -> Self {
        let defaults = PollConfig::default();
        Self {
            timeout_secs: defaults.timeout.as_secs(),
            interval_ms: defaults.interval.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// Database used by `--with-pg` when `--database-name` is not given
    pub name: String,
    #[serde(flatten)]
    pub service: DatabaseConfig,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_DATABASE_NAME.to_string(),
            service: DatabaseConfig::default(),
        }
    }
}

/// Contents of `config.toml`; every section is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub host: HostConfig,
    pub platform: PlatformConfig,
    pub poll: PollSection,
    pub database: DatabaseSection,
}

/// A config together with where it came from
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    pub exists: bool,
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist
    pub fn load() -> Result<LoadedConfig> {
        let path = paths::config_file()?;
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(LoadedConfig {
                config: Self::default(),
                path,
                exists: false,
            });
        }
        let config = Self::load_from(&path)?;
        Ok(LoadedConfig {
            config,
            path,
            exists: true,
        })
    }

    /// Load a specific config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Parse config TOML
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize back to TOML (for `stagehand config`)
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new(Duration::from_secs(self.poll.timeout_secs))
            .interval(Duration::from_millis(self.poll.interval_ms))
    }

    /// Executor for the machine running the platform.
    ///
    /// Fails before anything runs when the transport's settings are missing.
    pub fn host_executor(&self) -> Result<Box<dyn RemoteExecutor>> {
        let executor: Box<dyn RemoteExecutor> = match self.host.transport {
            Transport::Vagrant => Box::new(VagrantExecutor::from_env()?),
            Transport::Ssh => {
                let target = self.host.ssh_target.clone().unwrap_or_default();
                Box::new(SshExecutor::new(target)?)
            }
            Transport::Local => Box::new(LocalExecutor::new()),
        };
        Ok(executor)
    }

    /// Harness for status, logs and database binding; it cannot deploy.
    pub fn platform_harness(&self) -> Harness {
        Harness::new(
            Box::new(LocalExecutor::new()),
            Box::new(CfCommandBuilder::with_cli(&self.platform.cli)),
        )
        .with_poll_config(self.poll_config())
        .with_database_config(self.database.service.clone())
    }

    /// Harness that can also deploy, which needs the host connection
    pub fn harness(&self) -> Result<Harness> {
        let host = self
            .host_executor()
            .context("Could not set up the host connection")?;
        Ok(self.platform_harness().with_host(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploykit::backend::vagrant::ENV_VAGRANT_CWD as VAGRANT_CWD;
    use serial_test::serial;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.host.transport, Transport::Vagrant);
        assert_eq!(config.platform.cli, "cf");
        assert_eq!(config.poll_config(), PollConfig::default());
        assert_eq!(config.database.name, "buildpacks");
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
[host]
transport = "ssh"
ssh_target = "vcap@10.244.0.34"

[platform]
cli = "/usr/local/bin/cf"

[poll]
timeout_secs = 120
interval_ms = 500

[database]
name = "wordpress"
port = 5432
"#,
        )
        .unwrap();

        assert_eq!(config.host.transport, Transport::Ssh);
        assert_eq!(config.host.ssh_target.as_deref(), Some("vcap@10.244.0.34"));
        assert_eq!(config.platform.cli, "/usr/local/bin/cf");
        assert_eq!(config.poll_config().timeout, Duration::from_secs(120));
        assert_eq!(config.poll_config().interval, Duration::from_millis(500));
        assert_eq!(config.database.name, "wordpress");
        assert_eq!(config.database.service.port, 5432);
        assert_eq!(config.database.service.user, "buildpacks");
    }

    #[test]
    fn test_ssh_without_target_fails() {
        let config = Config::parse("[host]\ntransport = \"ssh\"\n").unwrap();
        let err = config.host_executor().err().unwrap();
        assert!(err.to_string().contains("ssh target"));
    }

    #[test]
    #[serial]
    fn test_platform_harness_ignores_host_settings() {
        let config = Config::default();
        let original = std::env::var(VAGRANT_CWD).ok();
        // SAFETY: test is #[serial]
        unsafe { std::env::remove_var(VAGRANT_CWD) };

        let full = config.harness();
        let platform_only = config.platform_harness();
        let app = deploykit::Application::new("fixtures/web");
        let deploy = platform_only.deploy(&app, &deploykit::DeployOptions::default());

        if let Some(value) = original {
            unsafe { std::env::set_var(VAGRANT_CWD, value) };
        }
        assert!(full.is_err());
        assert_eq!(
            deploy.unwrap_err().category(),
            deploykit::ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_unknown_transport_is_rejected() {
        assert!(Config::parse("[host]\ntransport = \"telnet\"\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[host]\ntransport = \"local\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.host.transport, Transport::Local);
        assert!(config.harness().is_ok());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = Config::default();
        let parsed = Config::parse(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
