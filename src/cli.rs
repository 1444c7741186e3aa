use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stagehand")]
#[command(version)]
#[command(about = "Deploy fixture apps to a Cloud Foundry style platform and check they run", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Vendor, delete and push an application
    Deploy(DeployArgs),

    /// Wait for an application to run or fail staging
    Wait(WaitArgs),

    /// Show an application's recent logs
    Logs {
        /// Application name
        name: String,
    },

    /// Show the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct DeployArgs {
    /// Application source directory
    pub path: PathBuf,

    /// Application name (defaults to the directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Environment variable to set, repeatable
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Push without starting the app
    #[arg(long)]
    pub no_start: bool,

    /// Bind the shared Postgres database (sets DATABASE_URL)
    #[arg(long)]
    pub with_pg: bool,

    /// Database for --with-pg (defaults to the configured name)
    #[arg(long, requires = "with_pg")]
    pub database_name: Option<String>,

    /// Wait for the app to run after pushing
    #[arg(long)]
    pub wait: bool,

    /// Seconds to wait (defaults to the configured timeout)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct WaitArgs {
    /// Application name
    pub name: String,

    /// Seconds to wait (defaults to the configured timeout)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Parse `KEY=VALUE`; the value may itself contain `=`.
pub fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("missing variable name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
