use anyhow::{Context as _, Result};
use deploykit::{Application, DeployOptions, Harness};

use crate::Context;
use crate::cli::DeployArgs;
use crate::config::Config;
use crate::ui;

pub fn run(ctx: &Context, args: DeployArgs) -> Result<()> {
    let (config, harness) = super::harness(ctx, true)?;
    deploy(ctx, &config, &harness, args)
}

/// Build the application from the arguments and deploy it.
pub(crate) fn deploy(
    ctx: &Context,
    config: &Config,
    harness: &Harness,
    args: DeployArgs,
) -> Result<()> {
    let mut app = application(&args)?;

    if args.with_pg {
        let database = args
            .database_name
            .as_deref()
            .unwrap_or(&config.database.name);
        harness
            .enable_database(&mut app, database)
            .with_context(|| format!("Could not bind {} to database {database}", app.name))?;
    }

    let options = DeployOptions::new().start(!args.no_start);
    harness
        .deploy(&app, &options)
        .with_context(|| format!("Failed to deploy {}", app.name))?;

    if !ctx.quiet {
        ui::success(&format!("Deployed {}", app.name));
    }

    if args.wait {
        super::wait::wait_for(ctx, harness, &app, args.timeout)?;
    }
    Ok(())
}

fn application(args: &DeployArgs) -> Result<Application> {
    if !args.path.is_dir() {
        anyhow::bail!("{} is not a directory", args.path.display());
    }
    let mut app = Application::new(&args.path);
    if let Some(name) = &args.name {
        app = app.with_name(name);
    }
    for (key, value) in &args.env {
        app.add_env(key, value);
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploykit::backend::MockExecutor;
    use deploykit::{CfCommandBuilder, CommandOutput, NoReporter, PollConfig};
    use serial_test::serial;
    use std::path::Path;
    use std::time::Duration;

    fn harness(mock: &MockExecutor) -> Harness {
        Harness::new(Box::new(mock.clone()), Box::new(CfCommandBuilder::new()))
            .with_host(Box::new(mock.clone()))
            .with_reporter(Box::new(NoReporter))
            .with_poll_config(
                PollConfig::new(Duration::from_secs(1)).interval(Duration::from_millis(5)),
            )
    }

    fn ctx() -> Context {
        Context {
            verbose: 0,
            quiet: true,
        }
    }

    fn args(path: &Path) -> DeployArgs {
        DeployArgs {
            path: path.to_path_buf(),
            name: Some("web".to_string()),
            env: Vec::new(),
            no_start: false,
            with_pg: false,
            database_name: None,
            wait: false,
            timeout: None,
        }
    }

    #[test]
    #[serial]
    fn test_deploy_without_env_pushes_once() {
        let temp = tempfile::tempdir().unwrap();
        let mock = MockExecutor::new();

        deploy(&ctx(), &Config::default(), &harness(&mock), args(temp.path())).unwrap();

        assert_eq!(mock.count("cf push web"), 1);
        assert_eq!(mock.count("cf push web -p"), 1);
        assert_eq!(mock.count("--no-start"), 0);
    }

    #[test]
    #[serial]
    fn test_deploy_with_env_pushes_twice() {
        let temp = tempfile::tempdir().unwrap();
        let mock = MockExecutor::new();
        let mut args = args(temp.path());
        args.env = vec![("NODE_ENV".to_string(), "production".to_string())];

        deploy(&ctx(), &Config::default(), &harness(&mock), args).unwrap();

        assert_eq!(mock.count("cf push web"), 2);
        assert_eq!(mock.count("cf set-env web NODE_ENV production"), 1);
    }

    #[test]
    #[serial]
    fn test_deploy_with_pg_uses_configured_database() {
        let temp = tempfile::tempdir().unwrap();
        let mock = MockExecutor::new();
        mock.respond(
            "cf api",
            CommandOutput::success("API endpoint: https://api.10.244.0.34.xip.io"),
        );
        let mut config = Config::default();
        config.database.name = "wordpress".to_string();
        let mut args = args(temp.path());
        args.with_pg = true;

        deploy(&ctx(), &config, &harness(&mock), args).unwrap();

        let set_env: Vec<String> = mock
            .history()
            .into_iter()
            .filter(|c| c.contains("set-env web DATABASE_URL"))
            .collect();
        assert_eq!(set_env.len(), 1);
        assert!(set_env[0].contains("buildpacks:buildpacks@10.244.0.30:5524/wordpress"));
    }

    #[test]
    #[serial]
    fn test_deploy_and_wait() {
        let temp = tempfile::tempdir().unwrap();
        let mock = MockExecutor::new();
        mock.respond("cf app", CommandOutput::success("#0   running"));
        let mut args = args(temp.path());
        args.wait = true;

        deploy(&ctx(), &Config::default(), &harness(&mock), args).unwrap();

        let history = mock.history();
        let push = history.iter().position(|c| c.starts_with("cf push web")).unwrap();
        let status = mock.position("cf app web").unwrap();
        assert!(push < status);
    }

    #[test]
    fn test_missing_directory_is_rejected_before_any_command() {
        let mock = MockExecutor::new();
        let result = deploy(
            &ctx(),
            &Config::default(),
            &harness(&mock),
            args(Path::new("/nonexistent/stagehand-app")),
        );

        assert!(result.is_err());
        assert!(mock.history().is_empty());
    }
}
