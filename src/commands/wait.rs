use anyhow::{Result, bail};
use deploykit::{Application, Error, Harness, StagingOutcome};
use std::time::Duration;

use crate::Context;
use crate::cli::WaitArgs;
use crate::progress::Spinner;

pub fn run(ctx: &Context, args: WaitArgs) -> Result<()> {
    let (_, harness) = super::harness(ctx, false)?;
    let app = Application::new(&args.name).with_name(&args.name);
    wait_for(ctx, &harness, &app, args.timeout)
}

/// Poll `app`; anything but running shows the recent logs and fails.
pub(crate) fn wait_for(
    ctx: &Context,
    harness: &Harness,
    app: &Application,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let spinner = Spinner::new(format!("Waiting for {} to start…", app.name), ctx.quiet);
    let outcome = match timeout_secs {
        Some(secs) => harness.poll(app, Duration::from_secs(secs)),
        None => harness.poll_default(app),
    };

    if outcome == StagingOutcome::Running {
        spinner.success(&format!("{} is running", app.name));
        return Ok(());
    }

    spinner.failure(&format!("{} is not running ({outcome})", app.name));
    drop(spinner);
    let logs = harness.recent_logs(app)?;
    if ctx.quiet {
        // Quiet reporters print nothing, so the error carries the logs
        return Err(Error::NotRunning { outcome, logs }.into());
    }
    bail!("App is not running ({outcome})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploykit::backend::MockExecutor;
    use crate::ui::UiReporter;
    use deploykit::{CfCommandBuilder, CommandOutput, NoReporter, PollConfig};

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

    #[test]
    fn test_wait_for_running_app() {
        let mock = MockExecutor::new();
        mock.respond("cf app", CommandOutput::success("#0   running"));
        let app = Application::new("web").with_name("web");

        wait_for(&ctx(), &harness(&mock), &app, None).unwrap();
        assert_eq!(mock.count("cf logs"), 0);
    }

    #[test]
    fn test_wait_for_failed_app_fetches_logs() {
        let mock = MockExecutor::new();
        mock.respond("cf app", CommandOutput::success("FAILED\nStagingError"));
        let app = Application::new("web").with_name("web");

        let err = wait_for(&ctx(), &harness(&mock), &app, Some(5)).unwrap_err();

        assert!(err.to_string().contains("staging failed"));
        assert_eq!(mock.count("cf logs web --recent"), 1);
    }

    #[test]
    fn test_wait_for_accepts_any_timeout() {
        let mock = MockExecutor::new();
        mock.respond("cf app", CommandOutput::success("#0   running"));
        let app = Application::new("web").with_name("web");

        wait_for(&ctx(), &harness(&mock), &app, Some(u64::MAX)).unwrap();
    }

    #[test]
    fn test_quiet_failure_keeps_logs_in_error() {
        let mock = MockExecutor::new();
        mock.respond("cf app", CommandOutput::success("FAILED\nStagingError"));
        mock.respond("cf logs", CommandOutput::success("ERR no start command"));
        let harness = harness(&mock).with_reporter(Box::new(UiReporter::new(true)));
        let app = Application::new("web").with_name("web");

        let err = wait_for(&ctx(), &harness, &app, Some(5)).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("staging failed"), "{message}");
        assert!(message.contains("ERR no start command"), "{message}");
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NotRunning { .. })
        ));
    }

    #[test]
    fn test_wait_for_times_out() {
        let mock = MockExecutor::new();
        mock.respond("cf app", CommandOutput::success("#0   starting"));
        let app = Application::new("web").with_name("web");

        let err = wait_for(&ctx(), &harness(&mock), &app, None).unwrap_err();

        assert!(err.to_string().contains("timed out"));
        assert_eq!(mock.count("cf logs"), 1);
    }
}
