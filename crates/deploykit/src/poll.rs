//! Waiting for an application to stage.
//!
//! [`StatusPoller`] queries status until the platform reports the app as
//! running or failed to stage, or until a deadline passes. The deadline is
//! fixed before the first query, so slow queries eat into the budget
//! instead of extending it.

use std::thread;
use std::time::Instant;

use crate::backend::RemoteExecutor;
use crate::command::CommandBuilder;
use crate::types::{AppStatus, Application, Operation, PollConfig, StagingOutcome};

/// Polls application status until a terminal state or the deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusPoller {
    config: PollConfig,
}

impl StatusPoller {
    /// Poller with the given timing.
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// Poll `app` through `executor`.
    ///
    /// A query that cannot be run counts as "not yet": polling never fails,
    /// it only times out.
    pub fn poll(
        &self,
        app: &Application,
        executor: &dyn RemoteExecutor,
        commands: &dyn CommandBuilder,
    ) -> StagingOutcome {
        let command = commands.build(&Operation::Status, app);

        self.poll_with(|| match executor.run(&command) {
            Ok(output) => AppStatus::parse(&output.output),
            Err(e) => {
                log::debug!("Status query for {} failed: {}", app.name, e);
                AppStatus::Pending
            }
        })
    }

    /// Poll an arbitrary status source.
    ///
    /// `query` is called at least once, even with a zero timeout.
    pub fn poll_with<F>(&self, mut query: F) -> StagingOutcome
    where
        F: FnMut() -> AppStatus,
    {
        // None: the timeout is too large to represent, so there is no deadline
        let deadline = Instant::now().checked_add(self.config.timeout);
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);
            let status = query();
            if let Some(outcome) = status.terminal_outcome() {
                log::debug!("Status {outcome} after {attempts} queries");
                return outcome;
            }

            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        log::debug!("Gave up after {attempts} queries");
                        return StagingOutcome::TimedOut;
                    }
                    self.config.interval.min(deadline - now)
                }
                None => self.config.interval,
            };
            thread::sleep(pause);
        }
    }
}
