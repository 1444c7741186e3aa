//! Command execution backends.
//!
//! The [`RemoteExecutor`] trait is the only way the core reaches the outside
//! world. Implementations:
//! - [`local::LocalExecutor`]: `sh -c` on this machine (platform CLI, vendoring)
//! - [`vagrant::VagrantExecutor`]: `vagrant ssh -c` into the platform VM
//! - [`ssh::SshExecutor`]: plain `ssh` to a host
//! - [`MockExecutor`]: scripted responses and a recorded history, for tests
//!
//! # Testing
//!
//! ```
//! use deploykit::backend::{MockExecutor, RemoteExecutor};
//! use deploykit::CommandOutput;
//!
//! let mock = MockExecutor::new();
//! mock.respond("cf app", CommandOutput::success("#0   running"));
//!
//! let output = mock.run("cf app my_app").unwrap();
//! assert_eq!(output.output, "#0   running");
//! assert_eq!(mock.history(), vec!["cf app my_app"]);
//! ```

pub mod local;
pub mod ssh;
pub mod vagrant;

use crate::error::{Error, Result};
use crate::types::CommandOutput;
use std::collections::VecDeque;
use std::process::Command;
use std::sync::{Arc, Mutex};

/// Runs one command string and returns its combined output.
///
/// Calls are blocking round trips. Implementations hold only connection
/// parameters, so a single executor can be shared by every component.
pub trait RemoteExecutor: Send + Sync {
    /// Run `command` and wait for it to finish.
    ///
    /// A non-zero exit status is not an error here; it is reported in
    /// [`CommandOutput::exit_status`] for the caller to judge. Errors mean
    /// the command could not be run at all.
    fn run(&self, command: &str) -> Result<CommandOutput>;
}

/// Run a prepared process and collect stdout followed by stderr.
pub(crate) fn collect_output(mut command: Command, description: &str) -> Result<CommandOutput> {
    let output = command.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ConfigurationMissing(format!("{description}: executable not found"))
        } else {
            Error::Io(e)
        }
    })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    // Killed by a signal: no code to report
    let exit_status = output.status.code().unwrap_or(0);
    log::debug!("{description} exited with {exit_status}");

    Ok(CommandOutput {
        output: combined,
        exit_status,
    })
}

#[derive(Debug)]
struct MockResponse {
    pattern: String,
    outputs: VecDeque<std::result::Result<CommandOutput, String>>,
}

/// In-memory executor for tests.
///
/// Every command is appended to a shared history. Responses are matched by
/// substring in registration order; unmatched commands succeed with empty
/// output. A response with several outputs hands them out in order and
/// then keeps repeating the last one. Clones share state, so a clone can
/// be boxed into a [`crate::Harness`] while the test keeps inspecting the
/// original.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    history: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<Vec<MockResponse>>>,
}

impl MockExecutor {
    /// Create a mock that succeeds with empty output for every command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands containing `pattern` with `output`.
    pub fn respond(&self, pattern: impl Into<String>, output: CommandOutput) {
        self.respond_sequence(pattern, vec![output]);
    }

    /// Answer commands containing `pattern` with each output in turn.
    pub fn respond_sequence(&self, pattern: impl Into<String>, outputs: Vec<CommandOutput>) {
        self.responses.lock().unwrap().push(MockResponse {
            pattern: pattern.into(),
            outputs: outputs.into_iter().map(Ok).collect(),
        });
    }

    /// Fail commands containing `pattern` as if the transport broke.
    pub fn fail(&self, pattern: impl Into<String>, message: impl Into<String>) {
        self.responses.lock().unwrap().push(MockResponse {
            pattern: pattern.into(),
            outputs: VecDeque::from([Err(message.into())]),
        });
    }

    /// Append a non-command event to the history, so fakes of other
    /// collaborators can show up in the same ordering.
    pub fn record(&self, entry: impl Into<String>) {
        self.history.lock().unwrap().push(entry.into());
    }

    /// Everything run (or recorded) so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().unwrap().clone()
    }

    /// Number of history entries containing `pattern`.
    pub fn count(&self, pattern: &str) -> usize {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.contains(pattern))
            .count()
    }

    /// Index of the first history entry equal to `entry`.
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.history.lock().unwrap().iter().position(|c| c == entry)
    }
}

impl RemoteExecutor for MockExecutor {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        self.history.lock().unwrap().push(command.to_string());

        let mut responses = self.responses.lock().unwrap();
        let Some(response) = responses
            .iter_mut()
            .find(|r| command.contains(r.pattern.as_str()))
        else {
            return Ok(CommandOutput::default());
        };

        let next = if response.outputs.len() > 1 {
            response.outputs.pop_front()
        } else {
            response.outputs.front().cloned()
        };

        match next {
            Some(Ok(output)) => Ok(output),
            Some(Err(message)) => Err(Error::remote(command, message)),
            None => Ok(CommandOutput::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_default_response() {
        let mock = MockExecutor::new();
        let output = mock.run("anything").unwrap();
        assert!(output.is_success());
        assert!(output.output.is_empty());
    }

    #[test]
    fn test_mock_sequence_repeats_last() {
        let mock = MockExecutor::new();
        mock.respond_sequence(
            "status",
            vec![
                CommandOutput::success("staging"),
                CommandOutput::success("running"),
            ],
        );

        assert_eq!(mock.run("status").unwrap().output, "staging");
        assert_eq!(mock.run("status").unwrap().output, "running");
        assert_eq!(mock.run("status").unwrap().output, "running");
    }

    #[test]
    fn test_mock_first_match_wins() {
        let mock = MockExecutor::new();
        mock.respond("cf push", CommandOutput::with_status("no", 1));
        mock.respond("cf", CommandOutput::success("yes"));

        assert_eq!(mock.run("cf push app").unwrap().exit_status, 1);
        assert_eq!(mock.run("cf delete app").unwrap().output, "yes");
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockExecutor::new();
        mock.fail("cf push", "connection reset");

        let err = mock.run("cf push app").unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(mock.count("cf push"), 1);
    }

    #[test]
    fn test_mock_clones_share_history() {
        let mock = MockExecutor::new();
        let clone = mock.clone();
        clone.run("one").unwrap();
        mock.record("two");

        assert_eq!(clone.history(), vec!["one", "two"]);
        assert_eq!(mock.position("two"), Some(1));
    }
}
