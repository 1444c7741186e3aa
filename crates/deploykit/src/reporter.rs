//! Progress reporting for deployments.
//!
//! Components receive a [`Reporter`] instead of reaching for a global
//! logger, so tests can silence or capture what a deployment announces.

/// Receives human-readable progress from the harness.
pub trait Reporter: Send + Sync {
    /// Detail: echoed commands, their output.
    fn info(&self, message: &str);

    /// A step that is about to happen.
    fn action(&self, message: &str);
}

/// Reporter that drops everything.
pub struct NoReporter;

impl Reporter for NoReporter {
    fn info(&self, _message: &str) {}

    fn action(&self, _message: &str) {}
}

/// Reporter that forwards to the `log` facade at info level.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn action(&self, message: &str) {
        log::info!("-----> {message}");
    }
}

#[cfg(test)]
use std::sync::{Arc, Mutex};

/// Reporter that keeps every message, prefixed with `info:` or `action:`.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

#[cfg(test)]
impl MemoryReporter {
    /// Create an empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push(format!("info: {message}"));
    }

    fn action(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("action: {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_shares_messages() {
        let reporter = MemoryReporter::new();
        let clone = reporter.clone();
        clone.action("Pushing app");
        clone.info("$ cf push app");

        assert_eq!(
            reporter.messages(),
            vec!["action: Pushing app", "info: $ cf push app"]
        );
    }
}
