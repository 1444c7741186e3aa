//! Error types for deployment operations.
//!
//! Errors are categorized so callers can tell configuration problems apart
//! from remote failures and decide what feedback to give. Staging failures
//! and timeouts are not errors: [`crate::StagingOutcome`] reports them as
//! values.

use thiserror::Error;

use crate::types::StagingOutcome;

/// Categories of deployment errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Required environment or connection configuration is absent
    Configuration,
    /// The vendoring script exited non-zero
    Vendor,
    /// A platform command failed at the transport or remote-tool level
    Remote,
    /// The application did not reach a running state
    NotRunning,
    /// Local IO (spawning processes, changing directories)
    Io,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Configuration => "Missing configuration",
            Self::Vendor => "Dependency vendoring failed",
            Self::Remote => "Remote operation failed",
            Self::NotRunning => "Application is not running",
            Self::Io => "Local IO error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Configuration => "Set the missing environment variable or config key and retry",
            Self::Vendor => "Run package.sh locally and fix the reported failure",
            Self::Remote => "Check the platform CLI output above and the target's health",
            Self::NotRunning => "Inspect the recent logs for staging or start-up errors",
            Self::Io => "Check the application path and local permissions",
        }
    }
}

/// Errors that can occur while deploying or checking an application.
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is absent; raised before any remote call
    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    /// The vendoring script exited with a non-zero status
    #[error("Failed to vendor dependencies:\n{output}")]
    VendorFailure {
        /// Combined output of the vendoring script
        output: String,
    },

    /// A push, delete, set-env or query failed
    #[error("{operation} failed: {message}")]
    RemoteOperationFailure {
        /// Name of the operation that failed (e.g. `push`)
        operation: String,
        /// Output reported by the transport or the remote tool
        message: String,
    },

    /// The application did not reach a running state
    #[error("App is not running ({outcome}). Logs are:\n{logs}")]
    NotRunning {
        /// How polling ended
        outcome: StagingOutcome,
        /// Recent log tail fetched after polling gave up
        logs: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::ConfigurationMissing(_) => ErrorCategory::Configuration,
            Error::VendorFailure { .. } => ErrorCategory::Vendor,
            Error::RemoteOperationFailure { .. } => ErrorCategory::Remote,
            Error::NotRunning { .. } => ErrorCategory::NotRunning,
            Error::Io(_) => ErrorCategory::Io,
        }
    }

    /// Shorthand for a remote failure of `operation`.
    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::RemoteOperationFailure {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Result type for deployment operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let err = Error::ConfigurationMissing("VAGRANT_CWD".to_string());
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let err = Error::VendorFailure {
            output: "boom".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Vendor);

        let err = Error::remote("push", "no space left");
        assert_eq!(err.category(), ErrorCategory::Remote);
    }

    #[test]
    fn test_vendor_failure_message_carries_output() {
        let err = Error::VendorFailure {
            output: "npm ERR! missing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to vendor dependencies:\nnpm ERR! missing"
        );
    }

    #[test]
    fn test_not_running_message() {
        let err = Error::NotRunning {
            outcome: StagingOutcome::StagingFailed,
            logs: "OUT staging failed".to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("App is not running"));
        assert!(message.ends_with("Logs are:\nOUT staging failed"));
    }

    #[test]
    fn test_remote_message() {
        let err = Error::remote("set-env", "app not found");
        assert_eq!(err.to_string(), "set-env failed: app not found");
    }
}
