//! Spinner shown while waiting on the platform.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

fn waiting_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

fn done_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Spinner on stderr; hidden when `quiet`. Cleared on drop if unfinished.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: impl Into<String>, quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        pb.set_style(waiting_style());
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(80));
        Self { pb }
    }

    pub fn success(&self, message: &str) {
        self.finish(format!("{} {}", "✓".green(), message));
    }

    pub fn failure(&self, message: &str) {
        self.finish(format!("{} {}", "✗".red(), message));
    }

    fn finish(&self, message: String) {
        self.pb.set_style(done_style());
        self.pb.finish_with_message(message);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}
