use colored::Colorize;
use deploykit::Reporter;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a deployment step
pub fn action(msg: &str) {
    println!("{} {}", "----->".cyan().bold(), msg);
}

/// Print a block of captured output (logs, script output), indented
pub fn block(text: &str) {
    for line in text.lines() {
        println!("    {}", line.dimmed());
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Sends harness progress to the terminal
pub struct UiReporter {
    quiet: bool,
}

impl UiReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for UiReporter {
    fn info(&self, message: &str) {
        if self.quiet {
            log::info!("{message}");
            return;
        }
        if message.contains('\n') {
            block(message);
        } else {
            dim(message);
        }
    }

    fn action(&self, message: &str) {
        if self.quiet {
            log::info!("{message}");
            return;
        }
        action(message);
    }
}
