use anyhow::Result;
use deploykit::Application;

use crate::Context;

/// Print the recent log tail; the harness reporter does the printing.
pub fn run(ctx: &Context, name: &str) -> Result<()> {
    let (_, harness) = super::harness(ctx, false)?;
    let app = Application::new(name).with_name(name);
    let logs = harness.recent_logs(&app)?;
    if ctx.quiet {
        print!("{logs}");
    }
    Ok(())
}
