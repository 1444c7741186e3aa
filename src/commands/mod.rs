pub mod config;
pub mod deploy;
pub mod logs;
pub mod wait;

use anyhow::Result;
use deploykit::Harness;

use crate::Context;
use crate::config::Config;
use crate::ui::UiReporter;

/// Load the config and build a harness that reports to the terminal.
///
/// Only deploying touches the host, so only `deploy` asks for it.
pub(crate) fn harness(ctx: &Context, with_host: bool) -> Result<(Config, Harness)> {
    let config = Config::load()?.config;
    let harness = if with_host {
        config.harness()?
    } else {
        config.platform_harness()
    };
    let harness = harness.with_reporter(Box::new(UiReporter::new(ctx.quiet)));
    Ok((config, harness))
}
