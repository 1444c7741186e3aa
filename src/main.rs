mod cli;
mod commands;
mod config;
mod paths;
mod progress;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    log::debug!("verbosity {}", ctx.verbose);

    let result = match cli.command {
        Command::Deploy(args) => commands::deploy::run(&ctx, args),
        Command::Wait(args) => commands::wait::run(&ctx, args),
        Command::Logs { name } => commands::logs::run(&ctx, &name),
        Command::Config => commands::config::run(&ctx),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "stagehand", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(err) = &result {
        report(err);
    }
    result
}

/// Add category advice when the root cause is a harness error
fn report(err: &anyhow::Error) {
    if let Some(harness_err) = err.downcast_ref::<deploykit::Error>() {
        let category = harness_err.category();
        ui::error(category.description());
        ui::dim(category.advice());
    }
}
