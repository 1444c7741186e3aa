use anyhow::Result;

use crate::config::Config;
use crate::{Context, paths, ui};

pub fn run(_ctx: &Context) -> Result<()> {
    let loaded = Config::load()?;

    ui::header("Configuration");
    println!();
    ui::kv("Config file", &loaded.path.display().to_string());
    if loaded.exists {
        ui::kv("Status", "loaded");
    } else {
        ui::kv("Status", "not found, using defaults");
    }
    println!();

    let config = &loaded.config;
    ui::info("Effective settings");
    for line in config.to_toml()?.lines() {
        ui::dim(line);
    }

    println!();
    ui::dim(&format!(
        "Set {} to use a different file.",
        paths::ENV_CONFIG
    ));
    if config.host.transport == crate::config::Transport::Vagrant {
        match std::env::var(deploykit::backend::vagrant::ENV_VAGRANT_CWD) {
            Ok(dir) => ui::kv("VAGRANT_CWD", &dir),
            Err(_) => ui::warn("VAGRANT_CWD is not set; deploys will fail"),
        }
    }
    Ok(())
}
