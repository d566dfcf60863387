//! Orrery entry point: load config, start logging, open the window.
//!
//! Run with: `cargo run -p orrery-app`

use std::process::ExitCode;

use clap::Parser;
use orrery_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let (mut config, load_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(
        config.debug.log_dir.as_deref(),
        cfg!(debug_assertions),
        Some(&config),
    );
    if let Some(err) = load_error {
        warn!("Config not loaded ({err}), using defaults");
    }

    info!("Orrery starting");
    info!(
        "Window: {}x{} | Resources: {}",
        config.window.width,
        config.window.height,
        config.scene.resource_dir.display()
    );

    match orrery_app::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Fatal: {err}");
            ExitCode::FAILURE
        }
    }
}
