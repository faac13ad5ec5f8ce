//! The `orrery` binary.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::{AppError, PlatformDirs};
use orrery_config::{CliArgs, Config};
use tracing::info;

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("orrery: {e}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<(), AppError> {
    let args = CliArgs::parse();

    let dirs = match args.config.clone() {
        Some(config_dir) => PlatformDirs::with_config_dir(config_dir),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config))?;
    info!(
        config_dir = %dirs.config_dir.display(),
        scene = ?config.scene.kind,
        "Starting orrery"
    );

    orrery_app::run(config)
}
