//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{IntegrationMode, SceneSelection};
use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Sun and planets on circular orbits")]
pub struct CliArgs {
    /// Scene to show.
    #[arg(long, value_enum)]
    pub scene: Option<SceneSelection>,

    /// Simulated years per real second.
    #[arg(long)]
    pub speedup: Option<f64>,

    /// Scene units per astronomical unit.
    #[arg(long)]
    pub distance_scale: Option<f64>,

    /// Orbit integration mode.
    #[arg(long, value_enum)]
    pub integration: Option<IntegrationMode>,

    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Directory holding texture files.
    #[arg(long)]
    pub asset_dir: Option<PathBuf>,

    /// Number of background stars.
    #[arg(long)]
    pub star_count: Option<u32>,

    /// Seed for star placement.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(scene) = args.scene {
            self.scene.kind = scene;
        }
        if let Some(speedup) = args.speedup {
            self.simulation.speedup_factor = speedup;
        }
        if let Some(scale) = args.distance_scale {
            self.simulation.distance_scale = scale;
        }
        if let Some(mode) = args.integration {
            self.simulation.integration = mode;
        }
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(ref dir) = args.asset_dir {
            self.assets.dir = dir.clone();
        }
        if let Some(count) = args.star_count {
            self.scene.star_count = count;
        }
        if let Some(seed) = args.seed {
            self.scene.star_seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
