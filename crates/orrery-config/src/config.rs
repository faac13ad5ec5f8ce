//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted config inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub simulation: SimulationConfig,
    pub scene: SceneConfig,
    pub assets: AssetConfig,
    pub debug: DebugConfig,
}

/// Which of the three demo scenes to show.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
pub enum SceneSelection {
    /// A single unlit yellow sphere.
    FlatSphere,
    /// Textured sun with a glow shell.
    GlowingSun,
    /// Sun, eight planets and a starfield.
    #[default]
    SolarSystem,
}

/// How orbital angles advance between frames.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
pub enum IntegrationMode {
    /// Recomputed from total elapsed time every frame.
    #[default]
    Sampled,
    /// Accumulated from per-frame deltas.
    Incremental,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    pub title: String,
}

/// Orbit camera controls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Radians of orbit per pixel of left-drag.
    pub rotate_speed: f32,
    /// Fraction of the current distance per scroll line.
    pub zoom_speed: f32,
    /// Pan speed multiplier for right/middle-drag.
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Damping factor in `[0, 1)`. Zero disables damping.
    pub damping: f32,
    /// Invert vertical drag.
    pub invert_y: bool,
}

/// Orbit simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Scene units per astronomical unit.
    pub distance_scale: f64,
    /// Simulated years per real second.
    pub speedup_factor: f64,
    /// Planet self-rotation in radians per second.
    pub planet_spin_rate: f64,
    /// Sun self-rotation in radians per second.
    pub sun_spin_rate: f64,
    pub integration: IntegrationMode,
}

/// Scene selection and backdrop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub kind: SceneSelection,
    /// Number of background stars in the solar system scene.
    pub star_count: u32,
    /// Seed for star placement.
    pub star_seed: u64,
    /// Opacity of the additive glow shell.
    pub glow_opacity: f32,
}

/// Asset locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding texture files. Relative paths resolve against the
    /// working directory.
    pub dir: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log a frame-rate summary every few seconds.
    pub log_frame_stats: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 1.0,
            min_distance: 2.0,
            max_distance: 2500.0,
            damping: 0.0,
            invert_y: false,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            distance_scale: 50.0,
            speedup_factor: 0.1,
            planet_spin_rate: 0.5,
            sun_spin_rate: 0.1,
            integration: IntegrationMode::Sampled,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            kind: SceneSelection::SolarSystem,
            star_count: 4000,
            star_seed: 42,
            glow_opacity: 0.35,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_frame_stats: false,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let new_config = read_config(&config_path)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
