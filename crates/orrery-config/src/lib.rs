//! Configuration for the orrery.
//!
//! Settings persist to disk as `config.ron`. Missing sections and fields fall
//! back to defaults, unknown fields are ignored, and CLI flags override
//! whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AssetConfig, CameraConfig, Config, DebugConfig, IntegrationMode, SceneConfig, SceneSelection,
    SimulationConfig, WindowConfig, CONFIG_FILE_NAME,
};
pub use error::ConfigError;
