//! Orrery application: window, event loop and startup wiring.

pub mod error;
pub mod platform;
pub mod settings;
pub mod stats;
pub mod window;

pub use error::AppError;
pub use platform::{PlatformDirs, PlatformError};
pub use window::{AppState, run};
