//! Errors that end the application.

use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("failed to initialise logging: {0}")]
    Logging(#[from] orrery_log::TryInitError),

    #[error("failed to build simulation: {0}")]
    Simulation(#[from] orrery_sim::SimError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
