//! Orbit simulation: circular-orbit kinematics, the simulation clock, and the
//! per-frame update loop that drives the solar system scene.
//!
//! Everything here is pure arithmetic over constants. Nothing in this crate
//! touches the GPU, the window, or the filesystem.

pub mod body;
pub mod catalog;
pub mod clock;
pub mod context;
pub mod error;
pub mod frame_loop;

pub use body::{BodySpec, CentralBody, OrbitingBody, orbital_period_years};
pub use catalog::{
    PLANETS, SUN_GLOW_SCALE, SUN_RADIUS, SUN_RADIUS_STANDALONE, SUN_TEXTURE, planet_spec,
};
pub use clock::{FrameTime, ManualTimeSource, SimulationClock, SystemTimeSource, TimeSource};
pub use context::{
    BodyState, OrbitIntegration, SimulationContext, SimulationParams, SimulationSnapshot,
};
pub use error::SimError;
pub use frame_loop::{MAX_FRAME_TIME, OrbitLoop};
