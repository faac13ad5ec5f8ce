//! Pointer input for the orrery: mouse state tracking and orbit camera
//! controls. The simulation never sees input; only the camera does.

mod controls;
mod mouse;

pub use controls::{OrbitControls, OrbitControlsSettings};
pub use mouse::MouseState;
