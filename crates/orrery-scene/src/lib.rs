//! Renderer-agnostic description of the three demo scenes.
//!
//! A [`SceneDescription`] says what is in a scene: sphere nodes, their
//! materials, lights, the camera rig and the backdrop. A [`SceneGraph`] is the
//! live copy the renderer draws from, kept in step with the simulation by
//! [`SceneGraph::sync`].

pub mod camera;
pub mod graph;
pub mod light;
pub mod material;
pub mod node;
pub mod scene;
pub mod starfield;

pub use camera::Camera;
pub use graph::SceneGraph;
pub use light::Light;
pub use material::{Blending, Color, Material, Side};
pub use node::{NodeRole, SceneNode, SphereGeometry, Transform};
pub use scene::{
    MAX_CAMERA_DISTANCE, STAR_SHELL_INNER, SceneDescription, SceneKind, SceneSettings,
};
pub use starfield::{Star, StarfieldGenerator, blackbody_to_rgb};
