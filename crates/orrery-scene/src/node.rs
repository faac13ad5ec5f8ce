use glam::{Mat4, Quat, Vec3};

use crate::material::Material;

/// Translation, rotation and scale of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_scale(scale: f32) -> Self {
        Self {
            scale: Vec3::splat(scale),
            ..Self::IDENTITY
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Tessellation of a unit sphere. Node radius comes from the transform scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SphereGeometry {
    pub width_segments: u32,
    pub height_segments: u32,
}

impl SphereGeometry {
    pub const fn new(width_segments: u32, height_segments: u32) -> Self {
        Self {
            width_segments,
            height_segments,
        }
    }
}

impl Default for SphereGeometry {
    fn default() -> Self {
        Self::new(32, 32)
    }
}

/// What drives a node's transform each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Never moves.
    Static,
    /// The central body: spins in place.
    CentralBody,
    /// The glow shell around the central body: spins with it.
    Glow,
    /// An orbiting body, matched to the simulation by node name.
    Orbiting,
}

/// A sphere in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub role: NodeRole,
    pub geometry: SphereGeometry,
    pub material: Material,
    pub transform: Transform,
}

impl SceneNode {
    pub fn sphere(
        name: impl Into<String>,
        role: NodeRole,
        radius: f32,
        geometry: SphereGeometry,
        material: Material,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            geometry,
            material,
            transform: Transform::from_scale(radius),
        }
    }

    /// Rendered radius.
    pub fn radius(&self) -> f32 {
        self.transform.scale.x
    }
}
