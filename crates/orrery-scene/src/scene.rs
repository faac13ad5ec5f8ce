//! The three demo scenes.

use glam::Vec3;
use orrery_sim::{PLANETS, SUN_GLOW_SCALE, SUN_RADIUS, SUN_RADIUS_STANDALONE, SUN_TEXTURE};
use tracing::debug;

use crate::camera::Camera;
use crate::light::Light;
use crate::material::{Blending, Color, Material, Side};
use crate::node::{NodeRole, SceneNode, SphereGeometry};
use crate::starfield::{Star, StarfieldGenerator};

/// Which scene to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SceneKind {
    /// One unlit yellow sphere on black.
    FlatSphere,
    /// A textured, bump- and displacement-mapped sun with a glow shell.
    GlowingSun,
    /// The sun, eight planets and a starfield.
    #[default]
    SolarSystem,
}

/// Knobs that shape the built scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSettings {
    pub star_count: u32,
    pub star_seed: u64,
    pub glow_opacity: f32,
    /// Initial camera aspect ratio, normally the window's.
    pub aspect_ratio: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            star_count: 4000,
            star_seed: 42,
            glow_opacity: 0.35,
            aspect_ratio: 16.0 / 9.0,
        }
    }
}

const SUN_EMISSIVE: u32 = 0xff6600;
const GLOW_COLOR: u32 = 0xffaa33;
/// Distance from the origin at which the starfield begins.
pub const STAR_SHELL_INNER: f32 = 3000.0;
const STAR_SHELL_OUTER: f32 = 4500.0;
/// Furthest the orbit camera may sit from its target, inside the starfield.
pub const MAX_CAMERA_DISTANCE: f32 = 2500.0;

/// Everything a scene starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub kind: SceneKind,
    pub nodes: Vec<SceneNode>,
    pub lights: Vec<Light>,
    pub camera: Camera,
    /// Where the orbit controls initially point the camera.
    pub camera_target: Vec3,
    pub clear_color: Color,
    pub stars: Vec<Star>,
}

impl SceneDescription {
    pub fn build(kind: SceneKind, settings: &SceneSettings) -> Self {
        let mut scene = match kind {
            SceneKind::FlatSphere => flat_sphere(),
            SceneKind::GlowingSun => glowing_sun(settings),
            SceneKind::SolarSystem => solar_system(settings),
        };
        scene.camera.set_aspect_ratio(settings.aspect_ratio, 1.0);
        scene.camera.look_at(scene.camera_target);
        debug!(
            ?kind,
            nodes = scene.nodes.len(),
            lights = scene.lights.len(),
            stars = scene.stars.len(),
            "Scene built"
        );
        scene
    }

    pub fn node(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

fn flat_sphere() -> SceneDescription {
    let sphere = SceneNode::sphere(
        "Sphere",
        NodeRole::Static,
        SUN_RADIUS_STANDALONE as f32,
        SphereGeometry::new(32, 32),
        Material::Basic {
            color: Color::from_hex(0xffff00),
        },
    );
    SceneDescription {
        kind: SceneKind::FlatSphere,
        nodes: vec![sphere],
        lights: Vec::new(),
        camera: Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 75.0, 0.1, 1000.0),
        camera_target: Vec3::ZERO,
        clear_color: Color::BLACK,
        stars: Vec::new(),
    }
}

fn glow_shell(sun_radius: f64, opacity: f32) -> SceneNode {
    SceneNode::sphere(
        "Glow",
        NodeRole::Glow,
        (sun_radius * SUN_GLOW_SCALE) as f32,
        SphereGeometry::new(64, 64),
        Material::Glow {
            color: Color::from_hex(GLOW_COLOR),
            opacity,
            side: Side::Back,
            blending: Blending::Additive,
        },
    )
}

fn glowing_sun(settings: &SceneSettings) -> SceneDescription {
    let sun = SceneNode::sphere(
        "Sun",
        NodeRole::CentralBody,
        SUN_RADIUS_STANDALONE as f32,
        SphereGeometry::new(128, 128),
        Material::Standard {
            color: Color::WHITE,
            map: Some(SUN_TEXTURE.to_string()),
            bump_map: Some(SUN_TEXTURE.to_string()),
            bump_scale: 0.05,
            displacement_map: Some(SUN_TEXTURE.to_string()),
            displacement_scale: 0.05,
            emissive: Color::from_hex(SUN_EMISSIVE),
            emissive_intensity: 0.6,
        },
    );
    SceneDescription {
        kind: SceneKind::GlowingSun,
        nodes: vec![sun, glow_shell(SUN_RADIUS_STANDALONE, settings.glow_opacity)],
        lights: vec![Light::Ambient {
            color: Color::WHITE,
            intensity: 0.8,
        }],
        camera: Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 75.0, 0.1, 1000.0),
        camera_target: Vec3::ZERO,
        clear_color: Color::BLACK,
        stars: Vec::new(),
    }
}

fn solar_system(settings: &SceneSettings) -> SceneDescription {
    let sun = SceneNode::sphere(
        "Sun",
        NodeRole::CentralBody,
        SUN_RADIUS as f32,
        SphereGeometry::new(64, 64),
        Material::Emissive {
            color: Color::WHITE,
            map: Some(SUN_TEXTURE.to_string()),
            intensity: 1.0,
        },
    );

    let mut nodes = vec![sun, glow_shell(SUN_RADIUS, settings.glow_opacity)];
    nodes.extend(PLANETS.iter().map(|planet| {
        let material = match planet.texture {
            Some(texture) => Material::textured(texture),
            None => Material::Standard {
                color: Color::rgb(0.6, 0.6, 0.6),
                map: None,
                bump_map: None,
                bump_scale: 0.0,
                displacement_map: None,
                displacement_scale: 0.0,
                emissive: Color::BLACK,
                emissive_intensity: 0.0,
            },
        };
        SceneNode::sphere(
            planet.name,
            NodeRole::Orbiting,
            planet.visual_radius as f32,
            SphereGeometry::new(32, 32),
            material,
        )
    }));

    let stars = StarfieldGenerator::new(
        settings.star_seed,
        settings.star_count,
        STAR_SHELL_INNER,
        STAR_SHELL_OUTER,
    )
    .generate();

    SceneDescription {
        kind: SceneKind::SolarSystem,
        nodes,
        lights: vec![
            Light::Point {
                position: Vec3::ZERO,
                color: Color::WHITE,
                intensity: 2.0,
                range: 0.0,
            },
            Light::Ambient {
                color: Color::WHITE,
                intensity: 0.08,
            },
        ],
        camera: Camera::perspective(Vec3::new(0.0, 120.0, 260.0), 60.0, 0.1, 10_000.0),
        camera_target: Vec3::ZERO,
        clear_color: Color::BLACK,
        stars,
    }
}
