use glam::Vec3;

use crate::material::Color;

/// Scene light sources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient { color: Color, intensity: f32 },
    /// Omnidirectional light at a point. `range` of zero means no falloff.
    Point {
        position: Vec3,
        color: Color,
        intensity: f32,
        range: f32,
    },
}

impl Light {
    /// Combined ambient contribution of a set of lights.
    pub fn total_ambient(lights: &[Light]) -> Color {
        lights.iter().fold(Color::BLACK, |acc, light| match light {
            Light::Ambient { color, intensity } => {
                let c = color.scaled(*intensity);
                Color::rgb(acc.r + c.r, acc.g + c.g, acc.b + c.b)
            }
            Light::Point { .. } => acc,
        })
    }

    /// The first point light, if any.
    pub fn first_point(lights: &[Light]) -> Option<&Light> {
        lights.iter().find(|l| matches!(l, Light::Point { .. }))
    }
}
