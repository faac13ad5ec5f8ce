//! Bodies on circular heliocentric orbits.
//!
//! Orbits are perfect circles in the ecliptic plane at constant angular
//! velocity. Kepler's third law is used only to derive the period from the
//! semi-major axis; eccentricity, inclination and axial tilt are ignored.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::error::SimError;

/// Static description of a body, as it appears in the catalog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySpec {
    /// Display name, also used as the scene node name.
    pub name: &'static str,
    /// Real orbital radius in astronomical units.
    pub semi_major_axis_au: f64,
    /// Rendering radius in scene units. Not to scale with the orbit.
    pub visual_radius: f64,
    /// Orbital angle in radians at simulation time zero.
    pub initial_angle: f64,
    /// Surface map file name, relative to the asset directory.
    pub texture: Option<&'static str>,
}

/// Orbital period in years for a circular orbit of radius `semi_major_axis_au`.
///
/// `T² = a³`, with `T` in years and `a` in AU.
pub fn orbital_period_years(semi_major_axis_au: f64) -> f64 {
    semi_major_axis_au.powf(1.5)
}

/// A planet on a circular orbit around the central body.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitingBody {
    name: String,
    semi_major_axis_au: f64,
    visual_radius: f64,
    initial_angle: f64,
    scaled_distance: f64,
    orbital_period_years: f64,
    texture: Option<String>,
    angle: f64,
    position: DVec2,
    spin_angle: f64,
}

impl OrbitingBody {
    /// Build a body from its catalog entry, precomputing scaled distance and period.
    ///
    /// # Errors
    ///
    /// Returns [`SimError`] if the axis, radius or scale is not strictly positive
    /// and finite, or if the initial angle is not finite.
    pub fn new(spec: &BodySpec, distance_scale: f64) -> Result<Self, SimError> {
        if !(distance_scale.is_finite() && distance_scale > 0.0) {
            return Err(SimError::InvalidDistanceScale(distance_scale));
        }
        if !(spec.semi_major_axis_au.is_finite() && spec.semi_major_axis_au > 0.0) {
            return Err(SimError::InvalidSemiMajorAxis {
                name: spec.name.to_string(),
                value: spec.semi_major_axis_au,
            });
        }
        if !(spec.visual_radius.is_finite() && spec.visual_radius > 0.0) {
            return Err(SimError::InvalidVisualRadius {
                name: spec.name.to_string(),
                value: spec.visual_radius,
            });
        }
        if !spec.initial_angle.is_finite() {
            return Err(SimError::InvalidInitialAngle {
                name: spec.name.to_string(),
            });
        }

        let scaled_distance = spec.semi_major_axis_au * distance_scale;
        let mut body = Self {
            name: spec.name.to_string(),
            semi_major_axis_au: spec.semi_major_axis_au,
            visual_radius: spec.visual_radius,
            initial_angle: spec.initial_angle,
            scaled_distance,
            orbital_period_years: orbital_period_years(spec.semi_major_axis_au),
            texture: spec.texture.map(str::to_string),
            angle: spec.initial_angle,
            position: DVec2::ZERO,
            spin_angle: 0.0,
        };
        body.set_angle(spec.initial_angle);
        Ok(body)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn semi_major_axis_au(&self) -> f64 {
        self.semi_major_axis_au
    }

    pub fn visual_radius(&self) -> f64 {
        self.visual_radius
    }

    pub fn initial_angle(&self) -> f64 {
        self.initial_angle
    }

    pub fn scaled_distance(&self) -> f64 {
        self.scaled_distance
    }

    pub fn orbital_period_years(&self) -> f64 {
        self.orbital_period_years
    }

    pub fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    /// Orbital angle as of the last update, in radians. Not wrapped.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Position in the orbital plane as of the last update: `x` maps to world X,
    /// `y` maps to world Z.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Self-rotation angle in `[0, 2π)`.
    pub fn spin_angle(&self) -> f64 {
        self.spin_angle
    }

    /// Angular velocity in radians per real second: `(2π / T) × speedup`.
    pub fn angular_velocity(&self, speedup_factor: f64) -> f64 {
        TAU / self.orbital_period_years * speedup_factor
    }

    /// Closed-form orbital angle: `θ = θ₀ + ω × t`.
    pub fn angle_at(&self, total_seconds: f64, speedup_factor: f64) -> f64 {
        self.initial_angle + self.angular_velocity(speedup_factor) * total_seconds
    }

    /// Point on this body's orbit circle at `angle`.
    pub fn position_for_angle(&self, angle: f64) -> DVec2 {
        let (sin, cos) = angle.sin_cos();
        DVec2::new(self.scaled_distance * cos, self.scaled_distance * sin)
    }

    /// Closed-form position at `total_seconds`.
    pub fn position_at(&self, total_seconds: f64, speedup_factor: f64) -> DVec2 {
        self.position_for_angle(self.angle_at(total_seconds, speedup_factor))
    }

    pub(crate) fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
        self.position = self.position_for_angle(angle);
    }

    pub(crate) fn spin_by(&mut self, delta_angle: f64) {
        self.spin_angle = (self.spin_angle + delta_angle).rem_euclid(TAU);
    }
}

/// The body at the center of the system. It does not orbit; it only spins.
///
/// The optional glow shell has no angle of its own: it reports the sun's spin
/// angle, so the two can never drift apart.
#[derive(Clone, Debug, PartialEq)]
pub struct CentralBody {
    name: String,
    visual_radius: f64,
    glow_radius: Option<f64>,
    spin_angle: f64,
}

impl CentralBody {
    pub fn new(name: impl Into<String>, visual_radius: f64, glow_radius: Option<f64>) -> Self {
        Self {
            name: name.into(),
            visual_radius,
            glow_radius,
            spin_angle: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visual_radius(&self) -> f64 {
        self.visual_radius
    }

    pub fn glow_radius(&self) -> Option<f64> {
        self.glow_radius
    }

    /// Self-rotation angle in `[0, 2π)`.
    pub fn spin_angle(&self) -> f64 {
        self.spin_angle
    }

    /// Spin angle of the glow shell, if there is one. Always equal to the sun's.
    pub fn glow_spin_angle(&self) -> Option<f64> {
        self.glow_radius.map(|_| self.spin_angle)
    }

    pub(crate) fn spin_by(&mut self, delta_angle: f64) {
        self.spin_angle = (self.spin_angle + delta_angle).rem_euclid(TAU);
    }
}
