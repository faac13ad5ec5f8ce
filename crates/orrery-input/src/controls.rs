//! Orbit, zoom and pan camera controls.
//!
//! The camera sits on a sphere around a target point. Left-drag moves it
//! around the sphere, the scroll wheel changes the sphere's radius, and
//! right- or middle-drag slides the target in the camera's view plane.

use glam::{Vec2, Vec3};
use orrery_scene::Camera;
use tracing::debug;
use winit::event::MouseButton;

use crate::mouse::MouseState;

/// Tuning for [`OrbitControls`].
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitControlsSettings {
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// Fraction of the distance removed per wheel line.
    pub zoom_speed: f32,
    /// Pan multiplier. One pixel moves the target by `distance × 0.001 × pan_speed`.
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Damping factor in `[0, 1)`. Zero applies input immediately.
    pub damping: f32,
    pub invert_y: bool,
    /// Pitch stays within `±pitch_limit`, short of the poles.
    pub pitch_limit: f32,
}

impl Default for OrbitControlsSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 1.0,
            min_distance: 2.0,
            max_distance: 2500.0,
            damping: 0.0,
            invert_y: false,
            pitch_limit: 89f32.to_radians(),
        }
    }
}

const PAN_SCALE: f32 = 0.001;

/// Camera rig orbiting a target point.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    /// Point the camera looks at.
    pub target: Vec3,
    /// Azimuth in radians. Zero puts the camera on the target's +Z side.
    pub yaw: f32,
    /// Elevation above the XZ plane in radians.
    pub pitch: f32,
    pub distance: f32,
    settings: OrbitControlsSettings,
    pending_rotation: Vec2,
    pending_pan: Vec3,
}

impl OrbitControls {
    pub fn new(
        target: Vec3,
        yaw: f32,
        pitch: f32,
        distance: f32,
        settings: OrbitControlsSettings,
    ) -> Self {
        let mut controls = Self {
            target,
            yaw,
            pitch,
            distance,
            settings,
            pending_rotation: Vec2::ZERO,
            pending_pan: Vec3::ZERO,
        };
        controls.clamp();
        controls
    }

    /// Derive orbit angles from where `camera` currently is relative to `target`.
    pub fn from_camera(camera: &Camera, target: Vec3, settings: OrbitControlsSettings) -> Self {
        let offset = camera.position - target;
        let distance = offset.length().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        debug!(distance, yaw, pitch, "Orbit controls attached to camera");
        Self::new(target, yaw, pitch, distance, settings)
    }

    pub fn settings(&self) -> &OrbitControlsSettings {
        &self.settings
    }

    /// Consume this frame's mouse input.
    pub fn update(&mut self, mouse: &MouseState) {
        let delta = mouse.delta();

        if mouse.is_button_pressed(MouseButton::Left) {
            let dy = if self.settings.invert_y { -delta.y } else { delta.y };
            self.pending_rotation += Vec2::new(-delta.x, dy) * self.settings.rotate_speed;
        }

        if mouse.is_button_pressed(MouseButton::Right)
            || mouse.is_button_pressed(MouseButton::Middle)
        {
            let (right, up) = self.view_plane_axes();
            let scale = self.distance * PAN_SCALE * self.settings.pan_speed;
            self.pending_pan += (-right * delta.x + up * delta.y) * scale;
        }

        let scroll = mouse.scroll();
        if scroll.abs() > 1e-6 {
            let factor = (1.0 - self.settings.zoom_speed).max(0.01).powf(scroll);
            self.distance *= factor;
        }

        self.step();
    }

    /// Apply pending motion. With damping, only part of it is applied per call
    /// and the rest carries into the next frame.
    fn step(&mut self) {
        let fraction = if self.settings.damping > 0.0 {
            self.settings.damping.clamp(0.0, 1.0)
        } else {
            1.0
        };

        let rotation = self.pending_rotation * fraction;
        self.yaw += rotation.x;
        self.pitch += rotation.y;
        self.pending_rotation -= rotation;

        let pan = self.pending_pan * fraction;
        self.target += pan;
        self.pending_pan -= pan;

        if self.pending_rotation.length_squared() < 1e-12 {
            self.pending_rotation = Vec2::ZERO;
        }
        if self.pending_pan.length_squared() < 1e-12 {
            self.pending_pan = Vec3::ZERO;
        }
        self.clamp();
    }

    fn clamp(&mut self) {
        let limit = self.settings.pitch_limit;
        self.pitch = self.pitch.clamp(-limit, limit);
        self.distance = self
            .distance
            .clamp(self.settings.min_distance, self.settings.max_distance);
    }

    fn view_plane_axes(&self) -> (Vec3, Vec3) {
        let forward = (-self.offset()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        (right, up)
    }

    /// Camera position relative to the target.
    pub fn offset(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(
            self.distance * cos_pitch * sin_yaw,
            self.distance * sin_pitch,
            self.distance * cos_pitch * cos_yaw,
        )
    }

    /// Whether damped motion is still settling.
    pub fn is_moving(&self) -> bool {
        self.pending_rotation != Vec2::ZERO || self.pending_pan != Vec3::ZERO
    }

    /// Write position and look-at rotation into `camera`.
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.target + self.offset();
        camera.look_at(self.target);
    }
}
