//! Deterministic background stars scattered through a spherical shell.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A single background star.
#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    /// World-space position.
    pub position: Vec3,
    /// Brightness in [0.0, 1.0].
    pub brightness: f32,
    /// Blackbody colour for the star's temperature.
    pub color: [f32; 3],
}

/// Generates a deterministic star set from a seed.
pub struct StarfieldGenerator {
    seed: u64,
    star_count: u32,
    inner_radius: f32,
    outer_radius: f32,
}

impl StarfieldGenerator {
    /// Stars are placed between `inner_radius` and `outer_radius` from the origin.
    pub fn new(seed: u64, star_count: u32, inner_radius: f32, outer_radius: f32) -> Self {
        let (inner_radius, outer_radius) = if inner_radius <= outer_radius {
            (inner_radius, outer_radius)
        } else {
            (outer_radius, inner_radius)
        };
        Self {
            seed,
            star_count,
            inner_radius,
            outer_radius,
        }
    }

    /// Generate the stars. Deterministic for a given seed and parameters.
    pub fn generate(&self) -> Vec<Star> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut stars = Vec::with_capacity(self.star_count as usize);

        for _ in 0..self.star_count {
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
            let direction =
                Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());

            // Uniform in volume: radius ~ cbrt(u) between the shell bounds.
            let inner3 = self.inner_radius.powi(3);
            let outer3 = self.outer_radius.powi(3);
            let radius = (inner3 + rng.random::<f32>() * (outer3 - inner3)).cbrt();

            // Many dim stars, few bright ones.
            let brightness = rng.random::<f32>().powf(3.0).clamp(0.0, 1.0);
            let temperature = 3000.0 + rng.random::<f32>() * 9000.0;

            stars.push(Star {
                position: direction * radius,
                brightness: 0.2 + 0.8 * brightness,
                color: blackbody_to_rgb(temperature),
            });
        }

        stars
    }
}

/// Convert a blackbody temperature in Kelvin to an approximate sRGB colour.
pub fn blackbody_to_rgb(temperature_k: f32) -> [f32; 3] {
    let t = temperature_k / 100.0;
    let r = if t <= 66.0 {
        1.0
    } else {
        (329.698_73 * (t - 60.0).powf(-0.133_204_76) / 255.0).clamp(0.0, 1.0)
    };
    let g = if t <= 66.0 {
        (99.470_8 * t.ln() - 161.119_57).clamp(0.0, 255.0) / 255.0
    } else {
        (288.122_17 * (t - 60.0).powf(-0.075_514_85) / 255.0).clamp(0.0, 1.0)
    };
    let b = if t >= 66.0 {
        1.0
    } else if t <= 19.0 {
        0.0
    } else {
        (138.517_73 * (t - 10.0).ln() - 305.044_8).clamp(0.0, 255.0) / 255.0
    };
    [r, g, b]
}
