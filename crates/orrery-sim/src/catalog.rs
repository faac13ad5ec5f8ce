//! Baked planetary constants.
//!
//! Initial angles are mean heliocentric ecliptic longitudes for
//! 2025-01-01 00:00 UTC, in radians.

use crate::body::BodySpec;

/// Glow shell radius as a multiple of the sun's visual radius.
pub const SUN_GLOW_SCALE: f64 = 1.2;

/// Sun visual radius in the full solar system scene.
pub const SUN_RADIUS: f64 = 8.0;

/// Sun visual radius in the single-sphere scenes.
pub const SUN_RADIUS_STANDALONE: f64 = 1.0;

pub const SUN_TEXTURE: &str = "sun.jpg";

pub const PLANETS: [BodySpec; 8] = [
    BodySpec {
        name: "Mercury",
        semi_major_axis_au: 0.387,
        visual_radius: 0.40,
        initial_angle: 3.1661,
        texture: Some("mercury.jpg"),
    },
    BodySpec {
        name: "Venus",
        semi_major_axis_au: 0.723,
        visual_radius: 0.95,
        initial_angle: 0.9047,
        texture: Some("venus.jpg"),
    },
    BodySpec {
        name: "Earth",
        semi_major_axis_au: 1.000,
        visual_radius: 1.00,
        initial_angle: 1.7550,
        texture: Some("earth.jpg"),
    },
    BodySpec {
        name: "Mars",
        semi_major_axis_au: 1.524,
        visual_radius: 0.53,
        initial_angle: 1.7577,
        texture: Some("mars.jpg"),
    },
    BodySpec {
        name: "Jupiter",
        semi_major_axis_au: 5.203,
        visual_radius: 3.20,
        initial_angle: 1.2760,
        texture: Some("jupiter.jpg"),
    },
    BodySpec {
        name: "Saturn",
        semi_major_axis_au: 9.537,
        visual_radius: 2.70,
        initial_angle: 6.2045,
        texture: Some("saturn.jpg"),
    },
    BodySpec {
        name: "Uranus",
        semi_major_axis_au: 19.191,
        visual_radius: 1.80,
        initial_angle: 1.0529,
        texture: Some("uranus.jpg"),
    },
    BodySpec {
        name: "Neptune",
        semi_major_axis_au: 30.069,
        visual_radius: 1.75,
        initial_angle: 6.2744,
        texture: Some("neptune.jpg"),
    },
];

/// Look up a planet by name, ignoring ASCII case.
pub fn planet_spec(name: &str) -> Option<&'static BodySpec> {
    PLANETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::OrbitingBody;

    #[test]
    fn test_catalog_is_ordered_by_distance() {
        for pair in PLANETS.windows(2) {
            assert!(pair[0].semi_major_axis_au < pair[1].semi_major_axis_au);
        }
    }

    #[test]
    fn test_every_planet_builds() {
        for spec in &PLANETS {
            let body = OrbitingBody::new(spec, 50.0).unwrap();
            assert!(body.orbital_period_years() > 0.0);
            assert!(spec.initial_angle >= 0.0 && spec.initial_angle < std::f64::consts::TAU);
            assert!(spec.texture.is_some());
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(planet_spec("earth").map(|p| p.name), Some("Earth"));
        assert_eq!(planet_spec("SATURN").map(|p| p.name), Some("Saturn"));
        assert!(planet_spec("Pluto").is_none());
    }

    #[test]
    fn test_planets_fit_outside_the_sun() {
        let scale = 50.0;
        let mercury = OrbitingBody::new(&PLANETS[0], scale).unwrap();
        assert!(mercury.scaled_distance() - mercury.visual_radius() > SUN_RADIUS * SUN_GLOW_SCALE);
    }
}
