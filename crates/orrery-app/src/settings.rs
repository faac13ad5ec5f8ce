//! Translation from the persisted config into the types each crate takes.

use orrery_config::{CameraConfig, IntegrationMode, SceneConfig, SceneSelection, SimulationConfig};
use orrery_input::OrbitControlsSettings;
use orrery_scene::{MAX_CAMERA_DISTANCE, SceneKind, SceneSettings};
use orrery_sim::{OrbitIntegration, SimError, SimulationContext, SimulationParams};

pub fn simulation_params(config: &SimulationConfig) -> SimulationParams {
    SimulationParams {
        distance_scale: config.distance_scale,
        speedup_factor: config.speedup_factor,
        planet_spin_rate: config.planet_spin_rate,
        sun_spin_rate: config.sun_spin_rate,
        integration: match config.integration {
            IntegrationMode::Sampled => OrbitIntegration::Sampled,
            IntegrationMode::Incremental => OrbitIntegration::Incremental,
        },
    }
}

pub fn scene_kind(selection: SceneSelection) -> SceneKind {
    match selection {
        SceneSelection::FlatSphere => SceneKind::FlatSphere,
        SceneSelection::GlowingSun => SceneKind::GlowingSun,
        SceneSelection::SolarSystem => SceneKind::SolarSystem,
    }
}

pub fn scene_settings(config: &SceneConfig, aspect_ratio: f32) -> SceneSettings {
    SceneSettings {
        star_count: config.star_count,
        star_seed: config.star_seed,
        glow_opacity: config.glow_opacity,
        aspect_ratio,
    }
}

/// Orbit controls from the camera config. Zoom-out stops short of the
/// starfield whatever `max_distance` says.
pub fn controls_settings(config: &CameraConfig) -> OrbitControlsSettings {
    let max_distance = config
        .max_distance
        .min(MAX_CAMERA_DISTANCE)
        .max(config.min_distance);
    OrbitControlsSettings {
        rotate_speed: config.rotate_speed,
        zoom_speed: config.zoom_speed,
        pan_speed: config.pan_speed,
        min_distance: config.min_distance,
        max_distance,
        damping: config.damping,
        invert_y: config.invert_y,
        ..OrbitControlsSettings::default()
    }
}

/// The simulation that drives `kind`.
///
/// # Errors
///
/// Fails when the configured rates are not finite or the solar system's bodies
/// reject the configured distance scale.
pub fn simulation_context(
    kind: SceneKind,
    params: SimulationParams,
) -> Result<SimulationContext, SimError> {
    match kind {
        SceneKind::SolarSystem => SimulationContext::solar_system(params),
        SceneKind::GlowingSun => SimulationContext::standalone_sun(params, true),
        SceneKind::FlatSphere => SimulationContext::standalone_sun(params, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_config::Config;
    use orrery_scene::STAR_SHELL_INNER;

    #[test]
    fn test_default_config_matches_simulation_defaults() {
        let config = Config::default();
        assert_eq!(
            simulation_params(&config.simulation),
            SimulationParams::default()
        );
    }

    #[test]
    fn test_default_config_matches_scene_defaults() {
        let config = Config::default();
        let settings = scene_settings(&config.scene, 16.0 / 9.0);
        assert_eq!(settings, SceneSettings::default());
        assert_eq!(scene_kind(config.scene.kind), SceneKind::default());
    }

    #[test]
    fn test_incremental_mode_maps() {
        let config = SimulationConfig {
            integration: IntegrationMode::Incremental,
            speedup_factor: 3.0,
            ..SimulationConfig::default()
        };
        let params = simulation_params(&config);
        assert_eq!(params.integration, OrbitIntegration::Incremental);
        assert_eq!(params.speedup_factor, 3.0);
    }

    #[test]
    fn test_camera_settings_keep_pitch_limit() {
        let config = CameraConfig {
            min_distance: 10.0,
            invert_y: true,
            ..CameraConfig::default()
        };
        let settings = controls_settings(&config);
        assert_eq!(settings.min_distance, 10.0);
        assert!(settings.invert_y);
        assert_eq!(
            settings.pitch_limit,
            OrbitControlsSettings::default().pitch_limit
        );
    }

    #[test]
    fn test_zoom_stays_inside_starfield() {
        let defaults = controls_settings(&CameraConfig::default());
        assert!(defaults.max_distance < STAR_SHELL_INNER);

        let far = CameraConfig {
            max_distance: 5000.0,
            ..CameraConfig::default()
        };
        assert_eq!(controls_settings(&far).max_distance, MAX_CAMERA_DISTANCE);

        let near = CameraConfig {
            max_distance: 400.0,
            ..CameraConfig::default()
        };
        assert_eq!(controls_settings(&near).max_distance, 400.0);
    }

    #[test]
    fn test_min_distance_never_exceeds_max() {
        let config = CameraConfig {
            min_distance: 3000.0,
            max_distance: 5000.0,
            ..CameraConfig::default()
        };
        let settings = controls_settings(&config);
        assert!(settings.min_distance <= settings.max_distance);
    }

    #[test]
    fn test_simulation_per_scene() {
        let params = SimulationParams::default();
        let solar = simulation_context(SceneKind::SolarSystem, params.clone()).unwrap();
        assert_eq!(solar.bodies().len(), 8);
        assert!(solar.central().glow_radius().is_some());

        let glowing = simulation_context(SceneKind::GlowingSun, params.clone()).unwrap();
        assert!(glowing.bodies().is_empty());
        assert!(glowing.central().glow_radius().is_some());

        let flat = simulation_context(SceneKind::FlatSphere, params).unwrap();
        assert!(flat.central().glow_radius().is_none());
    }

    #[test]
    fn test_bad_distance_scale_rejected() {
        let params = SimulationParams {
            distance_scale: 0.0,
            ..SimulationParams::default()
        };
        assert!(simulation_context(SceneKind::SolarSystem, params.clone()).is_err());
        assert!(simulation_context(SceneKind::FlatSphere, params).is_ok());
    }
}
