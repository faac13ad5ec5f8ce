//! The simulation state passed explicitly through the frame loop.

use glam::DVec2;
use tracing::debug;

use crate::body::{BodySpec, CentralBody, OrbitingBody};
use crate::catalog::{PLANETS, SUN_GLOW_SCALE, SUN_RADIUS, SUN_RADIUS_STANDALONE};
use crate::clock::{FrameTime, SimulationClock};
use crate::error::SimError;

/// How orbital angles are advanced each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrbitIntegration {
    /// Recompute `θ = θ₀ + ω·t` from total elapsed time. Positions depend only
    /// on the clock, so two runs reaching the same time agree exactly.
    #[default]
    Sampled,
    /// Accumulate `θ += ω·Δt`. Allows changing the speedup mid-run without a
    /// jump, at the cost of path dependence.
    Incremental,
}

/// Tunables fixed at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParams {
    /// Scene units per astronomical unit.
    pub distance_scale: f64,
    /// Simulated years per real second.
    pub speedup_factor: f64,
    /// Planet self-rotation, radians per real second.
    pub planet_spin_rate: f64,
    /// Sun and glow shell self-rotation, radians per real second.
    pub sun_spin_rate: f64,
    pub integration: OrbitIntegration,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            distance_scale: 50.0,
            speedup_factor: 0.1,
            planet_spin_rate: 0.5,
            sun_spin_rate: 0.1,
            integration: OrbitIntegration::Sampled,
        }
    }
}

impl SimulationParams {
    /// Check the rates that drive every frame. Body geometry is checked per
    /// body when the context is built.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidSpeedup`] or [`SimError::InvalidSpinRate`].
    pub fn validate(&self) -> Result<(), SimError> {
        validate_speedup(self.speedup_factor)?;
        if !self.planet_spin_rate.is_finite() {
            return Err(SimError::InvalidSpinRate {
                body: "planet",
                value: self.planet_spin_rate,
            });
        }
        if !self.sun_spin_rate.is_finite() {
            return Err(SimError::InvalidSpinRate {
                body: "sun",
                value: self.sun_spin_rate,
            });
        }
        Ok(())
    }
}

fn validate_speedup(speedup_factor: f64) -> Result<(), SimError> {
    if speedup_factor.is_finite() && speedup_factor >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidSpeedup(speedup_factor))
    }
}

/// Display state of one orbiting body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState<'a> {
    pub name: &'a str,
    pub position: DVec2,
    pub spin_angle: f64,
    pub visual_radius: f64,
}

/// Read-only view of the simulation after a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationSnapshot<'a> {
    pub total_seconds: f64,
    pub sun_spin_angle: f64,
    pub glow_spin_angle: Option<f64>,
    pub bodies: Vec<BodyState<'a>>,
}

/// Bodies, clock and parameters. Built once at startup; bodies are never
/// added or removed afterwards.
#[derive(Clone, Debug)]
pub struct SimulationContext {
    clock: SimulationClock,
    central: CentralBody,
    bodies: Vec<OrbitingBody>,
    params: SimulationParams,
}

impl SimulationContext {
    /// Build a context from a central body and a list of planet specs.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimError`] raised by `params` or a planet spec.
    pub fn new(
        params: SimulationParams,
        central: CentralBody,
        planets: &[BodySpec],
    ) -> Result<Self, SimError> {
        params.validate()?;
        let bodies = planets
            .iter()
            .map(|spec| OrbitingBody::new(spec, params.distance_scale))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            bodies = bodies.len(),
            distance_scale = params.distance_scale,
            speedup = params.speedup_factor,
            integration = ?params.integration,
            "Simulation context created"
        );
        Ok(Self {
            clock: SimulationClock::new(params.speedup_factor),
            central,
            bodies,
            params,
        })
    }

    /// The sun with a glow shell and the eight catalog planets.
    pub fn solar_system(params: SimulationParams) -> Result<Self, SimError> {
        let sun = CentralBody::new("Sun", SUN_RADIUS, Some(SUN_RADIUS * SUN_GLOW_SCALE));
        Self::new(params, sun, &PLANETS)
    }

    /// A lone unit-radius sun, optionally with a glow shell.
    pub fn standalone_sun(params: SimulationParams, glow: bool) -> Result<Self, SimError> {
        let glow_radius = glow.then_some(SUN_RADIUS_STANDALONE * SUN_GLOW_SCALE);
        let sun = CentralBody::new("Sun", SUN_RADIUS_STANDALONE, glow_radius);
        Self::new(params, sun, &[])
    }

    /// Advance the clock by `delta_seconds` and apply the frame.
    pub fn advance(&mut self, delta_seconds: f64) -> FrameTime {
        let frame = self.clock.advance(delta_seconds);
        self.tick(frame);
        frame
    }

    /// Per-frame update: orbital positions from `frame`, then self-rotation.
    pub fn tick(&mut self, frame: FrameTime) {
        let speedup = self.clock.speedup_factor();
        for body in &mut self.bodies {
            let angle = match self.params.integration {
                OrbitIntegration::Sampled => body.angle_at(frame.total_seconds, speedup),
                OrbitIntegration::Incremental => {
                    body.angle() + body.angular_velocity(speedup) * frame.delta_seconds
                }
            };
            body.set_angle(angle);
            body.spin_by(self.params.planet_spin_rate * frame.delta_seconds);
        }
        self.central
            .spin_by(self.params.sun_spin_rate * frame.delta_seconds);
    }

    pub fn snapshot(&self) -> SimulationSnapshot<'_> {
        SimulationSnapshot {
            total_seconds: self.clock.elapsed_seconds(),
            sun_spin_angle: self.central.spin_angle(),
            glow_spin_angle: self.central.glow_spin_angle(),
            bodies: self
                .bodies
                .iter()
                .map(|body| BodyState {
                    name: body.name(),
                    position: body.position(),
                    spin_angle: body.spin_angle(),
                    visual_radius: body.visual_radius(),
                })
                .collect(),
        }
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn central(&self) -> &CentralBody {
        &self.central
    }

    pub fn bodies(&self) -> &[OrbitingBody] {
        &self.bodies
    }

    pub fn body(&self, name: &str) -> Option<&OrbitingBody> {
        self.bodies.iter().find(|b| b.name() == name)
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Change the speedup factor mid-run. Under [`OrbitIntegration::Sampled`]
    /// this rescales all elapsed time, so bodies jump.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidSpeedup`]; the current factor is kept.
    pub fn set_speedup_factor(&mut self, speedup_factor: f64) -> Result<(), SimError> {
        validate_speedup(speedup_factor)?;
        self.params.speedup_factor = speedup_factor;
        self.clock.set_speedup_factor(speedup_factor);
        debug!(speedup = speedup_factor, "Speedup changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(integration: OrbitIntegration) -> SimulationParams {
        SimulationParams {
            integration,
            ..SimulationParams::default()
        }
    }

    #[test]
    fn test_initial_positions_use_initial_angles() {
        let ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        assert_eq!(ctx.bodies().len(), 8);
        for body in ctx.bodies() {
            assert_eq!(body.angle(), body.initial_angle());
        }
    }

    #[test]
    fn test_zero_delta_tick_keeps_initial_angles() {
        let mut ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        ctx.advance(0.0);
        for body in ctx.bodies() {
            assert_eq!(body.angle(), body.initial_angle());
        }
    }

    #[test]
    fn test_sampled_is_path_independent() {
        let mut a = SimulationContext::solar_system(params(OrbitIntegration::Sampled)).unwrap();
        let mut b = SimulationContext::solar_system(params(OrbitIntegration::Sampled)).unwrap();

        // Same total time reached through different frame sequences.
        for dt in [0.5, 0.25, 0.25] {
            a.advance(dt);
        }
        b.advance(1.0);

        for (x, y) in a.bodies().iter().zip(b.bodies()) {
            assert_eq!(x.position(), y.position(), "{} diverged", x.name());
        }
    }

    #[test]
    fn test_incremental_matches_sampled_under_uniform_frames() {
        let mut sampled =
            SimulationContext::solar_system(params(OrbitIntegration::Sampled)).unwrap();
        let mut incremental =
            SimulationContext::solar_system(params(OrbitIntegration::Incremental)).unwrap();

        for _ in 0..600 {
            sampled.advance(1.0 / 60.0);
            incremental.advance(1.0 / 60.0);
        }

        for (s, i) in sampled.bodies().iter().zip(incremental.bodies()) {
            let gap = (s.position() - i.position()).length();
            assert!(gap < 1e-6, "{}: gap {gap}", s.name());
        }
    }

    #[test]
    fn test_glow_synchronised_after_ticks() {
        let mut ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        for dt in [0.016, 0.033, 0.0, 0.2, 0.016] {
            ctx.advance(dt);
            let snap = ctx.snapshot();
            assert_eq!(snap.glow_spin_angle, Some(snap.sun_spin_angle));
        }
        assert!(ctx.central().spin_angle() > 0.0);
    }

    #[test]
    fn test_spin_proportional_to_delta() {
        let mut ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        ctx.advance(0.2);
        let spin = ctx.body("Earth").unwrap().spin_angle();
        assert!((spin - 0.5 * 0.2).abs() < 1e-12);
        assert!((ctx.central().spin_angle() - 0.1 * 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        ctx.advance(1.0);
        let snap = ctx.snapshot();
        assert_eq!(snap.total_seconds, 1.0);
        assert_eq!(snap.bodies.len(), 8);
        assert_eq!(snap.bodies[2].name, "Earth");
        let earth = ctx.body("Earth").unwrap();
        assert_eq!(snap.bodies[2].position, earth.position_at(1.0, 0.1));
    }

    #[test]
    fn test_inner_planets_move_faster() {
        let mut ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        ctx.advance(2.0);
        let swept: Vec<f64> = ctx
            .bodies()
            .iter()
            .map(|b| b.angle() - b.initial_angle())
            .collect();
        for pair in swept.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn test_standalone_sun_has_no_planets() {
        let mut ctx =
            SimulationContext::standalone_sun(SimulationParams::default(), true).unwrap();
        ctx.advance(1.0);
        let snap = ctx.snapshot();
        assert!(snap.bodies.is_empty());
        assert_eq!(ctx.central().glow_radius(), Some(1.2));
        assert_eq!(snap.glow_spin_angle, Some(snap.sun_spin_angle));

        let bare =
            SimulationContext::standalone_sun(SimulationParams::default(), false).unwrap();
        assert_eq!(bare.snapshot().glow_spin_angle, None);
    }

    #[test]
    fn test_invalid_distance_scale_rejected() {
        let bad = SimulationParams {
            distance_scale: 0.0,
            ..SimulationParams::default()
        };
        assert_eq!(
            SimulationContext::solar_system(bad).unwrap_err(),
            SimError::InvalidDistanceScale(0.0)
        );
    }

    #[test]
    fn test_non_finite_rates_rejected() {
        let cases = [
            (
                SimulationParams {
                    speedup_factor: f64::INFINITY,
                    ..SimulationParams::default()
                },
                SimError::InvalidSpeedup(f64::INFINITY),
            ),
            (
                SimulationParams {
                    speedup_factor: -0.1,
                    ..SimulationParams::default()
                },
                SimError::InvalidSpeedup(-0.1),
            ),
            (
                SimulationParams {
                    planet_spin_rate: f64::INFINITY,
                    ..SimulationParams::default()
                },
                SimError::InvalidSpinRate {
                    body: "planet",
                    value: f64::INFINITY,
                },
            ),
            (
                SimulationParams {
                    sun_spin_rate: f64::NEG_INFINITY,
                    ..SimulationParams::default()
                },
                SimError::InvalidSpinRate {
                    body: "sun",
                    value: f64::NEG_INFINITY,
                },
            ),
        ];
        for (params, expected) in cases {
            assert_eq!(
                SimulationContext::solar_system(params.clone()).unwrap_err(),
                expected
            );
            assert_eq!(
                SimulationContext::standalone_sun(params, true).unwrap_err(),
                expected
            );
        }
    }

    #[test]
    fn test_nan_speedup_rejected() {
        let bad = SimulationParams {
            speedup_factor: f64::NAN,
            ..SimulationParams::default()
        };
        assert!(matches!(
            SimulationContext::standalone_sun(bad.clone(), false),
            Err(SimError::InvalidSpeedup(v)) if v.is_nan()
        ));
        assert!(matches!(
            SimulationContext::solar_system(bad),
            Err(SimError::InvalidSpeedup(v)) if v.is_nan()
        ));
    }

    #[test]
    fn test_nan_spin_rate_rejected() {
        let bad = SimulationParams {
            sun_spin_rate: f64::NAN,
            ..SimulationParams::default()
        };
        assert!(matches!(
            SimulationContext::standalone_sun(bad, true),
            Err(SimError::InvalidSpinRate { body: "sun", .. })
        ));
    }

    #[test]
    fn test_zero_speedup_freezes_orbits() {
        let still = SimulationParams {
            speedup_factor: 0.0,
            ..SimulationParams::default()
        };
        let mut ctx = SimulationContext::solar_system(still).unwrap();
        ctx.advance(1.0);
        for body in ctx.bodies() {
            assert_eq!(body.angle(), body.initial_angle());
            assert!(body.spin_angle() > 0.0);
        }
    }

    #[test]
    fn test_speedup_change_jumps_under_sampled() {
        let mut ctx = SimulationContext::solar_system(params(OrbitIntegration::Sampled)).unwrap();
        ctx.advance(10.0);
        let before = ctx.body("Mercury").unwrap().angle();

        ctx.set_speedup_factor(0.2).unwrap();
        ctx.advance(0.0);
        let after = ctx.body("Mercury").unwrap().angle();

        // The whole 10 s of history is replayed at the new rate.
        let expected = before - ctx.body("Mercury").unwrap().initial_angle();
        assert!((after - before - expected).abs() < 1e-9);
    }

    #[test]
    fn test_speedup_change_is_continuous_under_incremental() {
        let mut ctx =
            SimulationContext::solar_system(params(OrbitIntegration::Incremental)).unwrap();
        ctx.advance(10.0);
        let before = ctx.body("Mercury").unwrap().angle();

        ctx.set_speedup_factor(0.2).unwrap();
        ctx.advance(0.0);
        assert_eq!(ctx.body("Mercury").unwrap().angle(), before);

        ctx.advance(0.5);
        let mercury = ctx.body("Mercury").unwrap();
        let step = mercury.angle() - before;
        assert!((step - mercury.angular_velocity(0.2) * 0.5).abs() < 1e-9);
        assert_eq!(ctx.params().speedup_factor, 0.2);
        assert_eq!(ctx.clock().speedup_factor(), 0.2);
    }

    #[test]
    fn test_invalid_speedup_change_keeps_current() {
        let mut ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        assert_eq!(
            ctx.set_speedup_factor(f64::INFINITY).unwrap_err(),
            SimError::InvalidSpeedup(f64::INFINITY)
        );
        assert_eq!(ctx.params().speedup_factor, 0.1);
        assert_eq!(ctx.clock().speedup_factor(), 0.1);
    }
}
