//! Variable-timestep frame loop.
//!
//! One simulation update and one render per frame. Orbits are closed-form in
//! time, so there is no fixed-step accumulator: the frame delta goes straight
//! into the clock.

use tracing::warn;

use crate::clock::{FrameTime, SystemTimeSource, TimeSource};
use crate::context::SimulationContext;

/// Longest frame gap fed into the simulation. Longer gaps (debugger pauses,
/// window drags) are clamped and the simulation simply loses that time.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Frame loop state.
///
/// Call [`tick`](Self::tick) once per redraw.
pub struct OrbitLoop<T: TimeSource = SystemTimeSource> {
    time_source: T,
    previous_time: f64,
    frame_count: u64,
}

impl OrbitLoop<SystemTimeSource> {
    /// Creates a loop measuring wall-clock time from now.
    pub fn new() -> Self {
        Self::with_time_source(SystemTimeSource::new())
    }
}

impl Default for OrbitLoop<SystemTimeSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> OrbitLoop<T> {
    pub fn with_time_source(mut time_source: T) -> Self {
        let previous_time = time_source.now();
        Self {
            time_source,
            previous_time,
            frame_count: 0,
        }
    }

    /// Runs one frame: measures the frame gap, advances the simulation, then
    /// calls `update_fn(context, frame)` and `render_fn(context)` exactly once
    /// each, in that order.
    pub fn tick(
        &mut self,
        context: &mut SimulationContext,
        mut update_fn: impl FnMut(&SimulationContext, FrameTime),
        mut render_fn: impl FnMut(&SimulationContext),
    ) -> FrameTime {
        let current_time = self.time_source.now();
        let mut frame_time = current_time - self.previous_time;
        self.previous_time = current_time;

        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        let frame = context.advance(frame_time);
        update_fn(context, frame);
        render_fn(context);
        self.frame_count += 1;
        frame
    }

    /// Forget time spent while not ticking, e.g. while minimized.
    pub fn resync(&mut self) {
        self.previous_time = self.time_source.now();
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn time_source(&self) -> &T {
        &self.time_source
    }

    pub fn time_source_mut(&mut self) -> &mut T {
        &mut self.time_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTimeSource;
    use crate::context::SimulationParams;

    fn manual_loop() -> (OrbitLoop<ManualTimeSource>, SimulationContext) {
        let ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        (OrbitLoop::with_time_source(ManualTimeSource::new()), ctx)
    }

    #[test]
    fn test_update_then_render_once_per_tick() {
        let (mut frame_loop, mut ctx) = manual_loop();
        let mut calls = Vec::new();
        frame_loop.time_source_mut().advance_secs(0.016);
        {
            let calls = std::cell::RefCell::new(&mut calls);
            frame_loop.tick(
                &mut ctx,
                |_, _| calls.borrow_mut().push("update"),
                |_| calls.borrow_mut().push("render"),
            );
        }
        assert_eq!(calls, ["update", "render"]);
        assert_eq!(frame_loop.frame_count(), 1);
    }

    #[test]
    fn test_frame_delta_reaches_clock() {
        let (mut frame_loop, mut ctx) = manual_loop();
        frame_loop.time_source_mut().advance_secs(0.5 * MAX_FRAME_TIME);
        let frame = frame_loop.tick(&mut ctx, |_, _| {}, |_| {});
        assert!((frame.delta_seconds - 0.125).abs() < 1e-9);
        assert!((ctx.clock().elapsed_seconds() - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_max_frame_time_clamp() {
        let (mut frame_loop, mut ctx) = manual_loop();
        frame_loop.time_source_mut().advance_secs(3.0);
        let frame = frame_loop.tick(&mut ctx, |_, _| {}, |_| {});
        assert_eq!(frame.delta_seconds, MAX_FRAME_TIME);
        assert_eq!(ctx.clock().elapsed_seconds(), MAX_FRAME_TIME);
    }

    #[test]
    fn test_zero_frame_time() {
        let (mut frame_loop, mut ctx) = manual_loop();
        let mut seen = None;
        frame_loop.tick(&mut ctx, |_, frame| seen = Some(frame), |_| {});
        assert_eq!(seen, Some(FrameTime::default()));
        for body in ctx.bodies() {
            assert_eq!(body.angle(), body.initial_angle());
        }
    }

    #[test]
    fn test_total_time_is_monotonic() {
        let (mut frame_loop, mut ctx) = manual_loop();
        let mut last = 0.0;
        for step in [0.016, 0.0, 0.033, 1.0, 0.008] {
            frame_loop.time_source_mut().advance_secs(step);
            let frame = frame_loop.tick(&mut ctx, |_, _| {}, |_| {});
            assert!(frame.total_seconds >= last);
            last = frame.total_seconds;
        }
        assert_eq!(frame_loop.frame_count(), 5);
    }

    #[test]
    fn test_resync_drops_idle_time() {
        let (mut frame_loop, mut ctx) = manual_loop();
        frame_loop.time_source_mut().advance_secs(10.0);
        frame_loop.resync();
        frame_loop.time_source_mut().advance_secs(0.02);
        let frame = frame_loop.tick(&mut ctx, |_, _| {}, |_| {});
        assert!((frame.delta_seconds - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_render_sees_updated_positions() {
        let (mut frame_loop, mut ctx) = manual_loop();
        frame_loop.time_source_mut().advance_secs(0.1);
        let mut rendered_time = 0.0;
        frame_loop.tick(
            &mut ctx,
            |_, _| {},
            |ctx| rendered_time = ctx.snapshot().total_seconds,
        );
        assert!((rendered_time - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_default_loop_starts_empty() {
        let frame_loop: OrbitLoop = OrbitLoop::default();
        assert_eq!(frame_loop.frame_count(), 0);
    }
}
