//! Simulation time and the sources it is measured from.

use std::time::{Duration, Instant};

/// Timing of one frame, handed to the per-frame update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Real seconds since the previous frame. Never negative.
    pub delta_seconds: f64,
    /// Real seconds since simulation start. Never decreases.
    pub total_seconds: f64,
}

/// Shared simulation clock.
///
/// `elapsed_seconds` only moves forward. The speedup factor maps one real
/// second to that many simulated years.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationClock {
    elapsed_seconds: f64,
    speedup_factor: f64,
}

impl SimulationClock {
    pub fn new(speedup_factor: f64) -> Self {
        Self {
            elapsed_seconds: 0.0,
            speedup_factor,
        }
    }

    /// Advance by `delta_seconds` and return the resulting frame timing.
    ///
    /// Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, delta_seconds: f64) -> FrameTime {
        let delta_seconds = if delta_seconds.is_finite() && delta_seconds > 0.0 {
            delta_seconds
        } else {
            0.0
        };
        self.elapsed_seconds += delta_seconds;
        FrameTime {
            delta_seconds,
            total_seconds: self.elapsed_seconds,
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn speedup_factor(&self) -> f64 {
        self.speedup_factor
    }

    pub fn set_speedup_factor(&mut self, speedup_factor: f64) {
        self.speedup_factor = speedup_factor;
    }

    /// Current timing without advancing.
    pub fn frame_time(&self) -> FrameTime {
        FrameTime {
            delta_seconds: 0.0,
            total_seconds: self.elapsed_seconds,
        }
    }
}

/// Monotonic time, in seconds since an arbitrary origin.
pub trait TimeSource {
    fn now(&mut self) -> f64;
}

/// Wall-clock time from [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Time that only moves when told to. Used by tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Duration,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, step: Duration) {
        self.now += step;
    }

    pub fn advance_secs(&mut self, seconds: f64) {
        self.advance(Duration::from_secs_f64(seconds.max(0.0)));
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&mut self) -> f64 {
        self.now.as_secs_f64()
    }
}
