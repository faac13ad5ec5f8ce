//! Periodic frame-rate summaries for the log.

/// Seconds between summaries.
pub const REPORT_INTERVAL: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frames: u32,
    pub fps: f64,
    pub average_frame_ms: f64,
}

/// Accumulates frame deltas and yields a report once per interval.
#[derive(Debug, Clone)]
pub struct FrameStats {
    interval: f64,
    frames: u32,
    elapsed: f64,
}

impl FrameStats {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            frames: 0,
            elapsed: 0.0,
        }
    }

    pub fn record(&mut self, delta_seconds: f64) -> Option<FrameReport> {
        self.frames += 1;
        self.elapsed += delta_seconds.max(0.0);
        if self.elapsed < self.interval {
            return None;
        }

        let report = FrameReport {
            frames: self.frames,
            fps: self.frames as f64 / self.elapsed,
            average_frame_ms: self.elapsed * 1000.0 / self.frames as f64,
        };
        self.frames = 0;
        self.elapsed = 0.0;
        Some(report)
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(REPORT_INTERVAL)
    }
}
