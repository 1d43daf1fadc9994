/// Monotonic simulation clock, advanced once per tick.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    total: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) {
        self.total += dt;
    }

    /// Seconds simulated so far.
    pub fn total(&self) -> f32 {
        self.total
    }
}

/// Accumulates frame time and fires once the configured interval is reached.
/// Drives raindrop spawning and lightning strikes independently of frame rate.
#[derive(Debug, Clone)]
pub struct IntervalGate {
    /// Seconds between firings.
    interval: f32,
    /// Time accumulated since the last firing.
    elapsed: f32,
}

impl IntervalGate {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Add frame time. Returns true (and resets) when the interval has been reached.
    /// At most one firing per call; leftover time is discarded.
    pub fn accumulate(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    /// Change the interval. Time already accumulated is kept.
    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval;
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Frame timing statistics for the debug overlay.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    pub total_frames: u32,
    pub frame_time_ms: f32,
    pub fps: f32,
    /// Exponential moving average of `fps`.
    pub smoothed_fps: f32,
}

impl FrameStats {
    const SMOOTHING: f32 = 0.95;

    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame of `dt` seconds. Non-positive frames only bump the counter.
    pub fn record(&mut self, dt: f32) {
        self.total_frames += 1;
        if dt <= 0.0 {
            return;
        }
        self.frame_time_ms = dt * 1000.0;
        self.fps = 1.0 / dt;
        if self.smoothed_fps == 0.0 {
            self.smoothed_fps = self.fps;
        } else {
            self.smoothed_fps =
                self.smoothed_fps * Self::SMOOTHING + self.fps * (1.0 - Self::SMOOTHING);
        }
    }
}
