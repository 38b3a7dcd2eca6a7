use std::time::Instant;

/// Source of per-tick time deltas.
///
/// The first read starts the clock and returns `0.0`; every later read
/// returns the seconds elapsed since the previous one.
pub trait Clock {
    fn delta(&mut self) -> f32;
}

/// Wall-clock time via [`Instant`].
#[derive(Debug, Default)]
pub struct SystemClock {
    last: Option<Instant>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let delta = self
            .last
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        delta
    }
}

/// Constant step after the first read, for fixed-timestep and headless runs.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f32,
    started: bool,
}

impl FixedStepClock {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            started: false,
        }
    }

    /// Step matching the given frame rate.
    pub fn from_fps(fps: f32) -> Self {
        Self::new(1.0 / fps)
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

impl Clock for FixedStepClock {
    fn delta(&mut self) -> f32 {
        if !self.started {
            self.started = true;
            return 0.0;
        }
        self.step
    }
}

/// Clock that only moves when told to.
///
/// Time advanced before the first read is discarded, like any clock that
/// has not started yet.
#[derive(Debug, Default)]
pub struct ManualClock {
    pending: f32,
    started: bool,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, seconds: f32) {
        self.pending += seconds;
    }
}

impl Clock for ManualClock {
    fn delta(&mut self) -> f32 {
        let pending = std::mem::take(&mut self.pending);
        if !self.started {
            self.started = true;
            return 0.0;
        }
        pending
    }
}
