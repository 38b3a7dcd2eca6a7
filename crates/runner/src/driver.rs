use crate::clock::Clock;
use crate::error::RunnerError;
use crate::runner::{SceneRunner, TickOutcome};
use cubestage_render::RenderSurface;
use std::cell::Cell;
use std::rc::Rc;

/// Schedules ticks on behalf of a runner.
///
/// `start` is called when the runner goes active, `request_frame` once per
/// active tick and `stop` on teardown. A request already handed to the host
/// is not withdrawn by `stop`; the runner's own active check covers it.
pub trait FrameDriver {
    fn start(&mut self);
    fn request_frame(&mut self);
    fn stop(&mut self);
}

/// Host-side view of a [`HeadlessDriver`]: whether a frame is pending.
#[derive(Debug, Clone, Default)]
pub struct FrameSignal {
    pending: Rc<Cell<bool>>,
    requests: Rc<Cell<u64>>,
    stopped: Rc<Cell<bool>>,
}

impl FrameSignal {
    /// Consume the pending frame, if any.
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Frames requested since the driver started.
    pub fn requests(&self) -> u64 {
        self.requests.get()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

/// Driver without a display: frame requests flip a shared flag that the
/// host loop polls. Paired with a [`FixedStepClock`](crate::FixedStepClock)
/// it gives a fixed-timestep loop.
#[derive(Debug)]
pub struct HeadlessDriver {
    signal: FrameSignal,
}

impl HeadlessDriver {
    pub fn new() -> (Self, FrameSignal) {
        let signal = FrameSignal::default();
        (
            Self {
                signal: signal.clone(),
            },
            signal,
        )
    }
}

impl FrameDriver for HeadlessDriver {
    fn start(&mut self) {
        self.signal.stopped.set(false);
        self.signal.pending.set(true);
    }

    fn request_frame(&mut self) {
        self.signal.pending.set(true);
        self.signal.requests.set(self.signal.requests.get() + 1);
    }

    fn stop(&mut self) {
        self.signal.stopped.set(true);
    }
}

/// Tick `runner` for as long as frames are pending, up to `max_frames`.
/// Returns the number of frames rendered.
pub fn run_frames<S: RenderSurface, C: Clock>(
    runner: &mut SceneRunner<S, C>,
    signal: &FrameSignal,
    max_frames: u64,
) -> Result<u64, RunnerError> {
    let mut rendered = 0;
    while rendered < max_frames && signal.take() {
        match runner.tick()? {
            TickOutcome::Rendered { .. } => rendered += 1,
            TickOutcome::Skipped => break,
        }
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_marks_a_frame_pending() {
        let (mut driver, signal) = HeadlessDriver::new();
        assert!(!signal.is_pending());
        driver.start();
        assert!(signal.take());
        assert!(!signal.take());
    }

    #[test]
    fn requests_are_counted() {
        let (mut driver, signal) = HeadlessDriver::new();
        driver.start();
        driver.request_frame();
        driver.request_frame();
        assert_eq!(signal.requests(), 2);
        assert!(signal.is_pending());
    }

    #[test]
    fn stop_leaves_pending_request_in_place() {
        let (mut driver, signal) = HeadlessDriver::new();
        driver.start();
        driver.stop();
        assert!(signal.is_stopped());
        assert!(signal.is_pending());
    }
}
