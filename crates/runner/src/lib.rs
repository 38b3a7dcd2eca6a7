//! Scene Runner: owns a render surface, camera, lights, clock and scene
//! objects, and advances them once per display refresh.
//!
//! # Invariants
//! - Lifecycle is `Uninitialized -> Active -> Inactive`; nothing leaves `Inactive`.
//! - `tick` checks the active flag first: an inactive runner never updates,
//!   renders or asks for another frame.
//! - `age` is the sum of every tick's delta and stops moving once inactive.
//! - After a tick the scene holds only active objects, in insertion order.
//! - Objects are updated before inactive ones are filtered out.

pub mod clock;
pub mod config;
pub mod driver;
mod error;
pub mod relay;
pub mod runner;

pub use clock::{Clock, FixedStepClock, ManualClock, SystemClock};
pub use config::{CameraConfig, ConfigError, LightConfig, SceneConfig, SurfaceConfig};
pub use driver::{FrameDriver, FrameSignal, HeadlessDriver, run_frames};
pub use error::RunnerError;
pub use relay::ResizeRelay;
pub use runner::{RunnerPhase, RunnerState, SceneRunner, TickOutcome, camera_sway};

pub fn crate_info() -> &'static str {
    "cubestage-runner v0.1.0"
}
