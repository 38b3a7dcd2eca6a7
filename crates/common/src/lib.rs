//! Shared value types used across the cubestage crates.

mod types;

pub use types::{ObjectId, Rgba, SurfaceSize, Transform};
