//! Viewport size tracking.
//!
//! # Invariants
//! - Subscribers only hear about sizes that differ from the previous one.
//! - Subscribers are notified in subscription order.

pub mod tracker;

pub use tracker::{SizeTracker, Subscription, ViewportTracker};
