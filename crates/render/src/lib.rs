//! Rendering Adapter: renderer-agnostic surface interface.
//!
//! # Invariants
//! - A surface never mutates the scene it draws.
//! - `size()` reports the logical output size last set, independent of pixel ratio.
//! - A detached surface refuses to render.
//!
//! The headless [`TextSurface`] draws frames as text; GPU backends live in
//! their own crates and implement the same trait.

mod error;
mod surface;
mod text;

pub use error::RenderError;
pub use surface::{Container, FixedContainer, RenderSurface, SurfaceSettings};
pub use text::TextSurface;

pub fn crate_info() -> &'static str {
    "cubestage-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
