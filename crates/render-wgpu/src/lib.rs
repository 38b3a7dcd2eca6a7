//! wgpu render surface for cubestage.
//!
//! Draws every visible mesh as an instanced box shaded with a Lambert term
//! from one ambient and one directional light, over a clear color that may
//! be transparent.
//!
//! # Invariants
//! - The surface never mutates the scene.
//! - The swapchain is sized to the logical size times the pixel ratio.
//! - After `detach` the wgpu surface is dropped and no frame is presented.

mod pipeline;
mod shaders;
mod surface;

pub use surface::WgpuSurface;
