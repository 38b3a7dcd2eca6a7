use crate::error::RenderError;
use cubestage_common::{Rgba, SurfaceSize};
use cubestage_scene::{PerspectiveCamera, Scene};

/// The host element a render surface is mounted into.
pub trait Container {
    /// Current bounding box size, in logical pixels.
    fn bounding_size(&self) -> SurfaceSize;

    /// Physical pixels per logical pixel.
    fn pixel_ratio(&self) -> f32;
}

/// A container with a fixed size, for headless hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedContainer {
    pub size: SurfaceSize,
    pub pixel_ratio: f32,
}

impl FixedContainer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }
}

impl Container for FixedContainer {
    fn bounding_size(&self) -> SurfaceSize {
        self.size
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}

/// Output settings applied once when a surface is mounted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSettings {
    pub clear_color: Rgba,
    pub pixel_ratio: f32,
    pub shadows: bool,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            clear_color: Rgba::TRANSPARENT,
            pixel_ratio: 1.0,
            shadows: false,
        }
    }
}

/// A drawable output target attached to a container.
///
/// Mirrors the lifecycle of the runner that owns it: configure and size,
/// attach, render once per tick, detach.
pub trait RenderSurface {
    fn configure(&mut self, settings: &SurfaceSettings);

    /// Set the logical output size. The drawing buffer is `size * pixel_ratio`.
    fn set_size(&mut self, size: SurfaceSize);

    fn size(&self) -> SurfaceSize;

    /// Mount the surface into its container.
    fn attach(&mut self) -> Result<(), RenderError>;

    fn is_attached(&self) -> bool;

    /// Draw one frame of `scene` as seen from `camera`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError>;

    /// Unmount the surface. Further `render` calls fail with `Detached`.
    fn detach(&mut self);
}
