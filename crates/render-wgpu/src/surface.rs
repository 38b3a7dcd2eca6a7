use crate::pipeline::BoxPipeline;
use cubestage_common::SurfaceSize;
use cubestage_render::{RenderError, RenderSurface, SurfaceSettings};
use cubestage_scene::{PerspectiveCamera, Scene};

/// Prefer a compositing mode that honours a transparent clear color.
fn pick_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    [
        wgpu::CompositeAlphaMode::PreMultiplied,
        wgpu::CompositeAlphaMode::PostMultiplied,
    ]
    .into_iter()
    .find(|m| modes.contains(m))
    .or_else(|| modes.first().copied())
    .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Swapchain extent. The window's physical size wins when the host reports
/// one; `logical × pixel_ratio` does not survive rounding at fractional scales.
fn buffer_extent(
    logical: SurfaceSize,
    pixel_ratio: f32,
    physical: Option<SurfaceSize>,
) -> SurfaceSize {
    let buffer = physical.unwrap_or_else(|| logical.scaled(pixel_ratio));
    SurfaceSize::new(buffer.width.max(1), buffer.height.max(1))
}

/// Render surface backed by a wgpu swapchain on a native window.
pub struct WgpuSurface {
    surface: Option<wgpu::Surface<'static>>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: BoxPipeline,
    settings: SurfaceSettings,
    size: SurfaceSize,
    physical: Option<SurfaceSize>,
    attached: bool,
}

impl WgpuSurface {
    /// Create the device and swapchain for `target`, whose current size in
    /// physical pixels is `physical`. The surface is not configured until
    /// [`RenderSurface::attach`].
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        physical: SurfaceSize,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubestage_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::Device(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| {
                RenderError::SurfaceCreation("surface reports no texture formats".into())
            })?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: physical.width.max(1),
            height: physical.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: pick_alpha_mode(&caps.alpha_modes),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let pipeline = BoxPipeline::new(&device, format, config.width, config.height);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?format,
            alpha = ?config.alpha_mode,
            "GPU surface created"
        );

        Ok(Self {
            surface: Some(surface),
            device,
            queue,
            config,
            pipeline,
            settings: SurfaceSettings::default(),
            size: physical,
            physical: Some(physical),
            attached: false,
        })
    }

    /// Swapchain size in physical pixels.
    pub fn buffer_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.config.width, self.config.height)
    }

    /// Size the swapchain to the window's physical size. Hosts call this on
    /// every window resize, including ones that leave the logical size alone.
    pub fn set_physical_size(&mut self, physical: SurfaceSize) {
        self.physical = Some(physical);
        self.reconfigure();
    }

    /// Track a new display scale factor.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.settings.pixel_ratio = pixel_ratio;
        self.reconfigure();
    }

    /// Push size and pixel ratio into the swapchain if it is live.
    fn reconfigure(&mut self) {
        let buffer = buffer_extent(self.size, self.settings.pixel_ratio, self.physical);
        self.config.width = buffer.width;
        self.config.height = buffer.height;
        if let (true, Some(surface)) = (self.attached, &self.surface) {
            surface.configure(&self.device, &self.config);
            self.pipeline
                .resize(&self.device, self.config.width, self.config.height);
        }
    }
}

impl RenderSurface for WgpuSurface {
    fn configure(&mut self, settings: &SurfaceSettings) {
        self.settings = *settings;
        if settings.shadows {
            tracing::debug!("shadow casting requested; this backend draws no shadow maps");
        }
        self.reconfigure();
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
        self.reconfigure();
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn attach(&mut self) -> Result<(), RenderError> {
        if self.surface.is_none() {
            return Err(RenderError::Detached);
        }
        self.attached = true;
        self.reconfigure();
        tracing::debug!(size = %self.size, buffer = %self.buffer_size(), "wgpu surface attached");
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        let Some(surface) = self.surface.as_ref().filter(|_| self.attached) else {
            return Err(RenderError::Detached);
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("swapchain lost or outdated, reconfiguring");
                surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("timed out acquiring swapchain texture, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.pipeline.draw(
            &self.device,
            &self.queue,
            &view,
            self.settings.clear_color,
            scene,
            camera,
        );
        output.present();
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = false;
        self.surface = None;
        tracing::debug!("wgpu surface detached");
    }
}
