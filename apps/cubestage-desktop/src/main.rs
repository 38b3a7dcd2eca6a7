use anyhow::{Context, Result};
use clap::Parser;
use cubestage_common::{Rgba, SurfaceSize};
use cubestage_render::Container;
use cubestage_render_wgpu::WgpuSurface;
use cubestage_runner::{
    FrameDriver, ResizeRelay, SceneConfig, SceneRunner, SystemClock, TickOutcome,
};
use cubestage_scene::Bobber;
use cubestage_viewport::ViewportTracker;
use glam::Vec3;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "cubestage-desktop", about = "Animated cube scene in a desktop window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config file (.json, .yaml or .yml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "720")]
    height: u32,
}

/// The window seen as a container: logical size plus scale factor.
struct WindowContainer<'a>(&'a Window);

impl Container for WindowContainer<'_> {
    fn bounding_size(&self) -> SurfaceSize {
        logical_size(self.0.inner_size(), self.0.scale_factor())
    }

    fn pixel_ratio(&self) -> f32 {
        self.0.scale_factor() as f32
    }
}

fn logical_size(physical: PhysicalSize<u32>, scale_factor: f64) -> SurfaceSize {
    let logical: LogicalSize<u32> = physical.to_logical(scale_factor);
    SurfaceSize::new(logical.width, logical.height)
}

fn physical_size(physical: PhysicalSize<u32>) -> SurfaceSize {
    SurfaceSize::new(physical.width, physical.height)
}

/// Frame driver backed by winit redraw requests.
struct RedrawDriver {
    window: Arc<Window>,
}

impl FrameDriver for RedrawDriver {
    fn start(&mut self) {
        self.window.request_redraw();
    }

    fn request_frame(&mut self) {
        self.window.request_redraw();
    }

    fn stop(&mut self) {
        tracing::debug!("redraw driver stopped");
    }
}

/// Everything that exists only while the window is mounted.
struct Mounted {
    window: Arc<Window>,
    runner: SceneRunner<WgpuSurface, SystemClock>,
    tracker: ViewportTracker,
    relay: ResizeRelay,
}

struct DesktopApp {
    config: SceneConfig,
    initial_size: LogicalSize<u32>,
    mounted: Option<Mounted>,
    spawned: u32,
}

impl DesktopApp {
    fn new(config: SceneConfig, width: u32, height: u32) -> Self {
        Self {
            config,
            initial_size: LogicalSize::new(width, height),
            mounted: None,
            spawned: 0,
        }
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("cubestage")
            .with_inner_size(self.initial_size)
            .with_transparent(true);
        let window = Arc::new(event_loop.create_window(attrs).context("creating window")?);

        let surface = WgpuSurface::new(Arc::clone(&window), physical_size(window.inner_size()))?;

        let mut runner = SceneRunner::new(
            surface,
            SystemClock::new(),
            Box::new(RedrawDriver {
                window: Arc::clone(&window),
            }),
            self.config.clone(),
        );
        let container = WindowContainer(&window);
        runner.initialize(&container)?;
        runner.populate_initial_content();

        let mut tracker = ViewportTracker::new(container.bounding_size());
        let relay = ResizeRelay::subscribe(&mut tracker);

        self.mounted = Some(Mounted {
            window,
            runner,
            tracker,
            relay,
        });
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(mut mounted) = self.mounted.take() {
            mounted.relay.unsubscribe(&mut mounted.tracker);
            mounted.runner.teardown();
        }
    }

    fn spawn_bobber(&mut self) {
        let Some(mounted) = &mut self.mounted else {
            return;
        };
        // Golden-angle spiral keeps successive cubes apart.
        let angle = self.spawned as f32 * 2.399_963;
        let radius = 1.2 + (self.spawned % 4) as f32 * 0.3;
        let anchor = Vec3::new(angle.cos() * radius, 0.8, angle.sin() * radius);
        let color = Rgba::new(1.0, 0.55, 0.1, 1.0);
        let id = mounted
            .runner
            .add_scene_object(Box::new(Bobber::new(anchor, color, 8.0)));
        self.spawned += 1;
        tracing::info!(%id, objects = mounted.runner.object_count(), "spawned bobber");
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.mounted.is_some() {
            return;
        }
        if let Err(e) = self.mount(event_loop) {
            tracing::error!("failed to mount scene: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.unmount();
                event_loop.exit();
            }
            WindowEvent::Resized(physical) => {
                let Some(mounted) = &mut self.mounted else {
                    return;
                };
                // The logical size can stay put while the physical one moves.
                mounted
                    .runner
                    .surface_mut()
                    .set_physical_size(physical_size(physical));
                let scale = mounted.window.scale_factor();
                mounted.tracker.observe(logical_size(physical, scale));
                mounted.relay.apply(&mut mounted.runner);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let Some(mounted) = &mut self.mounted else {
                    return;
                };
                tracing::debug!(scale_factor, "scale factor changed");
                mounted.runner.surface_mut().set_pixel_ratio(scale_factor as f32);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key {
                KeyCode::Space => self.spawn_bobber(),
                KeyCode::Escape => {
                    self.unmount();
                    event_loop.exit();
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                let Some(mounted) = &mut self.mounted else {
                    return;
                };
                match mounted.runner.tick() {
                    Ok(TickOutcome::Rendered { .. }) => {}
                    Ok(TickOutcome::Skipped) => tracing::trace!("redraw after teardown"),
                    Err(e) => tracing::error!("frame failed: {e}"),
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("cubestage-desktop starting");

    let config = match &cli.config {
        Some(path) => {
            SceneConfig::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => SceneConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = DesktopApp::new(config, cli.width, cli.height);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_size_rounds_at_fractional_scale() {
        assert_eq!(
            logical_size(PhysicalSize::new(1000, 750), 1.5),
            SurfaceSize::new(667, 500)
        );
        assert_eq!(
            logical_size(PhysicalSize::new(2560, 1440), 2.0),
            SurfaceSize::new(1280, 720)
        );
    }

    #[test]
    fn physical_size_is_passed_through() {
        assert_eq!(
            physical_size(PhysicalSize::new(1000, 1003)),
            SurfaceSize::new(1000, 1003)
        );
    }
}
