use crate::error::RenderError;
use crate::surface::{RenderSurface, SurfaceSettings};
use cubestage_common::SurfaceSize;
use cubestage_scene::{PerspectiveCamera, Scene};

/// Headless render surface that draws each frame as a block of text.
///
/// Useful for the CLI, logging, and testing the surface contract without a GPU.
#[derive(Debug, Default)]
pub struct TextSurface {
    settings: SurfaceSettings,
    size: SurfaceSize,
    attached: bool,
    frames_rendered: u64,
    last_frame: String,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &SurfaceSettings {
        &self.settings
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Text of the most recent frame, empty before the first render.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }
}

impl RenderSurface for TextSurface {
    fn configure(&mut self, settings: &SurfaceSettings) {
        self.settings = *settings;
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn attach(&mut self) -> Result<(), RenderError> {
        self.attached = true;
        tracing::debug!(size = %self.size, "text surface attached");
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        if !self.attached {
            return Err(RenderError::Detached);
        }
        self.frames_rendered += 1;

        let mut out = String::new();
        let buffer = self.size.scaled(self.settings.pixel_ratio);
        out.push_str(&format!(
            "=== Frame {} ({} @{}x = {}) ===\n",
            self.frames_rendered, self.size, self.settings.pixel_ratio, buffer
        ));
        out.push_str(&format!(
            "Camera: eye=({:.3}, {:.3}, {:.3}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}\n",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov_degrees,
            camera.aspect
        ));
        out.push_str(&format!(
            "Lights: ambient={:.2} directional={:.2} shadows={}\n",
            scene.ambient.intensity,
            scene.directional.intensity,
            self.settings.shadows && scene.directional.cast_shadow
        ));
        out.push_str(&format!(
            "Meshes: {} static, {} objects\n",
            scene.static_meshes().len(),
            scene.objects().len()
        ));
        for mesh in scene.visible_meshes() {
            let p = mesh.transform.position;
            let c = mesh.material.color;
            out.push_str(&format!(
                "  pos=({:.2}, {:.2}, {:.2}) color=({:.2}, {:.2}, {:.2})\n",
                p.x, p.y, p.z, c.r, c.g, c.b
            ));
        }

        self.last_frame = out;
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = false;
        tracing::debug!("text surface detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubestage_common::Rgba;
    use cubestage_scene::{Geometry, LambertMaterial, Mesh};
    use glam::Vec3;

    fn attached_surface() -> TextSurface {
        let mut surface = TextSurface::new();
        surface.configure(&SurfaceSettings {
            pixel_ratio: 2.0,
            ..SurfaceSettings::default()
        });
        surface.set_size(SurfaceSize::new(320, 240));
        surface.attach().unwrap();
        surface
    }

    #[test]
    fn renders_empty_scene() {
        let mut surface = attached_surface();
        let scene = Scene::new();
        surface.render(&scene, &PerspectiveCamera::default()).unwrap();

        assert_eq!(surface.frames_rendered(), 1);
        assert!(surface.last_frame().contains("Frame 1"));
        assert!(surface.last_frame().contains("320x240 @2x = 640x480"));
        assert!(surface.last_frame().contains("Meshes: 0 static, 0 objects"));
    }

    #[test]
    fn renders_mesh_positions() {
        let mut surface = attached_surface();
        let mut scene = Scene::new();
        let mut mesh = Mesh::new(
            Geometry::unit_box(),
            LambertMaterial {
                color: Rgba::from_hex(0x00ff00),
            },
        );
        mesh.transform.position = Vec3::new(1.0, 2.0, 3.0);
        scene.add_mesh(mesh);

        surface.render(&scene, &PerspectiveCamera::default()).unwrap();
        assert!(surface.last_frame().contains("Meshes: 1 static"));
        assert!(surface.last_frame().contains("pos=(1.00, 2.00, 3.00)"));
        assert!(surface.last_frame().contains("color=(0.00, 1.00, 0.00)"));
    }

    #[test]
    fn one_line_per_header_and_mesh() {
        let mut surface = attached_surface();
        let mut scene = Scene::new();
        scene.add_mesh(Mesh::new(Geometry::unit_box(), LambertMaterial { color: Rgba::WHITE }));
        scene.add_mesh(Mesh::new(Geometry::unit_box(), LambertMaterial { color: Rgba::WHITE }));

        surface.render(&scene, &PerspectiveCamera::default()).unwrap();
        let frame = surface.last_frame();
        assert!(frame.ends_with('\n'));
        assert_eq!(frame.lines().count(), 6);
        assert!(frame.lines().next().unwrap().starts_with("=== Frame 1"));
    }

    #[test]
    fn detached_surface_refuses_to_render() {
        let mut surface = attached_surface();
        surface.detach();
        let err = surface
            .render(&Scene::new(), &PerspectiveCamera::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::Detached));
        assert_eq!(surface.frames_rendered(), 0);
    }
}
