use glam::{Mat4, Vec3};

/// Perspective camera aimed at an explicit look-at point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_degrees: 75.0,
            aspect: 1.0,
            near: 1.0,
            far: 100.0,
        }
    }
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_degrees,
            aspect,
            near,
            far,
            ..Self::default()
        }
    }

    /// Re-aim the camera at `target` from its current position.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Unit vector from the camera towards its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_sets_forward() {
        let mut cam = PerspectiveCamera::new(75.0, 16.0 / 9.0, 1.0, 100.0);
        cam.position = Vec3::new(0.0, 2.0, 5.0);
        cam.look_at(Vec3::new(0.0, 2.0, 0.0));
        assert!((cam.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn view_projection_is_finite() {
        let mut cam = PerspectiveCamera::default();
        cam.position = Vec3::new(0.7, 2.0, 5.0);
        cam.look_at(Vec3::new(0.0, 2.0, 0.0));
        let vp = cam.view_projection();
        assert!(vp.is_finite());
    }

    #[test]
    fn target_projects_to_screen_center() {
        let mut cam = PerspectiveCamera::default();
        cam.position = Vec3::new(0.3, 2.0, 5.0);
        cam.look_at(Vec3::new(0.0, 2.0, 0.0));
        let clip = cam.view_projection() * cam.target.extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
