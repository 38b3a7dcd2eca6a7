use cubestage_common::{Rgba, Transform};
use glam::{Mat4, Vec3};

/// Shape of a mesh. Only axis-aligned boxes are drawn today.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum Geometry {
    Box { size: Vec3 },
}

impl Geometry {
    /// The unit cube centred on the origin.
    pub fn unit_box() -> Self {
        Self::Box { size: Vec3::ONE }
    }
}

/// Diffuse-only material: ambient plus `max(n·l, 0)` directional term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertMaterial {
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: LambertMaterial,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: LambertMaterial) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::default(),
        }
    }

    /// Model matrix with the geometry's own extent folded into the scale.
    pub fn model_matrix(&self) -> Mat4 {
        let Geometry::Box { size } = self.geometry;
        let t = &self.transform;
        Mat4::from_scale_rotation_translation(t.scale * size, t.rotation, t.position)
    }
}
