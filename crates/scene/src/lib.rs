//! Scene model: camera, lights, static meshes and updatable scene objects.
//!
//! # Invariants
//! - A `Scene` is owned by exactly one runner for its lifetime.
//! - After `ObjectList::update_all` + `retain_active`, only active objects remain,
//!   in their original relative order.

pub mod camera;
pub mod light;
pub mod mesh;
pub mod object;
pub mod scene;

pub use camera::PerspectiveCamera;
pub use light::{AmbientLight, DirectionalLight};
pub use mesh::{Geometry, LambertMaterial, Mesh};
pub use object::{Bobber, ObjectList, SceneObject};
pub use scene::Scene;
