use crate::light::{AmbientLight, DirectionalLight};
use crate::mesh::Mesh;
use crate::object::{ObjectList, SceneObject};
use cubestage_common::ObjectId;

/// Everything a frame is drawn from, minus the camera.
#[derive(Default)]
pub struct Scene {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    meshes: Vec<Mesh>,
    objects: ObjectList,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a static mesh. Static meshes are drawn every frame and never updated.
    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    pub fn static_meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn add_object(&mut self, object: Box<dyn SceneObject>) -> ObjectId {
        self.objects.push(object)
    }

    pub fn objects(&self) -> &ObjectList {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectList {
        &mut self.objects
    }

    /// Static meshes followed by object meshes, in draw order.
    pub fn visible_meshes(&self) -> impl Iterator<Item = &Mesh> + '_ {
        self.meshes.iter().chain(self.objects.meshes())
    }
}
