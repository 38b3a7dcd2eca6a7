use crate::mesh::{Geometry, LambertMaterial, Mesh};
use cubestage_common::{ObjectId, Rgba, Transform};
use glam::Vec3;

/// Anything that takes part in the per-frame update cycle.
///
/// The runner only ever sees this trait; concrete objects stay with whoever
/// creates them.
pub trait SceneObject {
    /// Advance internal state by `delta` seconds.
    fn update(&mut self, delta: f32);

    /// `false` once the object should leave the scene.
    fn is_active(&self) -> bool;

    /// Called once, right after the object is purged from the scene.
    fn on_removed(&mut self) {}

    /// Geometry to draw for this object, if it has any.
    fn mesh(&self) -> Option<&Mesh> {
        None
    }
}

struct Entry {
    id: ObjectId,
    object: Box<dyn SceneObject>,
}

/// Insertion-ordered set of scene objects.
///
/// Removal is update-then-filter: an object that went inactive between two
/// ticks still receives one last `update` before it is dropped.
#[derive(Default)]
pub struct ObjectList {
    entries: Vec<Entry>,
}

impl ObjectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: Box<dyn SceneObject>) -> ObjectId {
        let id = ObjectId::new();
        self.entries.push(Entry { id, object });
        tracing::debug!(id = %id, count = self.entries.len(), "scene object added");
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// Call `update(delta)` on every object in insertion order.
    pub fn update_all(&mut self, delta: f32) {
        for entry in &mut self.entries {
            entry.object.update(delta);
        }
    }

    /// Drop every inactive object, keeping the survivors' relative order.
    /// Returns the ids that were removed.
    pub fn retain_active(&mut self) -> Vec<ObjectId> {
        let mut removed = Vec::new();
        self.entries.retain_mut(|entry| {
            if entry.object.is_active() {
                return true;
            }
            entry.object.on_removed();
            removed.push(entry.id);
            false
        });
        if !removed.is_empty() {
            tracing::debug!(
                removed = removed.len(),
                remaining = self.entries.len(),
                "purged inactive scene objects"
            );
        }
        removed
    }

    /// Meshes contributed by the objects, in insertion order.
    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> + '_ {
        self.entries.iter().filter_map(|e| e.object.mesh())
    }
}

/// A small cube that bobs up and down and leaves the scene after `lifetime`
/// seconds.
#[derive(Debug, Clone)]
pub struct Bobber {
    mesh: Mesh,
    anchor: Vec3,
    amplitude: f32,
    /// Oscillation frequency in Hz.
    frequency: f32,
    age: f32,
    lifetime: f32,
}

impl Bobber {
    pub fn new(anchor: Vec3, color: Rgba, lifetime: f32) -> Self {
        let mut mesh = Mesh::new(
            Geometry::Box {
                size: Vec3::splat(0.25),
            },
            LambertMaterial { color },
        );
        mesh.transform = Transform::from_position(anchor);
        Self {
            mesh,
            anchor,
            amplitude: 0.3,
            frequency: 0.5,
            age: 0.0,
            lifetime,
        }
    }

    pub fn with_motion(mut self, amplitude: f32, frequency: f32) -> Self {
        self.amplitude = amplitude;
        self.frequency = frequency;
        self
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn position(&self) -> Vec3 {
        self.mesh.transform.position
    }
}

impl SceneObject for Bobber {
    fn update(&mut self, delta: f32) {
        self.age += delta;
        let phase = self.age * self.frequency * std::f32::consts::TAU;
        self.mesh.transform.position = self.anchor + Vec3::Y * phase.sin() * self.amplitude;
    }

    fn is_active(&self) -> bool {
        self.age < self.lifetime
    }

    fn mesh(&self) -> Option<&Mesh> {
        Some(&self.mesh)
    }
}
