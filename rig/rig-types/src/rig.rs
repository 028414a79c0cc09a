//! A skeleton bundled with the meshes it deforms.

use crate::mesh::SkinnedMesh;
use crate::skeleton::Skeleton;
use crate::transform::ObjectTransform;

/// A skeleton and its skinned meshes, the unit repair and merge
/// operations work on.
///
/// Mesh transforms are local to the skeleton object, the way child
/// objects are parented under an armature in a scene graph.
#[derive(Debug, Clone, Default)]
pub struct Rig {
    /// The armature.
    pub skeleton: Skeleton,
    /// Meshes deformed by the armature.
    pub meshes: Vec<SkinnedMesh>,
}

impl Rig {
    /// Creates a rig with no meshes.
    #[must_use]
    pub fn new(skeleton: Skeleton) -> Self {
        Self {
            skeleton,
            meshes: Vec::new(),
        }
    }

    /// Returns `true` if the rig has no bones and no meshes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skeleton.is_empty() && self.meshes.is_empty()
    }

    /// Adds a mesh and returns `self` for chaining.
    #[must_use]
    pub fn with_mesh(mut self, mesh: SkinnedMesh) -> Self {
        self.meshes.push(mesh);
        self
    }

    /// The mesh with this object name.
    #[must_use]
    pub fn mesh(&self, name: &str) -> Option<&SkinnedMesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    /// Mutable access to the mesh with this object name.
    #[must_use]
    pub fn mesh_mut(&mut self, name: &str) -> Option<&mut SkinnedMesh> {
        self.meshes.iter_mut().find(|m| m.name == name)
    }

    /// Bakes all object transforms into the geometry and resets them.
    ///
    /// Bone heads and tails move into world space through the skeleton
    /// transform; mesh vertices and shape-key positions move through
    /// their mesh transform followed by the skeleton transform. Applying
    /// the two sequentially keeps the bake exact even when both carry
    /// rotation.
    pub fn bake_transforms(&mut self) {
        let armature = self.skeleton.transform.clone();
        if !armature.is_identity() {
            let indices: Vec<_> = self.skeleton.bones().map(|(i, _)| i).collect();
            for index in indices {
                if let Some(bone) = self.skeleton.bone_mut(index) {
                    bone.head = armature.apply_point(&bone.head);
                    bone.tail = armature.apply_point(&bone.tail);
                }
            }
            self.skeleton.transform = ObjectTransform::identity();
        }
        for mesh in &mut self.meshes {
            let local = mesh.transform.clone();
            if local.is_identity() && armature.is_identity() {
                continue;
            }
            for vertex in &mut mesh.vertices {
                *vertex = armature.apply_point(&local.apply_point(vertex));
            }
            for key in &mut mesh.shape_keys {
                for position in &mut key.positions {
                    *position = armature.apply_point(&local.apply_point(position));
                }
            }
            mesh.transform = ObjectTransform::identity();
        }
    }
}
