//! Skinned meshes: vertices, faces, sparse weights, and shape keys.

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;

use crate::error::{RigError, RigResult};
use crate::transform::ObjectTransform;

/// A named set of sparse per-vertex deform weights.
///
/// Weights are stored only for vertices that have an entry; absent
/// vertices weigh `0.0`. Entries may hold explicit zeros, so "has weight"
/// and "has influence" are different questions.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexGroup {
    /// Group name; deform groups share their name with a bone.
    pub name: String,
    /// Vertex index → weight.
    pub weights: HashMap<u32, f64>,
}

impl VertexGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: HashMap::new(),
        }
    }

    /// Weight of a vertex, `0.0` when absent.
    #[must_use]
    pub fn weight(&self, vertex: u32) -> f64 {
        self.weights.get(&vertex).copied().unwrap_or(0.0)
    }

    /// Sets a vertex weight, keeping explicit zeros.
    pub fn set_weight(&mut self, vertex: u32, weight: f64) {
        self.weights.insert(vertex, weight);
    }

    /// Adds to a vertex weight without clamping.
    pub fn add_weight(&mut self, vertex: u32, delta: f64) {
        *self.weights.entry(vertex).or_insert(0.0) += delta;
    }

    /// Returns `true` if any vertex has a weight greater than zero.
    #[must_use]
    pub fn has_influence(&self) -> bool {
        self.weights.values().any(|w| *w > 0.0)
    }
}

/// A shape key: absolute per-vertex positions for one blend target.
///
/// The first key on a mesh is the basis; key order is meaningful and
/// preserved by mesh joins.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeKey {
    /// Key name (e.g. `Basis`, a viseme, an expression).
    pub name: String,
    /// One position per mesh vertex.
    pub positions: Vec<Point3<f64>>,
}

/// A triangle mesh deformed by a skeleton.
///
/// The mesh's [`ObjectTransform`] is local to the rig that owns it;
/// [`Rig::bake_transforms`](crate::Rig::bake_transforms) pushes it into
/// the vertex data.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkinnedMesh {
    /// Object name of the mesh.
    pub name: String,
    /// Object-level transform, local to the owning rig.
    pub transform: ObjectTransform,
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Triangles as vertex-index triples.
    pub faces: Vec<[u32; 3]>,
    /// Deform and helper vertex groups.
    pub groups: Vec<VertexGroup>,
    /// Shape keys; the first is the basis.
    pub shape_keys: Vec<ShapeKey>,
}

impl SkinnedMesh {
    /// Creates an empty mesh with an identity transform.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// The group with this name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&VertexGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Mutable access to the group with this name.
    #[must_use]
    pub fn group_mut(&mut self, name: &str) -> Option<&mut VertexGroup> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    /// The group with this name, created empty if missing.
    pub fn ensure_group(&mut self, name: &str) -> &mut VertexGroup {
        if let Some(i) = self.groups.iter().position(|g| g.name == name) {
            &mut self.groups[i]
        } else {
            self.groups.push(VertexGroup::new(name));
            let last = self.groups.len() - 1;
            &mut self.groups[last]
        }
    }

    /// Removes and returns the group with this name.
    pub fn remove_group(&mut self, name: &str) -> Option<VertexGroup> {
        let i = self.groups.iter().position(|g| g.name == name)?;
        Some(self.groups.remove(i))
    }

    /// Renames a group, rejecting collisions with an existing group.
    ///
    /// Callers that want collision-folding semantics merge the weights
    /// first and remove the source.
    pub fn rename_group(&mut self, old: &str, new: &str) -> RigResult<()> {
        if old == new {
            return Ok(());
        }
        if self.group(new).is_some() {
            return Err(RigError::DuplicateGroupName { name: new.into() });
        }
        match self.group_mut(old) {
            Some(group) => {
                group.name = new.into();
                Ok(())
            }
            None => Err(RigError::not_found(old)),
        }
    }

    /// Names of all groups that influence at least one vertex.
    #[must_use]
    pub fn used_group_names(&self) -> HashSet<String> {
        self.groups
            .iter()
            .filter(|g| g.has_influence())
            .map(|g| g.name.clone())
            .collect()
    }

    /// The shape key with this name.
    #[must_use]
    pub fn shape_key(&self, name: &str) -> Option<&ShapeKey> {
        self.shape_keys.iter().find(|k| k.name == name)
    }

    /// The basis shape key (first in order), if any keys exist.
    #[must_use]
    pub fn basis_key(&self) -> Option<&ShapeKey> {
        self.shape_keys.first()
    }

    /// Appends a shape key, validating its vertex count.
    pub fn add_shape_key(&mut self, key: ShapeKey) -> RigResult<()> {
        if key.positions.len() != self.vertices.len() {
            return Err(RigError::vertex_mismatch(
                format!("shape key {}", key.name),
                self.vertices.len(),
                key.positions.len(),
            ));
        }
        self.shape_keys.push(key);
        Ok(())
    }

    /// Joins `other` into this mesh.
    ///
    /// Face indices are offset past this mesh's vertices; same-named
    /// groups have their weights combined; shape keys are unioned with
    /// this mesh's key order first and `other`'s new keys appended after,
    /// padding either side with rest positions where a key is missing.
    /// Both meshes are assumed to be in the same space (bake transforms
    /// before joining).
    pub fn merge(&mut self, other: &SkinnedMesh) {
        let offset = self.vertices.len() as u32;
        let self_rest: Vec<Point3<f64>> = self.vertices.clone();
        let other_rest: Vec<Point3<f64>> = other.vertices.clone();

        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );

        for group in &other.groups {
            let target = self.ensure_group(&group.name);
            for (&vertex, &weight) in &group.weights {
                target.add_weight(vertex + offset, weight);
            }
        }

        if self.shape_keys.is_empty() && !other.shape_keys.is_empty() {
            self.shape_keys.push(ShapeKey {
                name: "Basis".into(),
                positions: self_rest.clone(),
            });
        }
        for key in &mut self.shape_keys {
            let incoming = other
                .shape_key(&key.name)
                .map_or(other_rest.as_slice(), |k| k.positions.as_slice());
            key.positions.extend_from_slice(incoming);
        }
        for key in &other.shape_keys {
            if self.shape_key(&key.name).is_some() {
                continue;
            }
            let mut positions = self_rest.clone();
            positions.extend_from_slice(&key.positions);
            self.shape_keys.push(ShapeKey {
                name: key.name.clone(),
                positions,
            });
        }
    }
}
