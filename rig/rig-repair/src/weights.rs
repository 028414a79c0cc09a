//! Vertex-weight folding and group cleanup.
//!
//! Every weight transfer in the repair and merge pipelines funnels through
//! [`mix_weights`], so the clamping policy is decided in exactly one place.

use hashbrown::HashMap;
use rig_naming::BoneTable;
use rig_types::{Rig, SkinnedMesh};
use tracing::debug;

/// How folded weights combine with what a vertex already has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeightMixPolicy {
    /// Plain accumulation. Totals above `1.0` are left alone, matching how
    /// additive weight-mix modifiers behave in DCC tools.
    #[default]
    Additive,
    /// Accumulation capped at `1.0` per vertex.
    AdditiveClamped,
}

impl WeightMixPolicy {
    fn combine(self, existing: f64, incoming: f64) -> f64 {
        match self {
            Self::Additive => existing + incoming,
            Self::AdditiveClamped => (existing + incoming).min(1.0),
        }
    }
}

/// Folds the `from` vertex group into `to` and removes `from`.
///
/// Every vertex with an entry in `from` receives `weight * strength` on
/// top of its current `to` weight, combined per `policy`. The target group
/// is created when missing so no weight is ever dropped.
///
/// # Returns
///
/// `true` if the source group existed and was folded; `false` when there
/// was nothing to do (missing source, or `from == to`).
pub fn mix_weights(
    mesh: &mut SkinnedMesh,
    from: &str,
    to: &str,
    strength: f64,
    policy: WeightMixPolicy,
) -> bool {
    if from == to {
        return false;
    }
    let Some(source) = mesh.remove_group(from) else {
        return false;
    };
    let target = mesh.ensure_group(to);
    for (&vertex, &weight) in &source.weights {
        let current = target.weight(vertex);
        target.set_weight(vertex, policy.combine(current, weight * strength));
    }
    true
}

/// Folds `from` into `to` at full strength on every mesh of the rig.
///
/// # Returns
///
/// The number of meshes on which a fold happened.
pub fn mix_weights_all(rig: &mut Rig, from: &str, to: &str, policy: WeightMixPolicy) -> usize {
    rig.meshes
        .iter_mut()
        .map(|mesh| mix_weights(mesh, from, to, 1.0, policy))
        .filter(|&folded| folded)
        .count()
}

/// Rescales every vertex's group weights so they sum to `1.0`.
///
/// Vertices with a zero total are left untouched. This is an opt-in pass
/// for consumers that need normalized totals after additive folding.
pub fn normalize_vertex_weights(mesh: &mut SkinnedMesh) {
    let mut totals: HashMap<u32, f64> = HashMap::new();
    for group in &mesh.groups {
        for (&vertex, &weight) in &group.weights {
            *totals.entry(vertex).or_insert(0.0) += weight;
        }
    }
    for group in &mut mesh.groups {
        for (vertex, weight) in &mut group.weights {
            if let Some(&total) = totals.get(vertex) {
                if total > 0.0 {
                    *weight /= total;
                }
            }
        }
    }
}

/// Removes vertex groups that influence no vertex.
///
/// With `keep_main_groups`, groups named after canonical main bones
/// survive even when empty; the merge pipeline relies on that between its
/// two cleanup passes.
///
/// # Returns
///
/// The number of groups removed across all meshes.
pub fn remove_unused_groups(rig: &mut Rig, table: &BoneTable, keep_main_groups: bool) -> usize {
    let mut removed = 0;
    for mesh in &mut rig.meshes {
        let before = mesh.groups.len();
        mesh.groups
            .retain(|g| g.has_influence() || (keep_main_groups && table.is_main_bone(&g.name)));
        removed += before - mesh.groups.len();
    }
    if removed > 0 {
        debug!(removed, "removed unused vertex groups");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rig_types::Skeleton;

    fn mesh_with_groups(groups: &[(&str, &[(u32, f64)])]) -> SkinnedMesh {
        let mut mesh = SkinnedMesh::new("Body");
        for (name, weights) in groups {
            let group = mesh.ensure_group(name);
            for &(vertex, weight) in *weights {
                group.set_weight(vertex, weight);
            }
        }
        mesh
    }

    #[test]
    fn mix_folds_and_removes_source() {
        let mut mesh = mesh_with_groups(&[
            ("Spine", &[(0, 0.4), (1, 0.9)]),
            ("ChestOld", &[(1, 0.3), (2, 0.5)]),
        ]);
        assert!(mix_weights(
            &mut mesh,
            "ChestOld",
            "Spine",
            1.0,
            WeightMixPolicy::Additive
        ));
        assert!(mesh.group("ChestOld").is_none());
        let spine = mesh.group("Spine").unwrap();
        assert_relative_eq!(spine.weight(0), 0.4);
        assert_relative_eq!(spine.weight(1), 1.2);
        assert_relative_eq!(spine.weight(2), 0.5);
    }

    #[test]
    fn mix_creates_missing_target() {
        let mut mesh = mesh_with_groups(&[("Twist", &[(3, 0.7)])]);
        assert!(mix_weights(
            &mut mesh,
            "Twist",
            "Left arm",
            1.0,
            WeightMixPolicy::Additive
        ));
        assert_relative_eq!(mesh.group("Left arm").unwrap().weight(3), 0.7);
    }

    #[test]
    fn mix_respects_strength_and_clamp() {
        let mut mesh = mesh_with_groups(&[("A", &[(0, 0.8)]), ("B", &[(0, 0.8)])]);
        assert!(mix_weights(
            &mut mesh,
            "B",
            "A",
            0.5,
            WeightMixPolicy::Additive
        ));
        assert_relative_eq!(mesh.group("A").unwrap().weight(0), 1.2);

        let mut mesh = mesh_with_groups(&[("A", &[(0, 0.8)]), ("B", &[(0, 0.8)])]);
        assert!(mix_weights(
            &mut mesh,
            "B",
            "A",
            1.0,
            WeightMixPolicy::AdditiveClamped
        ));
        assert_relative_eq!(mesh.group("A").unwrap().weight(0), 1.0);
    }

    #[test]
    fn mix_missing_source_is_noop() {
        let mut mesh = mesh_with_groups(&[("A", &[(0, 1.0)])]);
        assert!(!mix_weights(
            &mut mesh,
            "Gone",
            "A",
            1.0,
            WeightMixPolicy::Additive
        ));
        assert!(!mix_weights(
            &mut mesh,
            "A",
            "A",
            1.0,
            WeightMixPolicy::Additive
        ));
        assert_relative_eq!(mesh.group("A").unwrap().weight(0), 1.0);
    }

    #[test]
    fn normalize_scales_totals_to_one() {
        let mut mesh = mesh_with_groups(&[("A", &[(0, 0.6), (1, 0.0)]), ("B", &[(0, 1.8)])]);
        normalize_vertex_weights(&mut mesh);
        assert_relative_eq!(mesh.group("A").unwrap().weight(0), 0.25);
        assert_relative_eq!(mesh.group("B").unwrap().weight(0), 0.75);
        // Zero-total vertices stay as they are.
        assert_relative_eq!(mesh.group("A").unwrap().weight(1), 0.0);
    }

    #[test]
    fn unused_groups_respect_main_list() {
        let mut rig = Rig::new(Skeleton::new("Armature"));
        rig.meshes.push(mesh_with_groups(&[
            ("Hips", &[]),
            ("Skirt", &[]),
            ("Hair", &[(0, 0.5)]),
        ]));
        let table = BoneTable::builtin();

        let removed = remove_unused_groups(&mut rig, &table, true);
        assert_eq!(removed, 1);
        assert!(rig.meshes[0].group("Hips").is_some());
        assert!(rig.meshes[0].group("Skirt").is_none());

        let removed = remove_unused_groups(&mut rig, &table, false);
        assert_eq!(removed, 1);
        assert!(rig.meshes[0].group("Hips").is_none());
        assert!(rig.meshes[0].group("Hair").is_some());
    }
}
