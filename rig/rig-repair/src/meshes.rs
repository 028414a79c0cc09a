//! Mesh consolidation: joining a rig's meshes and pruning shape keys.

use rig_types::{Rig, SkinnedMesh};
use tracing::debug;

/// Joins every mesh of the rig into the first one, renamed `Body`.
///
/// Later meshes are converted into the first mesh's local space before
/// merging, so differing object transforms do not shear the result. Group
/// weights union under their names and shape-key order is preserved, with
/// the first mesh's keys leading.
///
/// # Returns
///
/// The number of meshes folded into the survivor (zero when the rig had
/// one mesh or none).
pub fn join_meshes(rig: &mut Rig) -> usize {
    if rig.meshes.is_empty() {
        return 0;
    }
    let rest = rig.meshes.split_off(1);
    let folded = rest.len();
    let base = &mut rig.meshes[0];
    let base_transform = base.transform.clone();
    for mut mesh in rest {
        if mesh.transform != base_transform {
            for vertex in &mut mesh.vertices {
                *vertex = base_transform.apply_inverse_point(&mesh.transform.apply_point(vertex));
            }
            for key in &mut mesh.shape_keys {
                for position in &mut key.positions {
                    *position =
                        base_transform.apply_inverse_point(&mesh.transform.apply_point(position));
                }
            }
            mesh.transform = base_transform.clone();
        }
        base.merge(&mesh);
    }
    base.name = "Body".into();
    if folded > 0 {
        debug!(folded, vertices = rig.meshes[0].vertex_count(), "joined meshes");
    }
    folded
}

/// Removes shape keys that carry no deformation.
///
/// A key is dropped when its name contains `mmd_` (format-specific helper
/// keys) or when its positions equal the basis exactly. The basis itself
/// survives the comparison, but a lone leftover basis is dropped too.
///
/// # Returns
///
/// The number of keys removed.
pub fn clean_shape_keys(mesh: &mut SkinnedMesh) -> usize {
    if mesh.shape_keys.is_empty() {
        return 0;
    }
    let before = mesh.shape_keys.len();
    mesh.shape_keys.retain(|k| !k.name.contains("mmd_"));

    if let Some(basis) = mesh.shape_keys.first() {
        let basis_positions = basis.positions.clone();
        let mut index = 0;
        mesh.shape_keys.retain(|k| {
            let is_basis = index == 0;
            index += 1;
            is_basis || k.positions != basis_positions
        });
    }
    if mesh.shape_keys.len() == 1 {
        mesh.shape_keys.clear();
    }
    before - mesh.shape_keys.len()
}
