//! Attaching a loose mesh to a rig as one rigid part.

use rig_naming::BoneTable;
use rig_repair::rename_bone_and_groups;
use rig_types::{Bone, Rig, Skeleton, SkinnedMesh};
use tracing::info;

use crate::error::{MergeError, MergeResult};
use crate::merge::run_merge;
use crate::report::MergeReport;
use crate::{MergeParams, MERGE_SUFFIX};

/// Hangs a loose mesh off `attach_bone`, rigidly.
///
/// Any skinning the mesh carried is discarded: every vertex is weighted
/// fully to one new bone, named after the mesh, so the whole piece
/// follows the attachment bone as a single part. The mesh's object
/// transform is honored, so a piece placed against the model in the
/// viewport stays where it was put.
///
/// # Arguments
///
/// * `base` - The rig that receives the mesh.
/// * `mesh` - The mesh to attach.
/// * `attach_bone` - Name of the base bone the mesh hangs under.
/// * `table` - Naming table passed through to the merge.
/// * `params` - Merge tuning; `attach_bone` overrides
///   [`MergeParams::attach_to_bone`].
///
/// # Errors
///
/// Fails when `attach_bone` does not exist in `base` or when the mesh
/// is rotated beyond [`MergeParams::tolerance`] while its holder cannot
/// absorb the rotation.
pub fn attach_mesh(
    base: &mut Rig,
    mesh: SkinnedMesh,
    attach_bone: &str,
    table: &BoneTable,
    params: &MergeParams,
) -> MergeResult<MergeReport> {
    if !base.skeleton.contains(attach_bone) {
        return Err(MergeError::AttachBoneNotFound {
            name: attach_bone.to_string(),
        });
    }

    let mesh_name = mesh.name.clone();
    let mut mesh = mesh;
    mesh.groups.clear();
    let vertex_count = mesh.vertex_count() as u32;
    let group = mesh.ensure_group(attach_bone);
    for vertex in 0..vertex_count {
        group.set_weight(vertex, 1.0);
    }

    // A one-bone holder skeleton stands in for the mesh during the
    // merge; the bone points up Z like a fresh armature's default bone.
    let mut holder = Skeleton::new(mesh_name.clone());
    let mut bone = Bone::new(attach_bone);
    bone.tail.z = 1.0;
    holder.add_bone(bone)?;
    let mut merge = Rig::new(holder).with_mesh(mesh);

    let params = params.clone().with_attach_to_bone(attach_bone);
    let report = run_merge(base, &mut merge, table, &params, true)?;

    // Mesh-only merges keep the suffix on the grafted holder bone; it
    // becomes the handle named after the mesh.
    let grafted = format!("{attach_bone}{MERGE_SUFFIX}");
    if let Some(index) = base.skeleton.index_of(&grafted) {
        rename_bone_and_groups(base, index, &mesh_name, params.weight_policy)?;
    }

    info!(mesh = %mesh_name, bone = attach_bone, "attached mesh");
    Ok(report)
}
