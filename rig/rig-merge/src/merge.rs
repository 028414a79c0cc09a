//! The merge flow: align, absorb, wire together, fold weights.

use rig_naming::BoneTable;
use rig_repair::{
    clean_shape_keys, connect_chains, fix_zero_length_bones, join_meshes, mix_weights_all,
    remove_unused_groups, remove_zero_weight_bones, rename_bone_and_groups,
};
use rig_types::{Bone, BoneIndex, ObjectTransform, Point3, Rig, Skeleton};
use tracing::{debug, info};

use crate::error::{MergeError, MergeResult};
use crate::report::{GraftKind, MergeReport};
use crate::{MergeParams, MERGE_SUFFIX};

/// Grafts `merge` onto `base`, leaving the combined rig in `base`.
///
/// When the merge skeleton carries humanoid bone names the two rigs are
/// folded together bone by bone. Otherwise the whole merge skeleton is
/// hung under [`MergeParams::attach_to_bone`] through a synthetic root.
/// Either way the merge rig is drained: its bones and meshes move into
/// `base`, namespaced with [`MERGE_SUFFIX`](crate::MERGE_SUFFIX) for the
/// duration of the merge so nothing collides.
///
/// # Arguments
///
/// * `base` - The rig that survives, modified in place.
/// * `merge` - The rig to graft. Left empty on success.
/// * `table` - Naming table; its main-bone list drives the bone pairing.
/// * `params` - Attachment point, transform handling, and cleanup tuning.
///
/// # Errors
///
/// Fails when either skeleton is empty, when a custom graft has no
/// usable attachment bone, or when the merge rig is rotated beyond
/// [`MergeParams::tolerance`] in a way that folding cannot express.
pub fn merge_rigs(
    base: &mut Rig,
    merge: &mut Rig,
    table: &BoneTable,
    params: &MergeParams,
) -> MergeResult<MergeReport> {
    run_merge(base, merge, table, params, false)
}

/// Shared body of [`merge_rigs`] and [`attach_mesh`](crate::attach_mesh).
///
/// `mesh_only` keeps the grafted bone tree intact: no weight folding, no
/// suffix stripping, no zero-weight cleanup. The caller renames the
/// surviving attachment bone afterwards.
pub(crate) fn run_merge(
    base: &mut Rig,
    merge: &mut Rig,
    table: &BoneTable,
    params: &MergeParams,
    mesh_only: bool,
) -> MergeResult<MergeReport> {
    if base.skeleton.is_empty() || merge.skeleton.is_empty() {
        return Err(MergeError::EmptyRig);
    }
    let mut report = MergeReport::default();

    fix_zero_length_bones(&mut base.skeleton);
    fix_zero_length_bones(&mut merge.skeleton);

    if params.join_meshes {
        report.meshes_joined += join_meshes(base);
        report.meshes_joined += join_meshes(merge);
    }

    base.bake_transforms();

    // With a single merge mesh the artist placed the part by moving the
    // mesh, so its transform folds into the armature instead of being
    // baked away.
    let single_merge_mesh = merge.meshes.len() == 1;
    if (!single_merge_mesh || !params.join_meshes || params.apply_transforms) && !mesh_only {
        merge.bake_transforms();
    } else {
        fold_mesh_into_armature(merge, params.tolerance)?;
    }

    // Eye bones are shared by otherwise unrelated accessory rigs, so
    // they alone do not make a humanoid match.
    let humanoid = table
        .main_bones
        .iter()
        .any(|name| !name.contains("Eye") && merge.skeleton.contains(name));
    let mut merge_set: Vec<String> = table.main_bones.clone();
    let mut anchor_name: Option<String> = None;

    if !humanoid && !params.merge_matching_bones {
        let anchor = params
            .attach_to_bone
            .as_deref()
            .ok_or(MergeError::NoAttachBone)?;
        if !base.skeleton.contains(anchor) {
            return Err(MergeError::AttachBoneNotFound {
                name: anchor.to_string(),
            });
        }
        graft_root(merge, anchor, params)?;
        merge_set.push(anchor.to_string());
        anchor_name = Some(anchor.to_string());
    }

    report.graft = if params.merge_matching_bones {
        GraftKind::MatchingBones
    } else if humanoid {
        GraftKind::Auto
    } else {
        GraftKind::Custom
    };
    debug!(graft = %report.graft, "grafting rig");

    suffix_bones(merge, params)?;
    report.bones_absorbed = merge.skeleton.len();
    let merge_name = merge.skeleton.name.clone();
    base.skeleton.absorb(&merge.skeleton)?;
    merge.skeleton = Skeleton::new(merge_name);
    base.meshes.append(&mut merge.meshes);

    for mesh in &mut base.meshes {
        report.shape_keys_removed += clean_shape_keys(mesh);
    }
    if params.join_meshes {
        report.meshes_joined += join_meshes(base);
    }

    if params.merge_matching_bones {
        merge_set.clear();
        for (index, stem) in suffixed_bones(&base.skeleton) {
            if let Some(target) = base.skeleton.index_of(&stem) {
                base.skeleton.set_parent(index, Some(target))?;
                report.bones_reparented += 1;
                merge_set.push(stem);
            }
        }
    } else {
        for name in &merge_set {
            let suffixed = format!("{name}{MERGE_SUFFIX}");
            if let (Some(child), Some(target)) =
                (base.skeleton.index_of(&suffixed), base.skeleton.index_of(name))
            {
                base.skeleton.set_parent(child, Some(target))?;
                report.bones_reparented += 1;
            }
        }
        // Outside the humanoid set, a shared name at the same head
        // position counts as the same bone.
        for (index, stem) in suffixed_bones(&base.skeleton) {
            if merge_set.iter().any(|n| *n == stem) {
                continue;
            }
            let Some(target) = base.skeleton.index_of(&stem) else {
                continue;
            };
            let matched = match (base.skeleton.bone(index), base.skeleton.bone(target)) {
                (Some(a), Some(b)) => same_position(&a.head, &b.head),
                _ => false,
            };
            if matched {
                base.skeleton.set_parent(index, Some(target))?;
                report.bones_reparented += 1;
                merge_set.push(stem);
            }
        }
    }

    // The synthetic root was created wherever the merge armature
    // originated; once wired in it takes the anchor's place.
    if let Some(anchor) = anchor_name.as_deref() {
        snap_onto(&mut base.skeleton, &format!("{anchor}{MERGE_SUFFIX}"), anchor);
    }

    if !mesh_only && params.remove_zero_weight {
        report.groups_removed += remove_unused_groups(base, table, true);
        if !base.meshes.is_empty() {
            report.zero_weight_removed +=
                remove_zero_weight_bones(base, table, false, anchor_name.as_deref());
        }
    }

    if !mesh_only {
        for name in &merge_set {
            let suffixed = format!("{name}{MERGE_SUFFIX}");
            mix_weights_all(base, &suffixed, name, params.weight_policy);
        }
        for name in &merge_set {
            if !base.skeleton.contains(name) {
                continue;
            }
            let suffixed = format!("{name}{MERGE_SUFFIX}");
            if let Some(index) = base.skeleton.index_of(&suffixed) {
                base.skeleton.remove(index);
                report.bones_merged += 1;
            }
        }
        report.suffixes_stripped = strip_merge_suffix(base, params)?;
    }

    report.tails_connected = connect_chains(&mut base.skeleton);

    if !mesh_only && params.remove_zero_weight {
        report.groups_removed += remove_unused_groups(base, table, false);
        if !base.meshes.is_empty() {
            report.zero_weight_removed +=
                remove_zero_weight_bones(base, table, false, anchor_name.as_deref());
        }
    }

    base.skeleton.name = "Armature".into();
    info!(
        graft = %report.graft,
        absorbed = report.bones_absorbed,
        merged = report.bones_merged,
        reparented = report.bones_reparented,
        "merged rigs"
    );
    Ok(report)
}

/// Folds the lone mesh's object transform into the merge armature, so a
/// part placed by moving its mesh keeps its world position once the
/// armature transform is baked.
///
/// Rotation cannot be folded axis by axis. When an axis is rotated
/// beyond `tolerance` and the armature transform is not default on that
/// axis, the armature transform is reset to identity and the merge
/// aborts, leaving the part where the artist can re-place it.
fn fold_mesh_into_armature(merge: &mut Rig, tolerance: f64) -> MergeResult<()> {
    let Some(mesh_transform) = merge.meshes.first().map(|m| m.transform.clone()) else {
        merge.bake_transforms();
        return Ok(());
    };
    let armature = merge.skeleton.transform.clone();
    for axis in 0..3 {
        if armature.rotation[axis].abs() <= tolerance
            && mesh_transform.rotation[axis].abs() <= tolerance
        {
            continue;
        }
        if armature.location[axis] != 0.0
            || armature.rotation[axis].abs() > tolerance
            || armature.scale[axis] != 1.0
        {
            merge.skeleton.transform = ObjectTransform::identity();
            let rotation = armature
                .max_abs_rotation()
                .max(mesh_transform.max_abs_rotation());
            return Err(MergeError::RotatedBeyondTolerance { rotation });
        }
    }
    merge.skeleton.transform = armature.fold_child(&mesh_transform);
    if let Some(mesh) = merge.meshes.first_mut() {
        mesh.transform = ObjectTransform::identity();
    }
    merge.bake_transforms();
    Ok(())
}

/// Hangs every parentless merge bone under a fresh root named after the
/// base anchor, so the whole part grafts as one subtree.
///
/// A merge bone already holding the anchor name is vacated to `_Old`
/// first, its vertex groups following the rename.
fn graft_root(merge: &mut Rig, anchor: &str, params: &MergeParams) -> MergeResult<()> {
    if let Some(taken) = merge.skeleton.index_of(anchor) {
        let vacated = format!("{anchor}_Old");
        rename_bone_and_groups(merge, taken, &vacated, params.weight_policy)?;
    }
    let old_roots = merge.skeleton.roots();
    let mut root = Bone::new(anchor);
    root.tail.z += 0.1;
    let root_index = merge.skeleton.add_bone(root)?;
    for index in old_roots {
        merge.skeleton.set_parent(index, Some(root_index))?;
    }
    Ok(())
}

/// Appends [`MERGE_SUFFIX`](crate::MERGE_SUFFIX) to every bone of the
/// merge rig, vertex groups following their bones.
fn suffix_bones(merge: &mut Rig, params: &MergeParams) -> MergeResult<()> {
    let indices: Vec<BoneIndex> = merge.skeleton.bones().map(|(i, _)| i).collect();
    for index in indices {
        let Some(name) = merge.skeleton.bone(index).map(|b| b.name.clone()) else {
            continue;
        };
        let suffixed = format!("{name}{MERGE_SUFFIX}");
        rename_bone_and_groups(merge, index, &suffixed, params.weight_policy)?;
    }
    Ok(())
}

/// Drops the merge suffix from every bone whose bare name is free,
/// renaming vertex groups along with the bones.
fn strip_merge_suffix(base: &mut Rig, params: &MergeParams) -> MergeResult<usize> {
    let mut stripped = 0;
    for (index, stem) in suffixed_bones(&base.skeleton) {
        if base.skeleton.contains(&stem) {
            continue;
        }
        rename_bone_and_groups(base, index, &stem, params.weight_policy)?;
        stripped += 1;
    }
    Ok(stripped)
}

/// Moves `bone` onto `target`'s head and tail.
fn snap_onto(skeleton: &mut Skeleton, bone: &str, target: &str) {
    let Some(placed) = skeleton.get(target).map(|b| (b.head, b.tail, b.roll)) else {
        return;
    };
    if let Some(moved) = skeleton.get_mut(bone) {
        moved.head = placed.0;
        moved.tail = placed.1;
        moved.roll = placed.2;
    }
}

/// Every live bone still carrying the merge suffix, paired with its
/// bare name.
fn suffixed_bones(skeleton: &Skeleton) -> Vec<(BoneIndex, String)> {
    skeleton
        .bones()
        .filter_map(|(index, bone)| {
            bone.name
                .strip_suffix(MERGE_SUFFIX)
                .map(|stem| (index, stem.to_string()))
        })
        .collect()
}

// Heads rounded to four decimals count as the same spot.
fn same_position(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    (0..3).all(|axis| round4(a[axis]) == round4(b[axis]))
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rig_types::{SkinnedMesh, Vector3};

    use super::*;

    fn rig_with_bones(names: &[&str]) -> Rig {
        let mut skeleton = Skeleton::new("test");
        let mut parent = None;
        for (i, name) in names.iter().enumerate() {
            let z = i as f64 * 0.2;
            let mut bone = Bone::with_positions(
                *name,
                Point3::new(0.0, 0.0, z),
                Point3::new(0.0, 0.0, z + 0.2),
            );
            bone.parent = parent;
            let index = skeleton.add_bone(bone).unwrap();
            parent = Some(index);
        }
        Rig::new(skeleton)
    }

    fn weighted_mesh(name: &str, groups: &[(&str, u32, f64)]) -> SkinnedMesh {
        let mut mesh = SkinnedMesh::new(name);
        let count = groups.iter().map(|(_, v, _)| v + 1).max().unwrap_or(0);
        for i in 0..count {
            mesh.vertices.push(Point3::new(0.0, 0.0, f64::from(i)));
        }
        for (group, vertex, weight) in groups {
            mesh.ensure_group(group).set_weight(*vertex, *weight);
        }
        mesh
    }

    #[test]
    fn auto_graft_folds_shared_bones_and_keeps_the_rest() {
        let mut base = rig_with_bones(&["Hips", "Spine"])
            .with_mesh(weighted_mesh("Body", &[("Hips", 0, 1.0)]));
        let mut merge = rig_with_bones(&["Hips", "Prop"])
            .with_mesh(weighted_mesh("PropMesh", &[("Hips", 0, 0.5), ("Prop", 0, 0.5)]));
        let params = MergeParams::new().with_remove_zero_weight(false);

        let report = merge_rigs(&mut base, &mut merge, &BoneTable::builtin(), &params).unwrap();

        assert_eq!(report.graft, GraftKind::Auto);
        assert_eq!(report.bones_absorbed, 2);
        assert_eq!(report.bones_merged, 1);
        assert!(base.skeleton.contains("Prop"));
        assert!(!base.skeleton.names().iter().any(|n| n.ends_with(MERGE_SUFFIX)));
        let prop = base.skeleton.get("Prop").unwrap();
        assert_eq!(prop.parent, base.skeleton.index_of("Hips"));
        assert!(merge.skeleton.is_empty());
        assert!(merge.meshes.is_empty());
    }

    #[test]
    fn auto_graft_mixes_weights_into_the_base_group() {
        let mut base = rig_with_bones(&["Hips", "Spine"])
            .with_mesh(weighted_mesh("Body", &[("Hips", 0, 0.25)]));
        let mut merge =
            rig_with_bones(&["Hips"]).with_mesh(weighted_mesh("PropMesh", &[("Hips", 0, 0.5)]));
        let params = MergeParams::new().with_remove_zero_weight(false);

        merge_rigs(&mut base, &mut merge, &BoneTable::builtin(), &params).unwrap();

        // Joined into one mesh, both weights land in the one Hips group.
        assert_eq!(base.meshes.len(), 1);
        let body = &base.meshes[0];
        assert!(body.group("Hips.merge").is_none());
        assert_relative_eq!(body.group("Hips").unwrap().weight(0), 0.25);
        assert_relative_eq!(body.group("Hips").unwrap().weight(1), 0.5);
    }

    #[test]
    fn custom_graft_hangs_the_part_under_the_anchor() {
        let mut base = rig_with_bones(&["Hips", "Spine", "Head"]);
        let mut merge = rig_with_bones(&["Ribbon", "Ribbon_1"])
            .with_mesh(weighted_mesh("RibbonMesh", &[("Ribbon", 0, 1.0)]));
        let params = MergeParams::new()
            .with_attach_to_bone("Head")
            .with_remove_zero_weight(false);

        let report = merge_rigs(&mut base, &mut merge, &BoneTable::builtin(), &params).unwrap();

        assert_eq!(report.graft, GraftKind::Custom);
        // The synthetic root was folded into the base anchor.
        assert_eq!(report.bones_merged, 1);
        let ribbon = base.skeleton.get("Ribbon").unwrap();
        assert_eq!(ribbon.parent, base.skeleton.index_of("Head"));
        assert_eq!(
            base.skeleton.get("Ribbon_1").unwrap().parent,
            base.skeleton.index_of("Ribbon")
        );
    }

    #[test]
    fn custom_graft_without_anchor_fails() {
        let mut base = rig_with_bones(&["Hips"]);
        let mut merge = rig_with_bones(&["Ribbon"]);
        let err = merge_rigs(
            &mut base,
            &mut merge,
            &BoneTable::builtin(),
            &MergeParams::new(),
        )
        .unwrap_err();
        assert!(matches!(err, MergeError::NoAttachBone));

        let err = merge_rigs(
            &mut base,
            &mut merge,
            &BoneTable::builtin(),
            &MergeParams::new().with_attach_to_bone("Tail"),
        )
        .unwrap_err();
        assert!(matches!(err, MergeError::AttachBoneNotFound { name } if name == "Tail"));
    }

    #[test]
    fn matching_graft_pairs_every_shared_name() {
        let mut base = rig_with_bones(&["Root", "Gun", "Sight"]);
        let mut merge = rig_with_bones(&["Root", "Gun"])
            .with_mesh(weighted_mesh("GunMesh", &[("Gun", 0, 1.0)]));
        let params = MergeParams::new()
            .with_merge_matching_bones(true)
            .with_remove_zero_weight(false);

        let report = merge_rigs(&mut base, &mut merge, &BoneTable::builtin(), &params).unwrap();

        assert_eq!(report.graft, GraftKind::MatchingBones);
        assert_eq!(report.bones_reparented, 2);
        assert_eq!(report.bones_merged, 2);
        assert!(!base.skeleton.names().iter().any(|n| n.ends_with(MERGE_SUFFIX)));
    }

    #[test]
    fn rotation_beyond_tolerance_aborts_and_resets() {
        let mut base = rig_with_bones(&["Hips"]);
        let mut merge =
            rig_with_bones(&["Ribbon"]).with_mesh(weighted_mesh("RibbonMesh", &[("Ribbon", 0, 1.0)]));
        merge.skeleton.transform = ObjectTransform::from_rotation(Vector3::new(0.0, 0.0, 0.3));
        let bones_before = base.skeleton.len();

        let err = merge_rigs(
            &mut base,
            &mut merge,
            &BoneTable::builtin(),
            &MergeParams::new().with_attach_to_bone("Hips"),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            MergeError::RotatedBeyondTolerance { rotation } if rotation > 0.0
        ));
        assert!(merge.skeleton.transform.is_identity());
        assert_eq!(base.skeleton.len(), bones_before);
        assert!(merge.skeleton.contains("Ribbon"));
    }

    #[test]
    fn mesh_rotation_is_folded_when_armature_is_default() {
        let mut merge =
            rig_with_bones(&["Ribbon"]).with_mesh(weighted_mesh("RibbonMesh", &[("Ribbon", 0, 1.0)]));
        merge.meshes[0].transform = ObjectTransform::from_rotation(Vector3::new(0.3, 0.0, 0.0));

        fold_mesh_into_armature(&mut merge, crate::ROTATION_TOLERANCE).unwrap();

        // The rotation moved onto the armature and was baked from there.
        assert!(merge.skeleton.transform.is_identity());
        assert!(merge.meshes[0].transform.is_identity());
    }

    #[test]
    fn fold_combines_mesh_and_armature_transforms() {
        let mut mesh = weighted_mesh("RibbonMesh", &[("Ribbon", 0, 1.0)]);
        mesh.vertices[0] = Point3::new(0.0, 0.0, 0.25);
        mesh.transform = ObjectTransform::from_location(Vector3::new(0.0, 0.0, 0.5));
        let mut merge = rig_with_bones(&["Ribbon"]).with_mesh(mesh);
        merge.skeleton.transform = ObjectTransform {
            location: Vector3::new(0.0, 0.0, 1.0),
            rotation: Vector3::zeros(),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };

        fold_mesh_into_armature(&mut merge, crate::ROTATION_TOLERANCE).unwrap();

        // World position of the vertex survives the fold and bake:
        // 1.0 + 2.0 * (0.5 + 0.25) = 2.5.
        assert!(merge.skeleton.transform.is_identity());
        assert_relative_eq!(merge.meshes[0].vertices[0].z, 2.5);
    }

    #[test]
    fn same_position_rounds_to_four_decimals() {
        let a = Point3::new(0.123_44, 0.0, 1.0);
        let b = Point3::new(0.123_39, 0.0, 1.0);
        assert!(same_position(&a, &b));
        let c = Point3::new(0.124_0, 0.0, 1.0);
        assert!(!same_position(&a, &c));
    }

    #[test]
    fn empty_rigs_are_rejected() {
        let mut base = Rig::new(Skeleton::new("base"));
        let mut merge = rig_with_bones(&["Ribbon"]);
        let err = merge_rigs(
            &mut base,
            &mut merge,
            &BoneTable::builtin(),
            &MergeParams::new(),
        )
        .unwrap_err();
        assert!(matches!(err, MergeError::EmptyRig));
    }
}
