//! Bone and group cleanup: junk bones, zero-weight bones, helper-group
//! folds.

use hashbrown::HashSet;
use rig_naming::{apply_side, has_side_placeholder, BoneTable, Side};
use rig_types::{BoneIndex, Rig, Skeleton};
use tracing::debug;

use crate::weights::{mix_weights, WeightMixPolicy};

/// Deletes bones matching the table's junk names, prefixes, and suffixes.
///
/// A junk bone's vertex groups are folded into its parent's group before
/// the bone goes, so weights survive the deletion; a parentless junk bone
/// has its groups dropped outright. Names on the keep list are exempt.
///
/// # Returns
///
/// The number of bones removed.
pub fn remove_junk_bones(rig: &mut Rig, table: &BoneTable, policy: WeightMixPolicy) -> usize {
    let indices: Vec<BoneIndex> = rig.skeleton.bones().map(|(i, _)| i).collect();
    let mut removed = 0;
    for index in indices {
        let Some(bone) = rig.skeleton.bone(index) else {
            continue;
        };
        let name = bone.name.clone();
        if !table.is_junk(&name) || table.is_kept(&name) {
            continue;
        }
        let parent = bone
            .parent
            .and_then(|p| rig.skeleton.bone(p))
            .map(|p| p.name.clone());
        for mesh in &mut rig.meshes {
            match &parent {
                Some(parent) => {
                    mix_weights(mesh, &name, parent, 1.0, policy);
                }
                None => {
                    mesh.remove_group(&name);
                }
            }
        }
        rig.skeleton.remove(index);
        removed += 1;
    }
    if removed > 0 {
        debug!(removed, "removed junk bones");
    }
    removed
}

fn is_end_bone(skeleton: &Skeleton, index: BoneIndex) -> bool {
    let Some(parent) = skeleton.bone(index).and_then(|b| b.parent) else {
        return false;
    };
    skeleton.children_of(parent).len() == 1
}

/// Deletes bones that move no vertex on any mesh.
///
/// The used-name set is computed once up front, so bones whose groups only
/// hold explicit zeros count as unused. Exempt from deletion: keep-list
/// names, names containing `Root_`, the `ignore` name, and (with
/// `keep_end_bones`) bones that are their parent's only child.
///
/// Matching vertex groups are removed together with their bones.
///
/// # Returns
///
/// The number of bones removed.
pub fn remove_zero_weight_bones(
    rig: &mut Rig,
    table: &BoneTable,
    keep_end_bones: bool,
    ignore: Option<&str>,
) -> usize {
    let mut used: HashSet<String> = HashSet::new();
    for mesh in &rig.meshes {
        used.extend(mesh.used_group_names());
    }
    let indices: Vec<BoneIndex> = rig.skeleton.bones().map(|(i, _)| i).collect();
    let mut removed = 0;
    for index in indices {
        let Some(bone) = rig.skeleton.bone(index) else {
            continue;
        };
        let name = bone.name.clone();
        if used.contains(&name)
            || table.is_kept(&name)
            || name.contains("Root_")
            || Some(name.as_str()) == ignore
        {
            continue;
        }
        if keep_end_bones && is_end_bone(&rig.skeleton, index) {
            continue;
        }
        for mesh in &mut rig.meshes {
            mesh.remove_group(&name);
        }
        rig.skeleton.remove(index);
        removed += 1;
    }
    if removed > 0 {
        debug!(removed, "removed zero-weight bones");
    }
    removed
}

/// Folds the table's helper groups into their canonical targets.
///
/// Each rule's sources are mixed into its target group and removed. Sided
/// rules expand coherently, left sources into the left target. A fold
/// runs only when the target exists as a bone, so weights never end up on
/// a group nothing deforms; the source bones themselves are left for the
/// zero-weight pass.
///
/// # Returns
///
/// The number of source groups folded, summed over all meshes.
pub fn apply_reweight_rules(rig: &mut Rig, table: &BoneTable, policy: WeightMixPolicy) -> usize {
    let mut expanded: Vec<(String, Vec<String>)> = Vec::new();
    for rule in &table.reweight {
        if has_side_placeholder(&rule.target) || rule.sources.iter().any(|s| has_side_placeholder(s))
        {
            for side in [Side::Left, Side::Right] {
                expanded.push((
                    apply_side(&rule.target, side),
                    rule.sources.iter().map(|s| apply_side(s, side)).collect(),
                ));
            }
        } else {
            expanded.push((rule.target.clone(), rule.sources.clone()));
        }
    }

    let mut folded = 0;
    for (target, sources) in &expanded {
        if !rig.skeleton.contains(target) {
            continue;
        }
        for source in sources {
            for mesh in &mut rig.meshes {
                if mix_weights(mesh, source, target, 1.0, policy) {
                    folded += 1;
                }
            }
        }
    }
    if folded > 0 {
        debug!(folded, "folded helper groups");
    }
    folded
}
