//! Canonical bone renaming: standardization, alias matching, torso-chain
//! distribution, and sideless-bone resolution.

use hashbrown::HashMap;
use rig_naming::{standardize_name, BoneTable, MatchKind};
use rig_types::{BoneIndex, Rig, Skeleton};
use tracing::debug;

use crate::error::RepairResult;
use crate::weights::{mix_weights, WeightMixPolicy};

/// How one bone's name changed during canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedBone {
    /// Name before the pass.
    pub old: String,
    /// Name after the pass.
    pub new: String,
    /// How the final name was decided.
    pub kind: MatchKind,
}

/// Renames a bone together with its same-named vertex groups on every
/// mesh of the rig.
///
/// When a mesh already has a group under the new name, the old group's
/// weights are folded into it instead of renaming, so no weight is lost.
///
/// # Errors
///
/// Fails if another bone already holds `new_name`.
pub fn rename_bone_and_groups(
    rig: &mut Rig,
    index: BoneIndex,
    new_name: &str,
    policy: WeightMixPolicy,
) -> RepairResult<()> {
    let Some(old) = rig.skeleton.bone(index).map(|b| b.name.clone()) else {
        return Ok(());
    };
    if old == new_name {
        return Ok(());
    }
    rig.skeleton.rename(index, new_name)?;
    for mesh in &mut rig.meshes {
        if mesh.group(new_name).is_some() {
            mix_weights(mesh, &old, new_name, 1.0, policy);
        } else if mesh.group(&old).is_some() {
            mesh.rename_group(&old, new_name)?;
        }
    }
    Ok(())
}

/// Picks a name not held by any live bone, starting from `base` and
/// appending `.001`-style counters until one is free.
fn free_name(skeleton: &Skeleton, base: &str) -> String {
    if !skeleton.contains(base) {
        return base.to_string();
    }
    let mut counter = 1_u32;
    loop {
        let candidate = format!("{base}.{counter:03}");
        if !skeleton.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Number of ancestors above a bone.
fn depth(skeleton: &Skeleton, index: BoneIndex) -> usize {
    let mut count = 0;
    let mut current = skeleton.bone(index).and_then(|b| b.parent);
    while let Some(i) = current {
        count += 1;
        current = skeleton.bone(i).and_then(|b| b.parent);
    }
    count
}

/// Renames every recognized bone to its canonical form.
///
/// Three passes over the skeleton, in order:
///
/// 1. **Standardize** every name ([`standardize_name`]); vertex groups
///    follow their bones.
/// 2. **Alias-match** each standardized name against the table. Plain
///    matches rename to the slot's canonical form (first claimant wins on
///    collision); torso-chain matches are collected and distributed over
///    `Spine`/`Chest`/`Upper Chest` by hierarchy depth, with surplus
///    middle bones folded away (weights merged, the receiving bone's tail
///    extended by each folded bone's tail−head delta).
/// 3. **Resolve sideless bones**: a bone named in the table's
///    `unknown_side` list takes a `Left `/`Right ` prefix from the first
///    child or grandchild whose name carries a side word.
///
/// # Arguments
///
/// * `keep_upper_chest` - with three or more torso bones, keep the top one
///   as `Upper Chest` instead of folding everything between `Chest` and
///   the neck.
/// * `policy` - how folded weights combine.
///
/// # Returns
///
/// One record per surviving bone: original name, final name, and the
/// [`MatchKind`] that produced it.
///
/// # Errors
///
/// Propagates arena failures; name collisions are resolved internally and
/// do not error.
pub fn canonicalize_bone_names(
    rig: &mut Rig,
    table: &BoneTable,
    keep_upper_chest: bool,
    policy: WeightMixPolicy,
) -> RepairResult<Vec<RenamedBone>> {
    let originals: HashMap<BoneIndex, String> = rig
        .skeleton
        .bones()
        .map(|(i, b)| (i, b.name.clone()))
        .collect();
    let mut kinds: HashMap<BoneIndex, MatchKind> = HashMap::new();
    let indices: Vec<BoneIndex> = rig.skeleton.bones().map(|(i, _)| i).collect();

    for &index in &indices {
        let Some(name) = rig.skeleton.bone(index).map(|b| b.name.clone()) else {
            continue;
        };
        let standardized = standardize_name(&name);
        if standardized != name && !rig.skeleton.contains(&standardized) {
            rename_bone_and_groups(rig, index, &standardized, policy)?;
        }
    }

    let chain_slot = table.chain_slot();
    let mut chain_members: Vec<BoneIndex> = Vec::new();
    for &index in &indices {
        let Some(name) = rig.skeleton.bone(index).map(|b| b.name.clone()) else {
            continue;
        };
        let Some(found) = table.match_name(&name) else {
            continue;
        };
        if chain_slot == Some(found.slot) {
            chain_members.push(index);
            continue;
        }
        if name != found.canonical {
            if rig.skeleton.contains(&found.canonical) {
                // An earlier bone already claimed the canonical name.
                continue;
            }
            rename_bone_and_groups(rig, index, &found.canonical, policy)?;
        }
        kinds.insert(index, MatchKind::ExactAlias);
    }

    distribute_torso_chain(rig, chain_members, keep_upper_chest, policy, &mut kinds)?;

    for index in resolve_unknown_sides(rig, table, policy)? {
        kinds.insert(index, MatchKind::ExactAlias);
    }

    let records: Vec<RenamedBone> = rig
        .skeleton
        .bones()
        .map(|(i, bone)| RenamedBone {
            old: originals.get(&i).cloned().unwrap_or_else(|| bone.name.clone()),
            new: bone.name.clone(),
            kind: kinds.get(&i).copied().unwrap_or(MatchKind::Unmatched),
        })
        .collect();
    let matched = records
        .iter()
        .filter(|r| r.kind == MatchKind::ExactAlias)
        .count();
    debug!(
        matched,
        unmatched = records.len() - matched,
        "canonicalized bone names"
    );
    Ok(records)
}

/// Distributes torso-chain matches over `Spine`/`Chest`/`Upper Chest`.
///
/// Members are ordered by hierarchy depth. Bones without a final name are
/// folded into the chain anchor (`Spine`, or `Chest` when an upper chest
/// is kept): weights merge into the anchor's group, the anchor's tail
/// extends by the folded bone's tail−head delta, and the bone is removed.
fn distribute_torso_chain(
    rig: &mut Rig,
    members: Vec<BoneIndex>,
    keep_upper_chest: bool,
    policy: WeightMixPolicy,
    kinds: &mut HashMap<BoneIndex, MatchKind>,
) -> RepairResult<()> {
    if members.is_empty() {
        return Ok(());
    }
    let mut ordered = members;
    ordered.sort_by_key(|&i| depth(&rig.skeleton, i));
    let count = ordered.len();

    let mut targets: Vec<Option<&str>> = vec![None; count];
    targets[0] = Some("Spine");
    if count == 2 {
        targets[1] = Some("Chest");
    } else if count > 2 {
        if keep_upper_chest {
            targets[1] = Some("Chest");
            targets[count - 1] = Some("Upper Chest");
        } else {
            targets[count - 1] = Some("Chest");
        }
    }
    let anchor = if keep_upper_chest && count > 2 {
        "Chest"
    } else {
        "Spine"
    };

    // Vacate the whole family first so final names can't collide with a
    // member still holding one of them.
    let mut vacated: Vec<(BoneIndex, String)> = Vec::with_capacity(count);
    for &index in &ordered {
        let Some(name) = rig.skeleton.bone(index).map(|b| b.name.clone()) else {
            continue;
        };
        let temp = free_name(&rig.skeleton, &name);
        rename_bone_and_groups(rig, index, &temp, policy)?;
        vacated.push((index, name));
    }

    for (position, &(index, ref original)) in vacated.iter().enumerate() {
        let Some(target) = targets[position] else {
            continue;
        };
        if rig.skeleton.contains(target) {
            // A non-chain bone holds the name; give this one its old name back.
            rename_bone_and_groups(rig, index, original, policy)?;
            continue;
        }
        rename_bone_and_groups(rig, index, target, policy)?;
        kinds.insert(index, MatchKind::ExactAlias);
    }

    let mut folded = 0_usize;
    for (position, &(index, _)) in vacated.iter().enumerate() {
        if targets[position].is_some() {
            continue;
        }
        let Some(bone) = rig.skeleton.bone(index) else {
            continue;
        };
        let name = bone.name.clone();
        let delta = bone.tail - bone.head;
        for mesh in &mut rig.meshes {
            mix_weights(mesh, &name, anchor, 1.0, policy);
        }
        if let Some(anchor_bone) = rig.skeleton.get_mut(anchor) {
            anchor_bone.tail += delta;
        }
        rig.skeleton.remove(index);
        folded += 1;
    }
    if folded > 0 {
        debug!(folded, anchor, "folded surplus torso bones");
    }
    Ok(())
}

/// Renames sideless bones by scanning their descendants for a side word.
///
/// For each `(name, base)` entry in the table's `unknown_side` list, the
/// first child or grandchild (declaration order) whose name contains
/// `right` or `left` decides the side; the bone becomes
/// `Right <base>`/`Left <base>`.
fn resolve_unknown_sides(
    rig: &mut Rig,
    table: &BoneTable,
    policy: WeightMixPolicy,
) -> RepairResult<Vec<BoneIndex>> {
    let mut renamed = Vec::new();
    for (key, base) in &table.unknown_side {
        let Some(target) = rig.skeleton.index_of(key) else {
            continue;
        };
        let mut new_name: Option<String> = None;
        for (_, bone) in rig.skeleton.bones() {
            let under_target = bone.parent == Some(target)
                || bone
                    .parent
                    .and_then(|p| rig.skeleton.bone(p))
                    .is_some_and(|p| p.parent == Some(target));
            if !under_target {
                continue;
            }
            let lower = bone.name.to_lowercase();
            if lower.contains("right") {
                new_name = Some(format!("Right {base}"));
                break;
            }
            if lower.contains("left") {
                new_name = Some(format!("Left {base}"));
                break;
            }
        }
        if let Some(name) = new_name {
            if !rig.skeleton.contains(&name) {
                rename_bone_and_groups(rig, target, &name, policy)?;
                renamed.push(target);
            }
        }
    }
    Ok(renamed)
}
