//! Chain thinning and root attachment for clustered accessory bones.
//!
//! Operates on the clusters produced by [`rig_naming::find_bone_clusters`]:
//! long simulated chains (skirts, hair, tails) can be thinned to a fraction
//! of their bones, or gathered under a single synthetic root.

use rig_naming::BoneCluster;
use rig_types::{Bone, BoneIndex, Rig, Skeleton};
use tracing::debug;

use crate::error::{RepairError, RepairResult};
use crate::weights::{mix_weights_all, WeightMixPolicy};

/// Thins every chain below a cluster, keeping roughly `ratio_percent` of
/// the bones.
///
/// Each cluster member anchors a depth-first walk of its descendants. An
/// accumulator starts at `ratio_percent` and gains `ratio_percent` per
/// bone; whenever it reaches 100 it loses 100 and the current bone is
/// folded away: its weights mix into its parent's group on every mesh and
/// the bone is deleted, its children moving up to the parent. A ratio of
/// 100 collapses the chains entirely; 50 removes every other bone. The
/// anchors themselves are never merged.
///
/// # Arguments
///
/// * `rig` - Skeleton and meshes to thin.
/// * `cluster` - Sibling bones anchoring the walk; members no longer
///   present are skipped, so a stale cluster is safe.
/// * `ratio_percent` - Thinning strength, 1 to 100.
/// * `policy` - How folded weights combine with existing ones.
///
/// # Returns
///
/// The number of bones merged away.
///
/// # Errors
///
/// Returns [`RepairError::InvalidRatio`] if `ratio_percent` is outside
/// 1 to 100.
pub fn merge_bones_by_ratio(
    rig: &mut Rig,
    cluster: &BoneCluster,
    ratio_percent: u32,
    policy: WeightMixPolicy,
) -> RepairResult<usize> {
    if !(1..=100).contains(&ratio_percent) {
        return Err(RepairError::InvalidRatio {
            ratio: ratio_percent,
        });
    }

    let mut merged = 0;
    for member in &cluster.members {
        let Some(anchor) = rig.skeleton.index_of(member) else {
            continue;
        };
        for child in rig.skeleton.children_of(anchor) {
            merged += merge_walk(rig, child, ratio_percent, ratio_percent, policy);
        }
    }
    debug!(
        cluster = %cluster.prototype,
        ratio_percent,
        merged,
        "thinned bone chains"
    );
    Ok(merged)
}

fn merge_walk(
    rig: &mut Rig,
    index: BoneIndex,
    ratio: u32,
    mut accumulator: u32,
    policy: WeightMixPolicy,
) -> usize {
    accumulator += ratio;
    // Children move to the parent on removal; snapshot them first.
    let children = rig.skeleton.children_of(index);
    let mut merged = 0;

    if accumulator >= 100 {
        accumulator -= 100;
        let bone = rig.skeleton.bone(index).map(|b| (b.name.clone(), b.parent));
        if let Some((name, Some(parent_index))) = bone {
            if let Some(parent_name) = rig.skeleton.bone(parent_index).map(|b| b.name.clone()) {
                mix_weights_all(rig, &name, &parent_name, policy);
                rig.skeleton.remove(index);
                merged += 1;
            }
        }
    }

    for child in children {
        merged += merge_walk(rig, child, ratio, accumulator, policy);
    }
    merged
}

/// Creates a shared root bone above a cluster of sibling bones.
///
/// The root is named `RootBone_` plus the first member's name, takes the
/// first member's parent (and that parent's head and tail position), and
/// becomes the parent of every member still present. Parentless clusters
/// get a root sitting at the first member's head instead.
///
/// Cluster caches do not see the new bone; callers holding a
/// [`rig_naming::ClusterCache`] should invalidate it afterwards.
///
/// # Returns
///
/// The new root bone's name, for threading into later cleanup passes that
/// must not delete it while it is still unweighted.
///
/// # Errors
///
/// Returns [`RepairError::EmptyCluster`] for a memberless cluster,
/// [`RepairError::MissingBone`] if the first member is gone, and a
/// duplicate-name error if the root already exists.
pub fn attach_cluster_root(
    skeleton: &mut Skeleton,
    cluster: &BoneCluster,
) -> RepairResult<String> {
    let Some(first) = cluster.members.first() else {
        return Err(RepairError::EmptyCluster);
    };
    let Some(first_bone) = skeleton.get(first) else {
        return Err(RepairError::missing(first));
    };
    let anchor_parent = first_bone.parent;
    let first_head = first_bone.head;

    let root_name = format!("RootBone_{first}");
    let (head, tail) = match anchor_parent.and_then(|i| skeleton.bone(i)) {
        Some(parent) => (parent.head, parent.tail),
        None => {
            let mut tail = first_head;
            tail.z += 0.1;
            (first_head, tail)
        }
    };

    let mut root = Bone::with_positions(&root_name, head, tail);
    root.parent = anchor_parent;
    let root_index = skeleton.add_bone(root)?;

    let mut gathered = 0;
    for member in &cluster.members {
        if let Some(index) = skeleton.index_of(member) {
            skeleton.set_parent(index, Some(root_index))?;
            gathered += 1;
        }
    }
    debug!(root = %root_name, gathered, "attached cluster root");
    Ok(root_name)
}
