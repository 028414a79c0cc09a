//! Bone position fixes: zero-length bones, chain connection, and torso
//! placement.

use rig_types::{Bone, BoneIndex, Point3, Skeleton};
use tracing::debug;

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn same_position(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    round4(a.x) == round4(b.x) && round4(a.y) == round4(b.y) && round4(a.z) == round4(b.z)
}

/// Gives every zero-length bone a small upward tail offset.
///
/// Head and tail are compared per axis at four decimals; degenerate bones
/// get `tail.z += 0.1` so they can carry a rest orientation.
///
/// # Returns
///
/// The number of bones fixed.
pub fn fix_zero_length_bones(skeleton: &mut Skeleton) -> usize {
    let indices: Vec<BoneIndex> = skeleton.bones().map(|(i, _)| i).collect();
    let mut fixed = 0;
    for index in indices {
        if let Some(bone) = skeleton.bone_mut(index) {
            if same_position(&bone.head, &bone.tail) {
                bone.tail.z += 0.1;
                fixed += 1;
            }
        }
    }
    if fixed > 0 {
        debug!(fixed, "fixed zero-length bones");
    }
    fixed
}

fn snap_tail(skeleton: &mut Skeleton, bone: &str, target: &str) -> bool {
    let Some(head) = skeleton.get(target).map(|b| b.head) else {
        return false;
    };
    match skeleton.get_mut(bone) {
        Some(bone) => {
            bone.tail = head;
            true
        }
        None => false,
    }
}

/// Connects the torso, arm, and leg chains tail-to-head.
///
/// The chest points at the neck (through `Upper Chest` when one exists),
/// the neck at the head. Arms snap shoulder→arm→elbow→wrist only when the
/// whole side is present; legs snap leg→knee→ankle, with a tracking stub
/// (`Left leg 2`/`Right leg 2`) taking the leg's role when present.
///
/// # Returns
///
/// The number of tails snapped.
pub fn connect_chains(skeleton: &mut Skeleton) -> usize {
    let mut snapped = 0;
    if skeleton.contains("Chest") && skeleton.contains("Neck") {
        if skeleton.contains("Upper Chest") {
            snapped += usize::from(snap_tail(skeleton, "Chest", "Upper Chest"));
            snapped += usize::from(snap_tail(skeleton, "Upper Chest", "Neck"));
        } else {
            snapped += usize::from(snap_tail(skeleton, "Chest", "Neck"));
        }
    }
    if skeleton.contains("Neck") && skeleton.contains("Head") {
        snapped += usize::from(snap_tail(skeleton, "Neck", "Head"));
    }

    for side in ["Left", "Right"] {
        let shoulder = format!("{side} shoulder");
        let arm = format!("{side} arm");
        let elbow = format!("{side} elbow");
        let wrist = format!("{side} wrist");
        if [&shoulder, &arm, &elbow, &wrist]
            .iter()
            .all(|name| skeleton.contains(name))
        {
            snapped += usize::from(snap_tail(skeleton, &shoulder, &arm));
            snapped += usize::from(snap_tail(skeleton, &arm, &elbow));
            snapped += usize::from(snap_tail(skeleton, &elbow, &wrist));
        }

        let leg = format!("{side} leg");
        let knee = format!("{side} knee");
        let ankle = format!("{side} ankle");
        if [&leg, &knee, &ankle].iter().all(|name| skeleton.contains(name)) {
            let stub = format!("{side} leg 2");
            let leg = if skeleton.contains(&stub) { stub } else { leg };
            snapped += usize::from(snap_tail(skeleton, &leg, &knee));
            snapped += usize::from(snap_tail(skeleton, &knee, &ankle));
        }
    }
    if snapped > 0 {
        debug!(snapped, "connected bone chains");
    }
    snapped
}

/// Points single-child bones at their child's head.
///
/// Eye bones, `Head`, and `Hips` are left alone, as is any pair closer
/// than 5 mm, which would collapse the bone to zero length.
///
/// # Returns
///
/// The number of tails moved.
pub fn connect_orphan_tails(skeleton: &mut Skeleton) -> usize {
    let indices: Vec<BoneIndex> = skeleton.bones().map(|(i, _)| i).collect();
    let mut moved = 0;
    for index in indices {
        let Some(bone) = skeleton.bone(index) else {
            continue;
        };
        if matches!(
            bone.name.as_str(),
            "LeftEye" | "RightEye" | "Eye_L" | "Eye_R" | "Head" | "Hips"
        ) {
            continue;
        }
        let children = skeleton.children_of(index);
        let [child] = children.as_slice() else {
            continue;
        };
        let Some(child_head) = skeleton.bone(*child).map(|b| b.head) else {
            continue;
        };
        let head = bone.head;
        if (child_head - head).norm() > 0.005 {
            if let Some(bone) = skeleton.bone_mut(index) {
                bone.tail = child_head;
                moved += 1;
            }
        }
    }
    if moved > 0 {
        debug!(moved, "pointed single-child bones at their children");
    }
    moved
}

/// Creates a `Chest` bone between `Spine` and `Neck` when it is missing.
///
/// The new bone reaches from halfway up the spine→neck gap to the neck's
/// head; the spine's tail moves up to meet it and the spine's other
/// children move onto the new chest.
///
/// # Returns
///
/// `true` if a chest was created.
pub fn synthesize_chest(skeleton: &mut Skeleton) -> bool {
    if skeleton.contains("Chest") || !skeleton.contains("Spine") || !skeleton.contains("Neck") {
        return false;
    }
    let (Some(spine_index), Some(spine), Some(neck)) = (
        skeleton.index_of("Spine"),
        skeleton.get("Spine").cloned(),
        skeleton.get("Neck").cloned(),
    ) else {
        return false;
    };

    let mut head = spine.head;
    head.z = spine.head.z + (neck.head.z - spine.head.z) / 2.0;
    head.y = spine.head.y + (neck.head.y - spine.head.y) / 2.0;

    let mut chest = Bone::with_positions("Chest", head, neck.head);
    chest.parent = Some(spine_index);
    let Ok(chest_index) = skeleton.add_bone(chest) else {
        return false;
    };

    if let Some(spine) = skeleton.get_mut("Spine") {
        spine.tail = head;
    }
    for child in skeleton.children_of(spine_index) {
        if child != chest_index {
            // Cannot cycle: the chest has no descendants yet.
            let _ = skeleton.set_parent(child, Some(chest_index));
        }
    }
    debug!("created missing chest bone");
    true
}

/// Straightens `Hips` against the leg line.
///
/// The legs' heads are brought onto one Y line, the hips head and tail
/// follow it, and the bone is stood upright at its own length starting
/// from the legs' height. Requires `Hips` and both legs.
///
/// # Returns
///
/// `true` if the hips were adjusted.
pub fn align_hips(skeleton: &mut Skeleton) -> bool {
    if !(skeleton.contains("Hips")
        && skeleton.contains("Left leg")
        && skeleton.contains("Right leg"))
    {
        return false;
    }
    let Some(right_head) = skeleton.get("Right leg").map(|b| b.head) else {
        return false;
    };
    if let Some(left) = skeleton.get_mut("Left leg") {
        left.head.y = right_head.y;
    }
    if let Some(hips) = skeleton.get_mut("Hips") {
        hips.head.y = right_head.y;
        hips.tail.y = right_head.y;
        let length = (hips.tail.z - hips.head.z).abs();
        hips.head.z = right_head.z;
        hips.tail.z = hips.head.z + length;
    }
    true
}
