//! Leg splitting for full body tracking.
//!
//! Full body tracking setups want the hips pointing down at the legs and a
//! second set of leg bones so trackers can drive the upper legs separately.
//! [`split_legs`] rebuilds the hip area that way; [`unsplit_legs`] restores
//! the conventional upright layout.

use rig_types::{Bone, Skeleton};
use tracing::debug;

use crate::error::{RepairError, RepairResult};

const STUB_NAMES: [&str; 4] = ["Left leg 2", "Right leg 2", "Left_Leg_2", "Right_Leg_2"];

fn require(skeleton: &Skeleton, name: &str) -> RepairResult<()> {
    if skeleton.contains(name) {
        Ok(())
    } else {
        Err(RepairError::missing(name))
    }
}

fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

fn is_degenerate(bone: &Bone) -> bool {
    round5(bone.head.x) == round5(bone.tail.x)
        && round5(bone.head.y) == round5(bone.tail.y)
        && round5(bone.head.z) == round5(bone.tail.z)
}

/// Splits the legs for full body tracking.
///
/// The hips collapse onto the spine's head and point down to the legs'
/// height. Each leg gets a `<side> leg 2` stub at the leg's old position,
/// parented under it, while the leg itself shrinks to a short upright
/// bone. Weights are untouched; the stubs exist for trackers, not skin.
///
/// # Errors
///
/// Returns [`RepairError::MissingBone`] unless `Hips`, `Spine`, and both
/// legs are present, and [`RepairError::LegsAlreadySplit`] if any stub
/// bone already exists.
pub fn split_legs(skeleton: &mut Skeleton) -> RepairResult<()> {
    for name in ["Hips", "Spine", "Left leg", "Right leg"] {
        require(skeleton, name)?;
    }
    if STUB_NAMES.iter().any(|name| skeleton.contains(name)) {
        return Err(RepairError::LegsAlreadySplit);
    }

    let spine_head = skeleton.get("Spine").map(|b| b.head);
    let left_leg_head = skeleton.get("Left leg").map(|b| b.head);
    let (Some(spine_head), Some(left_leg_head)) = (spine_head, left_leg_head) else {
        return Err(RepairError::missing("Spine"));
    };

    // Flip the hips to point down at the legs.
    if let Some(hips) = skeleton.get_mut("Hips") {
        hips.head = spine_head;
        hips.tail = spine_head;
        hips.tail.z = left_leg_head.z;
        if hips.tail.z > hips.head.z {
            hips.tail.z -= 0.1;
        }
    }

    for side in ["Left", "Right"] {
        let leg_name = format!("{side} leg");
        let Some(leg_index) = skeleton.index_of(&leg_name) else {
            continue;
        };
        let Some((head, tail)) = skeleton.bone(leg_index).map(|b| (b.head, b.tail)) else {
            continue;
        };

        let mut stub = Bone::with_positions(format!("{side} leg 2"), head, tail);
        stub.parent = Some(leg_index);
        skeleton.add_bone(stub)?;

        // The old leg becomes a short upright bone at its own head.
        if let Some(leg) = skeleton.bone_mut(leg_index) {
            leg.tail = leg.head;
            leg.tail.z = leg.head.z + 0.1;
        }
    }

    fix_degenerate_bones(skeleton, true);
    debug!("split legs for full body tracking");
    Ok(())
}

/// Undoes [`split_legs`], restoring an upright hip bone.
///
/// The legs take their stubs' positions back and the stubs are removed.
/// Downward-pointing hips are re-centered between the legs, a third of
/// the way up to the spine, and stood upright.
///
/// # Errors
///
/// Returns [`RepairError::MissingBone`] unless `Hips`, `Spine`, and both
/// legs are present, and [`RepairError::LegsNotSplit`] if the stub bones
/// are absent.
pub fn unsplit_legs(skeleton: &mut Skeleton) -> RepairResult<()> {
    for name in ["Hips", "Spine", "Left leg", "Right leg"] {
        require(skeleton, name)?;
    }
    if !(skeleton.contains("Left leg 2") && skeleton.contains("Right leg 2")) {
        return Err(RepairError::LegsNotSplit);
    }

    let spine_head = skeleton.get("Spine").map(|b| b.head);
    let left_leg_head = skeleton.get("Left leg").map(|b| b.head);
    let right_leg_head = skeleton.get("Right leg").map(|b| b.head);
    let (Some(spine_head), Some(left_leg_head), Some(right_leg_head)) =
        (spine_head, left_leg_head, right_leg_head)
    else {
        return Err(RepairError::missing("Spine"));
    };

    if let Some(hips) = skeleton.get_mut("Hips") {
        if hips.head.z > hips.tail.z {
            hips.head.x = (right_leg_head.x + left_leg_head.x) / 2.0;
            hips.head.z = left_leg_head.z + (spine_head.z - left_leg_head.z) * 0.33;
            if hips.head.z <= right_leg_head.z {
                hips.head.z = right_leg_head.z + 0.1;
            }
            hips.tail.x = hips.head.x;
            hips.tail.y = hips.head.y;
            hips.tail.z = spine_head.z;
            if hips.tail.z < hips.head.z {
                hips.tail.z += 0.1;
            }
        }
    }

    for side in ["Left", "Right"] {
        let stub_name = format!("{side} leg 2");
        let Some(stub_index) = skeleton.index_of(&stub_name) else {
            continue;
        };
        let Some((head, tail)) = skeleton.bone(stub_index).map(|b| (b.head, b.tail)) else {
            continue;
        };
        if let Some(leg) = skeleton.get_mut(&format!("{side} leg")) {
            leg.head = head;
            leg.tail = tail;
        }
        skeleton.remove(stub_index);
    }

    fix_degenerate_bones(skeleton, false);
    debug!("restored legs from full body tracking split");
    Ok(())
}

// Rounds to five decimals per axis; the hips flip down when splitting,
// every other degenerate bone points up.
fn fix_degenerate_bones(skeleton: &mut Skeleton, hips_point_down: bool) {
    let indices: Vec<_> = skeleton.bones().map(|(i, _)| i).collect();
    for index in indices {
        if let Some(bone) = skeleton.bone_mut(index) {
            if is_degenerate(bone) {
                if hips_point_down && bone.name == "Hips" {
                    bone.tail.z -= 0.1;
                } else {
                    bone.tail.z += 0.1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rig_types::Point3;

    fn lower_body() -> Skeleton {
        let mut skeleton = Skeleton::new("Armature");
        let hips = skeleton
            .add_bone(Bone::with_positions(
                "Hips",
                Point3::new(0.0, 0.0, 0.85),
                Point3::new(0.0, 0.0, 1.0),
            ))
            .unwrap();
        let mut spine = Bone::with_positions(
            "Spine",
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.2),
        );
        spine.parent = Some(hips);
        skeleton.add_bone(spine).unwrap();
        for (name, x) in [("Left leg", 0.1), ("Right leg", -0.1)] {
            let mut leg = Bone::with_positions(
                name,
                Point3::new(x, 0.0, 0.8),
                Point3::new(x, 0.0, 0.4),
            );
            leg.parent = Some(hips);
            skeleton.add_bone(leg).unwrap();
        }
        skeleton
    }

    #[test]
    fn split_flips_hips_and_adds_stubs() {
        let mut skeleton = lower_body();
        split_legs(&mut skeleton).unwrap();

        let hips = skeleton.get("Hips").unwrap();
        assert_eq!(hips.head, Point3::new(0.0, 0.0, 1.0));
        // Tail dropped to the legs' height, pointing down.
        assert_relative_eq!(hips.tail.z, 0.8);

        let stub = skeleton.get("Left leg 2").unwrap();
        assert_eq!(stub.head, Point3::new(0.1, 0.0, 0.8));
        assert_eq!(stub.tail, Point3::new(0.1, 0.0, 0.4));
        assert_eq!(stub.parent, skeleton.index_of("Left leg"));

        let leg = skeleton.get("Left leg").unwrap();
        assert_eq!(leg.head, Point3::new(0.1, 0.0, 0.8));
        assert_relative_eq!(leg.tail.z, 0.9);
    }

    #[test]
    fn split_requires_the_lower_body() {
        let mut skeleton = Skeleton::new("Armature");
        skeleton.add_bone(Bone::new("Hips")).unwrap();
        let err = split_legs(&mut skeleton).unwrap_err();
        assert!(matches!(err, RepairError::MissingBone { .. }));
    }

    #[test]
    fn split_refuses_to_run_twice() {
        let mut skeleton = lower_body();
        split_legs(&mut skeleton).unwrap();
        let err = split_legs(&mut skeleton).unwrap_err();
        assert!(matches!(err, RepairError::LegsAlreadySplit));
    }

    #[test]
    fn underscore_stub_names_also_count_as_split() {
        let mut skeleton = lower_body();
        skeleton.add_bone(Bone::new("Left_Leg_2")).unwrap();
        let err = split_legs(&mut skeleton).unwrap_err();
        assert!(matches!(err, RepairError::LegsAlreadySplit));
    }

    #[test]
    fn unsplit_restores_legs_and_uprights_hips() {
        let mut skeleton = lower_body();
        split_legs(&mut skeleton).unwrap();
        unsplit_legs(&mut skeleton).unwrap();

        assert!(!skeleton.contains("Left leg 2"));
        assert!(!skeleton.contains("Right leg 2"));

        let leg = skeleton.get("Left leg").unwrap();
        assert_eq!(leg.head, Point3::new(0.1, 0.0, 0.8));
        assert_eq!(leg.tail, Point3::new(0.1, 0.0, 0.4));

        let hips = skeleton.get("Hips").unwrap();
        assert_relative_eq!(hips.head.x, 0.0);
        // A third of the way from the legs up to the spine.
        assert_relative_eq!(hips.head.z, 0.8 + 0.2 * 0.33);
        assert_eq!(hips.tail, Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn unsplit_without_split_is_an_error() {
        let mut skeleton = lower_body();
        let err = unsplit_legs(&mut skeleton).unwrap_err();
        assert!(matches!(err, RepairError::LegsNotSplit));
    }
}
