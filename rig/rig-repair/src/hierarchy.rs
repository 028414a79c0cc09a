//! Canonical parenting and hierarchy validation.

use std::fmt;

use rig_naming::BoneTable;
use rig_types::{RigError, Skeleton};
use tracing::debug;

use crate::error::RepairResult;

/// Applies the table's child→parent edges to the skeleton.
///
/// Each pair is applied only when both bones exist; pairs that would form
/// a cycle in an unusual rig are skipped rather than applied half-way.
/// When an `Upper Chest` bone is present it is slotted in between `Chest`
/// and `Neck` after the table pass.
///
/// # Returns
///
/// The number of edges applied.
///
/// # Errors
///
/// Propagates arena failures other than rejected cycles.
pub fn apply_canonical_parenting(
    skeleton: &mut Skeleton,
    table: &BoneTable,
) -> RepairResult<usize> {
    let mut applied = 0;
    let connect = |skeleton: &mut Skeleton, child: &str, parent: &str| -> RepairResult<bool> {
        let (Some(child_index), Some(parent_index)) =
            (skeleton.index_of(child), skeleton.index_of(parent))
        else {
            return Ok(false);
        };
        match skeleton.set_parent(child_index, Some(parent_index)) {
            Ok(()) => Ok(true),
            Err(RigError::ParentCycle { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    };
    for (child, parent) in &table.parenting {
        if connect(skeleton, child, parent)? {
            applied += 1;
        }
    }
    if skeleton.contains("Upper Chest") {
        if connect(skeleton, "Upper Chest", "Chest")? {
            applied += 1;
        }
        if connect(skeleton, "Neck", "Upper Chest")? {
            applied += 1;
        }
    }
    debug!(applied, "applied canonical parenting");
    Ok(applied)
}

/// Clears `Hips`' parent and hangs every other root bone under it.
///
/// # Returns
///
/// `false` when the skeleton has no `Hips` bone.
///
/// # Errors
///
/// Propagates arena failures.
pub fn make_hips_root(skeleton: &mut Skeleton) -> RepairResult<bool> {
    let Some(hips) = skeleton.index_of("Hips") else {
        return Ok(false);
    };
    skeleton.set_parent(hips, None)?;
    for root in skeleton.roots() {
        if root != hips {
            skeleton.set_parent(root, Some(hips))?;
        }
    }
    Ok(true)
}

/// One defect found while validating the canonical chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyIssue {
    /// A canonical chain bone is absent from the skeleton.
    MissingBone {
        /// The absent bone.
        name: String,
    },
    /// A chain bone has no parent at all.
    Unparented {
        /// The floating bone.
        name: String,
    },
    /// A chain bone is parented outside its chain.
    WrongParent {
        /// The misparented bone.
        name: String,
        /// The parent the chain calls for.
        expected: String,
        /// The parent it actually has.
        actual: String,
    },
}

impl fmt::Display for HierarchyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBone { name } => write!(f, "{name} was not found in the hierarchy"),
            Self::Unparented { name } => write!(f, "{name} is not parented at all"),
            Self::WrongParent {
                name,
                expected,
                actual,
            } => write!(f, "{name} is parented to {actual} instead of {expected}"),
        }
    }
}

/// Everything wrong with the canonical chains of a skeleton.
///
/// An imperfect hierarchy is reported, not raised: incomplete rigs are
/// common and callers decide whether to proceed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyReport {
    /// All defects found, chain by chain, without duplicates.
    pub issues: Vec<HierarchyIssue>,
}

impl HierarchyReport {
    /// Returns `true` when every chain is complete and correctly linked.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for HierarchyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "hierarchy is complete");
        }
        writeln!(f, "{} hierarchy issue(s):", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  - {issue}")?;
        }
        Ok(())
    }
}

/// Validates the five canonical bone chains.
///
/// Checked chains: torso (`Hips` through `Head`, with `Upper Chest`
/// inserted when present), both legs down to the ankles, and both arms
/// from `Chest` down to the wrists. Every missing bone and broken link is
/// collected; the first bone of each chain is not parent-checked.
#[must_use]
pub fn check_hierarchy(skeleton: &Skeleton) -> HierarchyReport {
    let torso: &[&str] = if skeleton.contains("Upper Chest") {
        &["Hips", "Spine", "Chest", "Upper Chest", "Neck", "Head"]
    } else {
        &["Hips", "Spine", "Chest", "Neck", "Head"]
    };
    let chains: [&[&str]; 5] = [
        torso,
        &["Hips", "Left leg", "Left knee", "Left ankle"],
        &["Hips", "Right leg", "Right knee", "Right ankle"],
        &["Chest", "Left shoulder", "Left arm", "Left elbow", "Left wrist"],
        &["Chest", "Right shoulder", "Right arm", "Right elbow", "Right wrist"],
    ];

    let mut issues: Vec<HierarchyIssue> = Vec::new();
    let push = |issues: &mut Vec<HierarchyIssue>, issue: HierarchyIssue| {
        if !issues.contains(&issue) {
            issues.push(issue);
        }
    };
    for chain in chains {
        for (i, name) in chain.iter().enumerate() {
            let Some(bone) = skeleton.get(name) else {
                push(
                    &mut issues,
                    HierarchyIssue::MissingBone {
                        name: (*name).to_string(),
                    },
                );
                continue;
            };
            if i == 0 {
                continue;
            }
            let expected = chain[i - 1];
            match bone.parent.and_then(|p| skeleton.bone(p)) {
                None => push(
                    &mut issues,
                    HierarchyIssue::Unparented {
                        name: (*name).to_string(),
                    },
                ),
                Some(parent) if parent.name != expected => push(
                    &mut issues,
                    HierarchyIssue::WrongParent {
                        name: (*name).to_string(),
                        expected: expected.to_string(),
                        actual: parent.name.clone(),
                    },
                ),
                Some(_) => {}
            }
        }
    }
    HierarchyReport { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_types::Bone;

    fn skeleton_with(bones: &[(&str, Option<&str>)]) -> Skeleton {
        let mut skeleton = Skeleton::new("Armature");
        for (name, parent) in bones {
            let mut bone = Bone::new(*name);
            bone.parent = parent.and_then(|p| skeleton.index_of(p));
            skeleton.add_bone(bone).unwrap();
        }
        skeleton
    }

    fn full_humanoid() -> Skeleton {
        skeleton_with(&[
            ("Hips", None),
            ("Spine", Some("Hips")),
            ("Chest", Some("Spine")),
            ("Neck", Some("Chest")),
            ("Head", Some("Neck")),
            ("Left leg", Some("Hips")),
            ("Left knee", Some("Left leg")),
            ("Left ankle", Some("Left knee")),
            ("Right leg", Some("Hips")),
            ("Right knee", Some("Right leg")),
            ("Right ankle", Some("Right knee")),
            ("Left shoulder", Some("Chest")),
            ("Left arm", Some("Left shoulder")),
            ("Left elbow", Some("Left arm")),
            ("Left wrist", Some("Left elbow")),
            ("Right shoulder", Some("Chest")),
            ("Right arm", Some("Right shoulder")),
            ("Right elbow", Some("Right arm")),
            ("Right wrist", Some("Right elbow")),
        ])
    }

    #[test]
    fn parenting_applies_only_existing_pairs() {
        let mut skeleton = skeleton_with(&[
            ("Hips", None),
            ("Spine", None),
            ("Left leg", None),
        ]);
        let table = BoneTable::builtin();
        let applied = apply_canonical_parenting(&mut skeleton, &table).unwrap();

        assert!(applied >= 2);
        let hips = skeleton.index_of("Hips").unwrap();
        assert_eq!(skeleton.get("Spine").unwrap().parent, Some(hips));
        assert_eq!(skeleton.get("Left leg").unwrap().parent, Some(hips));
    }

    #[test]
    fn upper_chest_slots_between_chest_and_neck() {
        let mut skeleton = skeleton_with(&[
            ("Hips", None),
            ("Spine", Some("Hips")),
            ("Chest", Some("Spine")),
            ("Upper Chest", Some("Spine")),
            ("Neck", Some("Chest")),
            ("Head", Some("Neck")),
        ]);
        let table = BoneTable::builtin();
        apply_canonical_parenting(&mut skeleton, &table).unwrap();

        let chest = skeleton.index_of("Chest").unwrap();
        let upper = skeleton.index_of("Upper Chest").unwrap();
        assert_eq!(skeleton.get("Upper Chest").unwrap().parent, Some(chest));
        assert_eq!(skeleton.get("Neck").unwrap().parent, Some(upper));
    }

    #[test]
    fn hips_becomes_sole_root() {
        let mut skeleton = skeleton_with(&[
            ("Extra", None),
            ("Hips", Some("Extra")),
            ("Prop", None),
        ]);
        assert!(make_hips_root(&mut skeleton).unwrap());

        let hips = skeleton.index_of("Hips").unwrap();
        assert_eq!(skeleton.get("Hips").unwrap().parent, None);
        assert_eq!(skeleton.get("Extra").unwrap().parent, Some(hips));
        assert_eq!(skeleton.get("Prop").unwrap().parent, Some(hips));
        assert_eq!(skeleton.roots(), vec![hips]);
    }

    #[test]
    fn complete_skeleton_validates() {
        let report = check_hierarchy(&full_humanoid());
        assert!(report.is_valid());
        assert_eq!(format!("{report}"), "hierarchy is complete");
    }

    #[test]
    fn missing_and_misparented_bones_all_reported() {
        let skeleton = skeleton_with(&[
            ("Hips", None),
            ("Spine", Some("Hips")),
            ("Chest", Some("Hips")),
            ("Neck", Some("Chest")),
            ("Head", None),
        ]);
        let report = check_hierarchy(&skeleton);

        assert!(!report.is_valid());
        assert!(report.issues.contains(&HierarchyIssue::WrongParent {
            name: "Chest".into(),
            expected: "Spine".into(),
            actual: "Hips".into(),
        }));
        assert!(report.issues.contains(&HierarchyIssue::Unparented {
            name: "Head".into()
        }));
        assert!(report.issues.contains(&HierarchyIssue::MissingBone {
            name: "Left leg".into()
        }));
        // Limbs missing from both sides appear once per bone, not once
        // per chain.
        let missing_left_leg = report
            .issues
            .iter()
            .filter(|i| matches!(i, HierarchyIssue::MissingBone { name } if name == "Left leg"))
            .count();
        assert_eq!(missing_left_leg, 1);
    }

    #[test]
    fn upper_chest_chain_checked_when_present() {
        let mut skeleton = full_humanoid();
        let chest = skeleton.index_of("Chest").unwrap();
        let mut upper = Bone::new("Upper Chest");
        upper.parent = Some(chest);
        let upper = skeleton.add_bone(upper).unwrap();
        let report = check_hierarchy(&skeleton);
        // Neck still points at Chest, which is now wrong.
        assert!(report.issues.contains(&HierarchyIssue::WrongParent {
            name: "Neck".into(),
            expected: "Upper Chest".into(),
            actual: "Chest".into(),
        }));

        let neck = skeleton.index_of("Neck").unwrap();
        skeleton.set_parent(neck, Some(upper)).unwrap();
        assert!(check_hierarchy(&skeleton).is_valid());
    }
}
