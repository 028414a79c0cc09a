//! Skeleton merging: graft one rig onto another.
//!
//! A finished avatar is rarely one export. Hair, clothes, and props come
//! as separate rigs that must end up inside the model's armature.
//! [`merge_rigs`] grafts a whole rig onto a base, pairing bones by name
//! for humanoid parts and hanging everything else under a chosen
//! attachment bone. [`attach_mesh`] does the same for a bare mesh with
//! no skeleton of its own.
//!
//! Merge-rig bones are namespaced with [`MERGE_SUFFIX`] while both
//! skeletons share one arena, then folded into their base counterparts:
//! weights mix into the surviving vertex groups before the duplicate
//! bones are deleted, so no vertex stops following the model.
//!
//! # Example
//!
//! ```
//! use rig_merge::{merge_rigs, MergeParams};
//! use rig_naming::BoneTable;
//! use rig_types::{Bone, Rig, Skeleton};
//!
//! let mut skeleton = Skeleton::new("base");
//! skeleton.add_bone(Bone::new("Hips"))?;
//! let mut base = Rig::new(skeleton);
//!
//! let mut extra = Skeleton::new("hair");
//! extra.add_bone(Bone::new("Hips"))?;
//! let mut hair = Rig::new(extra);
//!
//! let report = merge_rigs(&mut base, &mut hair, &BoneTable::builtin(), &MergeParams::new())?;
//! assert_eq!(report.bones_merged, 1);
//! assert!(!base.skeleton.contains("Hips.merge"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod attach;
mod error;
mod merge;
mod report;

pub use attach::attach_mesh;
pub use error::{MergeError, MergeResult};
pub use merge::merge_rigs;
pub use report::{GraftKind, MergeReport};
pub use rig_repair::WeightMixPolicy;

/// Largest per-axis rotation, in radians, that still counts as "not
/// rotated" when deciding whether a transform can fold into the merge
/// armature. About 0.005 degrees.
pub const ROTATION_TOLERANCE: f64 = 0.000_087_266_47;

/// Suffix namespacing merge-rig bones while both skeletons share one
/// arena.
pub const MERGE_SUFFIX: &str = ".merge";

/// Tuning for [`merge_rigs`] and [`attach_mesh`].
#[derive(Debug, Clone)]
pub struct MergeParams {
    /// Fold each side's meshes into one before merging, and the combined
    /// set into one body afterwards.
    pub join_meshes: bool,
    /// Bake the merge rig's object transform outright instead of folding
    /// a lone mesh's transform into it.
    pub apply_transforms: bool,
    /// Pair every shared bone name, not just the humanoid set.
    pub merge_matching_bones: bool,
    /// Base bone a non-humanoid merge rig hangs under.
    pub attach_to_bone: Option<String>,
    /// Delete bones and groups nothing is weighted to once the merge is
    /// done.
    pub remove_zero_weight: bool,
    /// Largest per-axis rotation, in radians, a foldable transform may
    /// carry.
    pub tolerance: f64,
    /// How folded weights combine with existing ones.
    pub weight_policy: WeightMixPolicy,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            join_meshes: true,
            apply_transforms: false,
            merge_matching_bones: false,
            attach_to_bone: None,
            remove_zero_weight: true,
            tolerance: ROTATION_TOLERANCE,
            weight_policy: WeightMixPolicy::Additive,
        }
    }
}

impl MergeParams {
    /// Creates the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether meshes are joined around the merge.
    #[must_use]
    pub fn with_join_meshes(mut self, join: bool) -> Self {
        self.join_meshes = join;
        self
    }

    /// Sets whether the merge rig's transform is baked outright.
    #[must_use]
    pub fn with_apply_transforms(mut self, apply: bool) -> Self {
        self.apply_transforms = apply;
        self
    }

    /// Sets whether all shared bone names pair up.
    #[must_use]
    pub fn with_merge_matching_bones(mut self, matching: bool) -> Self {
        self.merge_matching_bones = matching;
        self
    }

    /// Sets the base bone a non-humanoid rig hangs under.
    #[must_use]
    pub fn with_attach_to_bone(mut self, bone: impl Into<String>) -> Self {
        self.attach_to_bone = Some(bone.into());
        self
    }

    /// Sets whether zero-weight cleanup runs after the merge.
    #[must_use]
    pub fn with_remove_zero_weight(mut self, remove: bool) -> Self {
        self.remove_zero_weight = remove;
        self
    }

    /// Sets how folded weights combine with existing ones.
    #[must_use]
    pub fn with_weight_policy(mut self, policy: WeightMixPolicy) -> Self {
        self.weight_policy = policy;
        self
    }
}
