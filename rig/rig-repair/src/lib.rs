//! Rig repair: canonical names, canonical hierarchy, clean weights.
//!
//! Imported avatar rigs arrive with vendor bone names, tangled parenting,
//! junk helper bones, and weights spread over groups nothing uses. This
//! crate rewrites such a rig in place until it matches the canonical
//! humanoid layout that [`rig_naming::BoneTable`] describes, without ever
//! dropping vertex weight: every deleted bone folds its weights into its
//! parent first.
//!
//! [`normalize_rig`] is the full pipeline; the pieces are public for
//! callers that need a single pass:
//!
//! - [`canonicalize_bone_names`] renames bones and their vertex groups.
//! - [`apply_canonical_parenting`] rewires parents from the table.
//! - [`remove_junk_bones`], [`remove_zero_weight_bones`], and
//!   [`remove_unused_groups`] clean up, folding weights as they go.
//! - [`connect_chains`] and friends fix bone positions.
//! - [`merge_bones_by_ratio`] and [`attach_cluster_root`] thin and root
//!   the accessory-bone clusters found by [`rig_naming`].
//! - [`split_legs`] / [`unsplit_legs`] toggle the full body tracking
//!   leg layout.
//!
//! # Example
//!
//! ```
//! use rig_naming::BoneTable;
//! use rig_repair::{normalize_rig, RepairOptions};
//! use rig_types::{Bone, Rig, Skeleton};
//!
//! let mut skeleton = Skeleton::new("model");
//! skeleton.add_bone(Bone::new("LowerBody"))?;
//! let mut rig = Rig::new(skeleton);
//!
//! let report = normalize_rig(&mut rig, &BoneTable::builtin(), &RepairOptions::new())?;
//! assert!(rig.skeleton.contains("Hips"));
//! assert_eq!(report.alias_renames(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod chain;
mod cleanup;
mod error;
mod geometry;
mod hierarchy;
mod meshes;
mod rename;
mod report;
mod tracking;
mod weights;

pub use chain::{attach_cluster_root, merge_bones_by_ratio};
pub use cleanup::{apply_reweight_rules, remove_junk_bones, remove_zero_weight_bones};
pub use error::{RepairError, RepairResult};
pub use geometry::{
    align_hips, connect_chains, connect_orphan_tails, fix_zero_length_bones, synthesize_chest,
};
pub use hierarchy::{
    apply_canonical_parenting, check_hierarchy, make_hips_root, HierarchyIssue, HierarchyReport,
};
pub use meshes::{clean_shape_keys, join_meshes};
pub use rename::{canonicalize_bone_names, rename_bone_and_groups, RenamedBone};
pub use report::RepairReport;
pub use tracking::{split_legs, unsplit_legs};
pub use weights::{
    mix_weights, mix_weights_all, normalize_vertex_weights, remove_unused_groups, WeightMixPolicy,
};

use rig_naming::BoneTable;
use rig_types::Rig;
use tracing::info;

/// Tuning for [`normalize_rig`] and [`rename_and_reparent`].
#[derive(Debug, Clone)]
pub struct RepairOptions {
    /// Fold all meshes into one body mesh before renaming.
    pub join_meshes: bool,
    /// Keep unweighted leaf bones that cap a chain.
    pub keep_end_bones: bool,
    /// Canonicalize long torso chains to `Spine`/`Chest`/`Upper Chest`
    /// instead of folding everything above the chest away.
    pub keep_upper_chest: bool,
    /// Point single-child bones at their child after the repair.
    pub connect_bones: bool,
    /// Delete bones no vertex is weighted to.
    pub remove_zero_weight: bool,
    /// How folded weights combine with existing ones.
    pub weight_policy: WeightMixPolicy,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            join_meshes: true,
            keep_end_bones: false,
            keep_upper_chest: false,
            connect_bones: true,
            remove_zero_weight: true,
            weight_policy: WeightMixPolicy::Additive,
        }
    }
}

impl RepairOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether meshes are joined into one body mesh.
    #[must_use]
    pub fn with_join_meshes(mut self, join: bool) -> Self {
        self.join_meshes = join;
        self
    }

    /// Sets whether unweighted chain-end bones survive cleanup.
    #[must_use]
    pub fn with_keep_end_bones(mut self, keep: bool) -> Self {
        self.keep_end_bones = keep;
        self
    }

    /// Sets whether an `Upper Chest` bone is kept in long torso chains.
    #[must_use]
    pub fn with_keep_upper_chest(mut self, keep: bool) -> Self {
        self.keep_upper_chest = keep;
        self
    }

    /// Sets whether single-child bones get pointed at their child.
    #[must_use]
    pub fn with_connect_bones(mut self, connect: bool) -> Self {
        self.connect_bones = connect;
        self
    }

    /// Sets whether zero-weight bones are deleted.
    #[must_use]
    pub fn with_remove_zero_weight(mut self, remove: bool) -> Self {
        self.remove_zero_weight = remove;
        self
    }

    /// Sets the weight mixing policy for every fold in the pipeline.
    #[must_use]
    pub fn with_weight_policy(mut self, policy: WeightMixPolicy) -> Self {
        self.weight_policy = policy;
        self
    }
}

/// Renames every recognized bone and rewires the canonical hierarchy.
///
/// Runs the three table-driven passes in order: canonicalize names
/// (vertex groups follow their bones), apply the parenting table, then
/// fold junk bones into their parents. Renaming finishes for the whole
/// skeleton before any reparenting starts, since the parenting table
/// keys off canonical names. Ends with a hierarchy check; an incomplete
/// rig shows up in the report rather than as an error.
///
/// # Errors
///
/// Propagates skeleton bookkeeping failures; an incomplete hierarchy is
/// not an error.
pub fn rename_and_reparent(
    rig: &mut Rig,
    table: &BoneTable,
    options: &RepairOptions,
) -> RepairResult<RepairReport> {
    let mut report = RepairReport {
        renames: canonicalize_bone_names(rig, table, options.keep_upper_chest, options.weight_policy)?,
        ..RepairReport::default()
    };
    report.reparented = apply_canonical_parenting(&mut rig.skeleton, table)?;
    report.junk_removed = remove_junk_bones(rig, table, options.weight_policy);
    report.hierarchy = check_hierarchy(&rig.skeleton);
    Ok(report)
}

/// Repairs a rig end to end.
///
/// The passes run in dependency order: meshes join first so later weight
/// folds see one body, names canonicalize before anything keys off them,
/// structural fixes (hips root, chest synthesis, parenting) come next,
/// then the weight cleanups, and finally the position fixes that expect
/// final names and parents. The closing hierarchy check lands in the
/// report; missing chains are the caller's call to accept or reject.
///
/// # Arguments
///
/// * `rig` - Skeleton and meshes, repaired in place.
/// * `table` - Alias, parenting, junk, and reweight tables.
/// * `options` - Pipeline tuning, see [`RepairOptions`].
///
/// # Returns
///
/// A [`RepairReport`] of every change made.
///
/// # Errors
///
/// Propagates skeleton bookkeeping failures. An incomplete hierarchy is
/// reported, not raised.
pub fn normalize_rig(
    rig: &mut Rig,
    table: &BoneTable,
    options: &RepairOptions,
) -> RepairResult<RepairReport> {
    let mut report = RepairReport::default();
    rig.skeleton.name = "Armature".to_string();

    if options.join_meshes {
        report.meshes_joined = join_meshes(rig);
    }
    for mesh in &mut rig.meshes {
        report.shape_keys_removed += clean_shape_keys(mesh);
    }

    report.renames =
        canonicalize_bone_names(rig, table, options.keep_upper_chest, options.weight_policy)?;
    report.junk_removed = remove_junk_bones(rig, table, options.weight_policy);

    make_hips_root(&mut rig.skeleton)?;
    synthesize_chest(&mut rig.skeleton);
    align_hips(&mut rig.skeleton);
    report.reparented = apply_canonical_parenting(&mut rig.skeleton, table)?;

    report.reweighted = apply_reweight_rules(rig, table, options.weight_policy);
    report.unused_groups_removed = remove_unused_groups(rig, table, false);
    if options.remove_zero_weight {
        report.zero_weight_removed =
            remove_zero_weight_bones(rig, table, options.keep_end_bones, None);
    }

    report.tails_connected = connect_chains(&mut rig.skeleton);
    report.zero_length_fixed = fix_zero_length_bones(&mut rig.skeleton);
    if options.connect_bones {
        report.tails_connected += connect_orphan_tails(&mut rig.skeleton);
    }

    report.hierarchy = check_hierarchy(&rig.skeleton);
    info!(
        renames = report.renames.len(),
        junk_removed = report.junk_removed,
        zero_weight_removed = report.zero_weight_removed,
        hierarchy_issues = report.hierarchy.issues.len(),
        "rig normalization complete"
    );
    Ok(report)
}
