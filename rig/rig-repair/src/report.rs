//! Summary of what a repair pass did to a rig.

use std::fmt;

use rig_naming::MatchKind;

use crate::hierarchy::HierarchyReport;
use crate::rename::RenamedBone;

/// Everything a repair pass changed, for display to the user.
///
/// Counts default to zero; entry points fill in the fields for the work
/// they actually perform.
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    /// Every bone rename, with how the new name was found.
    pub renames: Vec<RenamedBone>,
    /// Meshes folded into the primary body mesh.
    pub meshes_joined: usize,
    /// Shape keys dropped as duplicates of the basis or MMD leftovers.
    pub shape_keys_removed: usize,
    /// Junk bones deleted, weights folded into their parents.
    pub junk_removed: usize,
    /// Parent edges rewired to the canonical hierarchy.
    pub reparented: usize,
    /// Vertex groups folded by reweight rules.
    pub reweighted: usize,
    /// Vertex groups deleted because nothing weighted them.
    pub unused_groups_removed: usize,
    /// Bones deleted because no vertex carried their weight.
    pub zero_weight_removed: usize,
    /// Bone tails snapped onto the next bone in a chain.
    pub tails_connected: usize,
    /// Bones that had head and tail on the same point.
    pub zero_length_fixed: usize,
    /// Outcome of the final hierarchy check.
    pub hierarchy: HierarchyReport,
}

impl RepairReport {
    /// Renames resolved through the alias tables.
    #[must_use]
    pub fn alias_renames(&self) -> usize {
        self.count_kind(MatchKind::ExactAlias)
    }

    /// Renames resolved by fuzzy clustering.
    #[must_use]
    pub fn fuzzy_renames(&self) -> usize {
        self.count_kind(MatchKind::FuzzyCluster)
    }

    /// Bones whose names nothing recognized.
    #[must_use]
    pub fn unmatched(&self) -> usize {
        self.count_kind(MatchKind::Unmatched)
    }

    fn count_kind(&self, kind: MatchKind) -> usize {
        self.renames.iter().filter(|r| r.kind == kind).count()
    }

    /// Returns `true` if the final hierarchy check found no issues.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.hierarchy.is_valid()
    }
}

impl fmt::Display for RepairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "renamed {} bone(s) ({} via alias, {} unmatched)",
            self.renames.len(),
            self.alias_renames(),
            self.unmatched()
        )?;
        if self.meshes_joined > 0 {
            writeln!(f, "joined {} mesh(es) into the body", self.meshes_joined)?;
        }
        if self.shape_keys_removed > 0 {
            writeln!(f, "removed {} redundant shape key(s)", self.shape_keys_removed)?;
        }
        if self.junk_removed > 0 {
            writeln!(f, "removed {} junk bone(s)", self.junk_removed)?;
        }
        if self.reparented > 0 {
            writeln!(f, "reparented {} bone(s)", self.reparented)?;
        }
        if self.reweighted > 0 {
            writeln!(f, "folded {} vertex group(s) via reweight rules", self.reweighted)?;
        }
        if self.unused_groups_removed > 0 {
            writeln!(f, "removed {} unused vertex group(s)", self.unused_groups_removed)?;
        }
        if self.zero_weight_removed > 0 {
            writeln!(f, "removed {} zero-weight bone(s)", self.zero_weight_removed)?;
        }
        if self.tails_connected > 0 {
            writeln!(f, "connected {} bone tail(s)", self.tails_connected)?;
        }
        if self.zero_length_fixed > 0 {
            writeln!(f, "fixed {} zero-length bone(s)", self.zero_length_fixed)?;
        }
        write!(f, "{}", self.hierarchy)
    }
}
