//! Summary of what a merge did to the base rig.

use std::fmt;

/// How the merge rig was attached to the base skeleton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GraftKind {
    /// The merge rig shares humanoid bone names with the base; matching
    /// bones were folded together directly.
    #[default]
    Auto,
    /// The merge rig was hung under a single anchor bone of the base
    /// through a synthetic root.
    Custom,
    /// Every bone name shared between the two rigs was folded, not just
    /// the humanoid set.
    MatchingBones,
}

impl fmt::Display for GraftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Custom => write!(f, "custom"),
            Self::MatchingBones => write!(f, "matching-bones"),
        }
    }
}

/// Everything a merge changed, for display to the user.
///
/// Counts default to zero; the merge fills in the fields for the work it
/// actually performs.
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    /// Which graft strategy the merge settled on.
    pub graft: GraftKind,
    /// Meshes folded together while joining each side.
    pub meshes_joined: usize,
    /// Shape keys dropped as duplicates of the basis or MMD leftovers.
    pub shape_keys_removed: usize,
    /// Bones carried over from the merge skeleton into the base.
    pub bones_absorbed: usize,
    /// Carried-over bones rewired under their base counterparts.
    pub bones_reparented: usize,
    /// Carried-over bones folded into a base bone and deleted.
    pub bones_merged: usize,
    /// Carried-over bones that kept their own identity, suffix stripped.
    pub suffixes_stripped: usize,
    /// Vertex groups deleted because nothing weighted them.
    pub groups_removed: usize,
    /// Bones deleted because no vertex carried their weight.
    pub zero_weight_removed: usize,
    /// Bone tails snapped onto the next bone in a chain.
    pub tails_connected: usize,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} graft: absorbed {} bone(s), merged {} into the base",
            self.graft, self.bones_absorbed, self.bones_merged
        )?;
        if self.meshes_joined > 0 {
            writeln!(f, "joined {} mesh(es)", self.meshes_joined)?;
        }
        if self.shape_keys_removed > 0 {
            writeln!(f, "removed {} redundant shape key(s)", self.shape_keys_removed)?;
        }
        if self.bones_reparented > 0 {
            writeln!(f, "reparented {} bone(s)", self.bones_reparented)?;
        }
        if self.suffixes_stripped > 0 {
            writeln!(f, "kept {} bone(s) under their own names", self.suffixes_stripped)?;
        }
        if self.groups_removed > 0 {
            writeln!(f, "removed {} unused vertex group(s)", self.groups_removed)?;
        }
        if self.zero_weight_removed > 0 {
            writeln!(f, "removed {} zero-weight bone(s)", self.zero_weight_removed)?;
        }
        if self.tails_connected > 0 {
            writeln!(f, "connected {} bone tail(s)", self.tails_connected)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_graft_kind() {
        let report = MergeReport {
            graft: GraftKind::Custom,
            bones_absorbed: 5,
            bones_merged: 1,
            ..MergeReport::default()
        };
        let text = report.to_string();
        assert!(text.contains("custom graft"));
        assert!(text.contains("absorbed 5 bone(s)"));
        assert!(text.contains("merged 1 into the base"));
    }

    #[test]
    fn display_skips_zero_counts() {
        let report = MergeReport {
            bones_reparented: 3,
            ..MergeReport::default()
        };
        let text = report.to_string();
        assert!(text.contains("reparented 3 bone(s)"));
        assert!(!text.contains("shape key"));
        assert!(!text.contains("zero-weight"));
    }
}
