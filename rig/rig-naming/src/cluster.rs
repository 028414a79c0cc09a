//! Fuzzy clustering of similarly named sibling bones.
//!
//! Imported rigs often carry chains of independently simulated accessory
//! bones (`Skirt_L_01`, `Skirt_L_02`, ...) that only differ by a counter.
//! Clustering groups such siblings so a caller can propose a shared root
//! bone or thin the chain. Anatomically significant names are excluded via
//! a substring denylist so a `Left arm` never lands in a skirt cluster.

use rig_types::{BoneIndex, Skeleton};
use tracing::debug;

use crate::similarity_ratio;

/// Name fragments that exclude a bone from clustering, checked as a
/// case-insensitive substring.
const DEFAULT_IGNORE: &[&str] = &[
    "finger", "chest", "leg", "arm", "spine", "shoulder", "neck", "knee", "eye", "toe", "head",
    "teeth", "thumb", "wrist", "ankle", "elbow", "hips", "twist", "shadow", "hand", "rootbone",
];

/// Controls for [`find_bone_clusters`].
#[derive(Debug, Clone)]
pub struct ClusterParams {
    /// Minimum similarity ratio for a name to join a cluster (default: 0.70).
    pub min_ratio: f64,
    /// Lowercase substrings that exclude a bone from clustering entirely.
    pub ignore: Vec<String>,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            min_ratio: 0.70,
            ignore: DEFAULT_IGNORE.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl ClusterParams {
    /// Creates params with the default threshold and denylist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum similarity ratio.
    #[must_use]
    pub fn with_min_ratio(mut self, min_ratio: f64) -> Self {
        self.min_ratio = min_ratio;
        self
    }

    /// Replaces the denylist.
    #[must_use]
    pub fn with_ignore(mut self, ignore: Vec<String>) -> Self {
        self.ignore = ignore;
        self
    }
}

/// A group of similarly named sibling bones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneCluster {
    /// First clustered bone in declaration order; names the cluster.
    pub prototype: String,
    /// All member names, prototype first, in declaration order.
    pub members: Vec<String>,
}

/// Groups similarly named sibling bones into merge candidates.
///
/// Bones are visited in declaration order. Each bone whose lowercased name
/// avoids the denylist either joins the first open cluster whose prototype
/// it resembles (ratio at or above `min_ratio`) and whose parent it shares,
/// or opens a new cluster with itself as prototype. Only clusters with two
/// or more members are returned.
///
/// The shared-parent requirement silently drops near-miss pairs that are
/// not true siblings; no error is raised for them.
#[must_use]
pub fn find_bone_clusters(skeleton: &Skeleton, params: &ClusterParams) -> Vec<BoneCluster> {
    struct Open {
        prototype: String,
        parent: Option<BoneIndex>,
        members: Vec<String>,
    }

    let mut open: Vec<Open> = Vec::new();
    for (_, bone) in skeleton.bones() {
        let lower = bone.name.to_lowercase();
        if params.ignore.iter().any(|w| lower.contains(w.as_str())) {
            continue;
        }
        let claimed = open.iter_mut().find(|c| {
            c.parent == bone.parent && similarity_ratio(&c.prototype, &bone.name) >= params.min_ratio
        });
        match claimed {
            Some(cluster) => cluster.members.push(bone.name.clone()),
            None => open.push(Open {
                prototype: bone.name.clone(),
                parent: bone.parent,
                members: vec![bone.name.clone()],
            }),
        }
    }

    let clusters: Vec<BoneCluster> = open
        .into_iter()
        .filter(|c| c.members.len() >= 2)
        .map(|c| BoneCluster {
            prototype: c.prototype,
            members: c.members,
        })
        .collect();
    debug!(clusters = clusters.len(), "bone clustering complete");
    clusters
}

/// Caches a cluster set between explicit invalidations.
///
/// Results are served stale until [`invalidate`](Self::invalidate) is
/// called; editing the skeleton does not refresh the cache by itself.
#[derive(Debug, Default)]
pub struct ClusterCache {
    cached: Option<Vec<BoneCluster>>,
}

impl ClusterCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached clusters, computing them on first use.
    pub fn get_or_build(&mut self, skeleton: &Skeleton, params: &ClusterParams) -> &[BoneCluster] {
        if self.cached.is_none() {
            self.cached = Some(find_bone_clusters(skeleton, params));
        }
        self.cached.as_deref().unwrap_or_default()
    }

    /// Drops the cached result so the next query recomputes it.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_types::{Bone, Point3};

    fn skeleton_with(names: &[(&str, Option<&str>)]) -> Skeleton {
        let mut skeleton = Skeleton::new("Armature");
        for (name, parent) in names {
            let mut bone = Bone::new(*name);
            bone.tail = Point3::new(0.0, 0.0, 0.1);
            bone.parent = parent.map(|p| skeleton.index_of(p).unwrap());
            skeleton.add_bone(bone).unwrap();
        }
        skeleton
    }

    #[test]
    fn numbered_siblings_form_a_cluster() {
        let skeleton = skeleton_with(&[
            ("Hips", None),
            ("Skirt_1", Some("Hips")),
            ("Skirt_2", Some("Hips")),
            ("Skirt_3", Some("Hips")),
        ]);
        let clusters = find_bone_clusters(&skeleton, &ClusterParams::default());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].prototype, "Skirt_1");
        assert_eq!(clusters[0].members, vec!["Skirt_1", "Skirt_2", "Skirt_3"]);
    }

    #[test]
    fn denylist_excludes_anatomy() {
        // "arm" is a denylist substring, so sleeve bones never cluster.
        let skeleton = skeleton_with(&[
            ("Chest", None),
            ("ArmRibbon_1", Some("Chest")),
            ("ArmRibbon_2", Some("Chest")),
        ]);
        let clusters = find_bone_clusters(&skeleton, &ClusterParams::default());
        assert!(clusters.is_empty());
    }

    #[test]
    fn non_siblings_do_not_cluster() {
        let skeleton = skeleton_with(&[
            ("Hips", None),
            ("Ribbon_1", Some("Hips")),
            ("Ribbon_2", Some("Ribbon_1")),
        ]);
        let clusters = find_bone_clusters(&skeleton, &ClusterParams::default());
        assert!(clusters.is_empty());
    }

    #[test]
    fn dissimilar_siblings_open_separate_clusters() {
        let skeleton = skeleton_with(&[
            ("Hips", None),
            ("Ribbon_1", Some("Hips")),
            ("Tassel_1", Some("Hips")),
            ("Ribbon_2", Some("Hips")),
            ("Tassel_2", Some("Hips")),
        ]);
        let clusters = find_bone_clusters(&skeleton, &ClusterParams::default());
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].prototype, "Ribbon_1");
        assert_eq!(clusters[1].prototype, "Tassel_1");
    }

    #[test]
    fn singletons_are_not_reported() {
        let skeleton = skeleton_with(&[("Hips", None), ("Ribbon_1", Some("Hips"))]);
        let clusters = find_bone_clusters(&skeleton, &ClusterParams::default());
        assert!(clusters.is_empty());
    }

    #[test]
    fn cache_is_stale_until_invalidated() {
        let mut skeleton = skeleton_with(&[
            ("Hips", None),
            ("Ribbon_1", Some("Hips")),
            ("Ribbon_2", Some("Hips")),
        ]);
        let params = ClusterParams::default();
        let mut cache = ClusterCache::new();
        assert_eq!(cache.get_or_build(&skeleton, &params).len(), 1);

        let idx = skeleton.index_of("Hips").unwrap();
        let mut extra = Bone::new("Ribbon_3");
        extra.parent = Some(idx);
        skeleton.add_bone(extra).unwrap();

        // Still the old answer until the caller refreshes.
        assert_eq!(cache.get_or_build(&skeleton, &params)[0].members.len(), 2);
        cache.invalidate();
        assert_eq!(cache.get_or_build(&skeleton, &params)[0].members.len(), 3);
    }
}
