//! Bone-name canonicalization for humanoid rigs.
//!
//! Imported avatar rigs name the same bone a dozen different ways:
//! `LowerBody`, `Bip01_Pelvis`, and `Mixamorig:Hips` are all the hips.
//! This crate maps raw names onto a canonical humanoid vocabulary using
//! an ordered alias table, and groups leftover accessory bones into
//! fuzzy-similarity clusters for later thinning.
//!
//! - [`standardize_name`] normalizes capitalization and separators.
//! - [`BoneTable`] holds the alias slots plus the junk, keep, parenting,
//!   and reweight tables; [`BoneTable::builtin`] ships the stock humanoid
//!   table, and the whole structure round-trips through JSON.
//! - [`similarity_ratio`] scores two names by longest matching blocks.
//! - [`find_bone_clusters`] groups similarly named sibling bones, with
//!   [`ClusterCache`] memoizing the result between explicit refreshes.
//!
//! # Example
//!
//! ```
//! use rig_naming::{standardize_name, BoneTable};
//!
//! let table = BoneTable::builtin();
//! let name = standardize_name("bip01-pelvis");
//! let matched = table.match_name(&name).unwrap();
//! assert_eq!(matched.canonical, "Hips");
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod builtin;
mod cluster;
mod error;
mod similarity;
mod table;

pub use cluster::{find_bone_clusters, BoneCluster, ClusterCache, ClusterParams};
pub use error::{NamingError, NamingResult};
pub use similarity::similarity_ratio;
pub use table::{
    apply_side, expand_pattern, has_side_placeholder, standardize_name, AliasSlot, BoneTable,
    MatchKind, NameMatch, ReweightRule, Side,
};
