//! Core data types for skeleton and skinned-mesh processing.
//!
//! This crate provides the shared vocabulary for the rig processing stack:
//! - [`Skeleton`]: an arena of named bones with parent links
//! - [`Bone`]: head/tail positions, roll, and an optional parent index
//! - [`SkinnedMesh`]: vertices, triangles, sparse vertex-group weights, and
//!   shape keys
//! - [`ObjectTransform`]: a location/rotation/scale triple with the
//!   componentwise folding rule used when grafting rigs together
//! - [`Rig`]: a skeleton bundled with the meshes it deforms
//!
//! # Foundation layer
//!
//! This crate sits at the bottom of the stack and keeps its dependencies to
//! math and collections; all repair and merge logic lives in the crates
//! built on top of it.
//!
//! # Example
//!
//! ```
//! use rig_types::{Bone, Point3, Skeleton};
//!
//! let mut skeleton = Skeleton::new("Armature");
//! let hips = skeleton.add_bone(Bone::with_positions(
//!     "Hips",
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(0.0, 0.0, 1.2),
//! ))?;
//! let mut spine = Bone::with_positions(
//!     "Spine",
//!     Point3::new(0.0, 0.0, 1.2),
//!     Point3::new(0.0, 0.0, 1.5),
//! );
//! spine.parent = Some(hips);
//! skeleton.add_bone(spine)?;
//!
//! assert_eq!(skeleton.len(), 2);
//! assert_eq!(skeleton.children_of(hips).len(), 1);
//! # Ok::<(), rig_types::RigError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod bone;
mod error;
mod mesh;
mod rig;
mod skeleton;
mod transform;

pub use bone::{Bone, BoneIndex, position_key};
pub use error::{RigError, RigResult};
pub use mesh::{ShapeKey, SkinnedMesh, VertexGroup};
pub use rig::Rig;
pub use skeleton::Skeleton;
pub use transform::ObjectTransform;

// Re-export commonly used nalgebra types
pub use nalgebra::{Point3, Vector3};
