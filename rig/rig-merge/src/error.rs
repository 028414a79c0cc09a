//! Error types for merge operations.

use rig_repair::RepairError;
use rig_types::RigError;
use thiserror::Error;

/// Result alias for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors that can occur while grafting one rig onto another.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The grafted rig carries rotation the transform fold cannot absorb.
    ///
    /// The offending skeleton's transform has already been reset to
    /// identity; the caller should tell the user to re-place the part's
    /// mesh and run the merge again.
    #[error(
        "the part is rotated by {rotation} rad; its transform was reset, \
         re-place the mesh and retry"
    )]
    RotatedBeyondTolerance {
        /// Largest Euler angle found, in radians.
        rotation: f64,
    },

    /// A custom graft was requested without naming an attachment bone.
    #[error("no attachment bone was chosen for a rig without main bones")]
    NoAttachBone,

    /// The named attachment bone does not exist in the base skeleton.
    #[error("attachment bone {name:?} does not exist in the base rig")]
    AttachBoneNotFound {
        /// The bone that was asked for.
        name: String,
    },

    /// A merge was attempted with an empty skeleton on either side.
    #[error("cannot merge an empty rig")]
    EmptyRig,

    /// An underlying rig mutation failed.
    #[error(transparent)]
    Rig(#[from] RigError),

    /// A repair pass invoked during the merge failed.
    #[error(transparent)]
    Repair(#[from] RepairError),
}
