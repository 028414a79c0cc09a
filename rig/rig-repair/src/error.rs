//! Error types for repair operations.

use rig_types::RigError;
use thiserror::Error;

/// Result alias for repair operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors that can occur while repairing a rig.
#[derive(Debug, Error)]
pub enum RepairError {
    /// A merge ratio outside the valid percentage range.
    #[error("merge ratio {ratio} is outside 1..=100")]
    InvalidRatio {
        /// The rejected ratio.
        ratio: u32,
    },

    /// An operation needs a bone the skeleton does not have.
    #[error("required bone is missing: {name}")]
    MissingBone {
        /// Name of the missing bone.
        name: String,
    },

    /// A cluster operation was handed an empty member list.
    #[error("bone cluster has no members")]
    EmptyCluster,

    /// The leg bones already carry tracking stubs.
    #[error("legs are already split for full body tracking")]
    LegsAlreadySplit,

    /// There are no tracking stubs to remove.
    #[error("legs are not split for full body tracking")]
    LegsNotSplit,

    /// An underlying rig mutation failed.
    #[error(transparent)]
    Rig(#[from] RigError),
}

impl RepairError {
    /// Creates a missing-bone error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingBone { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RepairError::InvalidRatio { ratio: 0 };
        assert!(format!("{err}").contains("1..=100"));
        let err = RepairError::missing("Hips");
        assert!(format!("{err}").contains("Hips"));
    }
}
