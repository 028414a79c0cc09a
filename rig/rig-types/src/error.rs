//! Error types for rig data operations.

use thiserror::Error;

/// Result alias for rig data operations.
pub type RigResult<T> = Result<T, RigError>;

/// Errors that can occur when building or mutating rig data.
#[derive(Debug, Error)]
pub enum RigError {
    /// A bone with this name already exists in the skeleton.
    #[error("duplicate bone name: {name}")]
    DuplicateBoneName {
        /// The conflicting bone name.
        name: String,
    },

    /// No bone with this name exists in the skeleton.
    #[error("bone not found: {name}")]
    BoneNotFound {
        /// The requested bone name.
        name: String,
    },

    /// A bone index points at a removed or out-of-range arena slot.
    #[error("invalid bone index: {index}")]
    InvalidBoneIndex {
        /// The offending arena index.
        index: u32,
    },

    /// Reparenting would make a bone its own ancestor.
    #[error("parent cycle through bone: {name}")]
    ParentCycle {
        /// The bone whose reparent was rejected.
        name: String,
    },

    /// A vertex group with this name already exists on the mesh.
    #[error("duplicate vertex group: {name}")]
    DuplicateGroupName {
        /// The conflicting group name.
        name: String,
    },

    /// Per-vertex data does not match the mesh vertex count.
    #[error("vertex count mismatch for {context}: expected {expected}, got {actual}")]
    VertexCountMismatch {
        /// What carried the mismatched data (e.g. a shape key name).
        context: String,
        /// Expected vertex count.
        expected: usize,
        /// Actual vertex count.
        actual: usize,
    },
}

impl RigError {
    /// Creates a duplicate-bone-name error.
    #[must_use]
    pub fn duplicate_bone(name: impl Into<String>) -> Self {
        Self::DuplicateBoneName { name: name.into() }
    }

    /// Creates a bone-not-found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::BoneNotFound { name: name.into() }
    }

    /// Creates a vertex-count-mismatch error.
    #[must_use]
    pub fn vertex_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::VertexCountMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}
