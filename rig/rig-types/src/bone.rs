//! Bone data and position quantization.

use nalgebra::Point3;

/// Index of a bone slot in a [`Skeleton`](crate::Skeleton) arena.
///
/// Indices are stable across renames and reparenting but become invalid
/// when the bone they point at is removed.
pub type BoneIndex = u32;

/// A single bone: a named head→tail segment with an optional parent.
///
/// New bones start zero-length at the origin, the way edit-mode bone
/// creation works in DCC tools; callers position them afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bone {
    /// Bone name, unique within its skeleton.
    pub name: String,
    /// Position of the bone's root end.
    pub head: Point3<f64>,
    /// Position of the bone's tip end.
    pub tail: Point3<f64>,
    /// Twist around the head→tail axis, in radians.
    pub roll: f64,
    /// Arena index of the parent bone, if any.
    pub parent: Option<BoneIndex>,
}

impl Bone {
    /// Creates a zero-length bone at the origin with no parent.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            head: Point3::origin(),
            tail: Point3::origin(),
            roll: 0.0,
            parent: None,
        }
    }

    /// Creates an unparented bone with the given head and tail.
    #[must_use]
    pub fn with_positions(name: impl Into<String>, head: Point3<f64>, tail: Point3<f64>) -> Self {
        Self {
            name: name.into(),
            head,
            tail,
            roll: 0.0,
            parent: None,
        }
    }

    /// Head→tail length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.tail - self.head).norm()
    }
}

/// Quantizes a position onto the 1/10000-unit grid used for
/// "same position" checks.
///
/// Two points share a key exactly when each coordinate rounds to the same
/// fourth decimal, which makes the key usable for hashing and equality
/// where raw floats are not.
#[must_use]
pub fn position_key(point: &Point3<f64>) -> [i64; 3] {
    [
        (point.x * 10_000.0).round() as i64,
        (point.y * 10_000.0).round() as i64,
        (point.z * 10_000.0).round() as i64,
    ]
}
