//! Object-level transforms and the folding rule for grafting rigs.

use nalgebra::{Point3, Rotation3, Vector3};

/// A decomposed object transform: location, XYZ Euler rotation, and
/// per-axis scale.
///
/// This mirrors how DCC tools store object transforms as three editable
/// channel triples rather than a matrix. Rotation angles are radians,
/// applied in XYZ order (X first).
///
/// # Example
///
/// ```
/// use rig_types::{ObjectTransform, Point3, Vector3};
///
/// let transform = ObjectTransform {
///     location: Vector3::new(0.0, 0.0, 1.0),
///     scale: Vector3::new(2.0, 2.0, 2.0),
///     ..ObjectTransform::identity()
/// };
/// let p = transform.apply_point(&Point3::new(1.0, 0.0, 0.0));
/// assert_eq!(p, Point3::new(2.0, 0.0, 1.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectTransform {
    /// Translation applied after rotation.
    pub location: Vector3<f64>,
    /// XYZ Euler angles in radians.
    pub rotation: Vector3<f64>,
    /// Per-axis scale applied before rotation.
    pub scale: Vector3<f64>,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ObjectTransform {
    /// The identity transform: zero location and rotation, unit scale.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            location: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Creates a pure translation.
    #[must_use]
    pub fn from_location(location: Vector3<f64>) -> Self {
        Self {
            location,
            ..Self::identity()
        }
    }

    /// Creates a pure XYZ Euler rotation (radians).
    #[must_use]
    pub fn from_rotation(rotation: Vector3<f64>) -> Self {
        Self {
            rotation,
            ..Self::identity()
        }
    }

    /// Creates a pure per-axis scale.
    #[must_use]
    pub fn from_scale(scale: Vector3<f64>) -> Self {
        Self {
            scale,
            ..Self::identity()
        }
    }

    /// Returns `true` if every channel holds its rest value exactly.
    ///
    /// The comparison is exact, matching how DCC tools decide whether a
    /// user has touched an object's transform at all.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.location == Vector3::zeros()
            && self.rotation == Vector3::zeros()
            && self.scale == Vector3::new(1.0, 1.0, 1.0)
    }

    /// Largest absolute rotation over the three Euler axes, in radians.
    #[must_use]
    pub fn max_abs_rotation(&self) -> f64 {
        self.rotation
            .iter()
            .fold(0.0_f64, |acc, r| acc.max(r.abs()))
    }

    /// The rotation as a matrix (XYZ Euler order, X applied first).
    #[must_use]
    pub fn rotation_matrix(&self) -> Rotation3<f64> {
        Rotation3::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Applies the transform to a point: scale, then rotate, then translate.
    #[must_use]
    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let scaled = Point3::from(point.coords.component_mul(&self.scale));
        self.rotation_matrix() * scaled + self.location
    }

    /// Applies the inverse transform: untranslate, unrotate, unscale.
    ///
    /// Round-trips with [`apply_point`](Self::apply_point) for any
    /// transform whose scale has no zero component.
    #[must_use]
    pub fn apply_inverse_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let unrotated = self.rotation_matrix().inverse() * (point - self.location);
        Point3::from(unrotated.coords.component_div(&self.scale))
    }

    /// Folds a child object's transform into this (parent) transform,
    /// producing the transform the child's geometry sees in world space.
    ///
    /// The channels combine componentwise:
    ///
    /// ```text
    /// location = child.location ∘ parent.scale + parent.location
    /// rotation = child.rotation
    /// scale    = child.scale ∘ parent.scale
    /// ```
    ///
    /// This is only exact while the parent's rotation is negligible; the
    /// merge pipeline enforces a rotation tolerance before relying on it.
    #[must_use]
    pub fn fold_child(&self, child: &Self) -> Self {
        Self {
            location: child.location.component_mul(&self.scale) + self.location,
            rotation: child.rotation,
            scale: child.scale.component_mul(&self.scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn identity_is_identity() {
        assert!(ObjectTransform::identity().is_identity());
        assert!(!ObjectTransform::from_location(Vector3::new(0.0, 0.0, 1e-12)).is_identity());
    }

    #[test]
    fn apply_point_order() {
        // Scale first, then rotate 90 degrees about Z, then translate.
        let transform = ObjectTransform {
            location: Vector3::new(10.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, FRAC_PI_2),
            scale: Vector3::new(2.0, 1.0, 1.0),
        };
        let p = transform.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn fold_child_matches_sequential_application() {
        // With zero parent rotation, folding then applying once must equal
        // applying child then parent.
        let parent = ObjectTransform {
            location: Vector3::new(1.0, 2.0, 3.0),
            rotation: Vector3::zeros(),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        let child = ObjectTransform {
            location: Vector3::new(0.5, 0.0, -1.0),
            rotation: Vector3::new(0.0, 0.0, 0.3),
            scale: Vector3::new(1.5, 1.0, 1.0),
        };
        let folded = parent.fold_child(&child);
        let p = Point3::new(0.25, -0.75, 2.0);
        let sequential = parent.apply_point(&child.apply_point(&p));
        let direct = folded.apply_point(&p);
        assert_relative_eq!(sequential.x, direct.x, epsilon = 1e-12);
        assert_relative_eq!(sequential.y, direct.y, epsilon = 1e-12);
        assert_relative_eq!(sequential.z, direct.z, epsilon = 1e-12);
    }

    #[test]
    fn apply_inverse_round_trips() {
        let transform = ObjectTransform {
            location: Vector3::new(-1.0, 4.0, 0.25),
            rotation: Vector3::new(0.2, -0.7, 1.1),
            scale: Vector3::new(2.0, 0.5, 3.0),
        };
        let p = Point3::new(0.3, -2.0, 5.5);
        let back = transform.apply_inverse_point(&transform.apply_point(&p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-12);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-12);
    }

    #[test]
    fn max_abs_rotation_picks_largest_axis() {
        let transform = ObjectTransform::from_rotation(Vector3::new(0.1, -0.4, 0.2));
        assert_relative_eq!(transform.max_abs_rotation(), 0.4);
    }
}
