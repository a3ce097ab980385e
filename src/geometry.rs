//! Fundamental geometric types for suspension hardpoints and loads.
//!
//! Coordinates follow the front-view convention used throughout the crate:
//! X is lateral (positive outboard), Y is vertical (positive up) and Z is
//! longitudinal (positive forward). Lengths are millimetres.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::EPSILON;

/// Position in the front-view plane measured in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// Lateral coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point2D {
    /// Create a [`Point2D`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Return `true` when both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Point2D> for Vector2<f64> {
    fn from(value: Point2D) -> Self {
        value.to_vector()
    }
}

/// Position in three dimensional space measured in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    /// Lateral coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Longitudinal coordinate.
    pub z: f64,
}

impl Point3D {
    /// Create a [`Point3D`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Drop the longitudinal coordinate, projecting onto the front (X–Y) plane.
    #[must_use]
    pub const fn front_view(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Mirror the point across the vehicle centreline (X = 0).
    ///
    /// # Examples
    /// ```
    /// use wishbone::point3;
    ///
    /// let right = point3(550.0, 120.0, 10.0);
    /// assert_eq!(right.mirror_x(), point3(-550.0, 120.0, 10.0));
    /// ```
    #[must_use]
    pub const fn mirror_x(self) -> Self {
        Self::new(-self.x, self.y, self.z)
    }

    /// Return `true` when all coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<Vector3<f64>> for Point3D {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Point3D> for Vector3<f64> {
    fn from(value: Point3D) -> Self {
        value.to_vector()
    }
}

/// Cartesian vector representing a three dimensional force in newtons.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Force {
    /// Force component acting along the lateral axis.
    pub x: f64,
    /// Force component acting along the vertical axis.
    pub y: f64,
    /// Force component acting along the longitudinal axis.
    pub z: f64,
}

impl Force {
    /// Create a [`Force`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert the force into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Euclidean magnitude of the force.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.to_vector().norm()
    }
}

impl Default for Force {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl From<Vector3<f64>> for Force {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Force> for Vector3<f64> {
    fn from(value: Force) -> Self {
        value.to_vector()
    }
}

impl std::ops::Add for Force {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Euclidean distance between two hardpoints.
#[must_use]
pub fn distance(from: Point3D, to: Point3D) -> f64 {
    (to.to_vector() - from.to_vector()).norm()
}

/// Unit vector pointing from `from` to `to`.
///
/// Returns `None` when the points are closer than `tolerance`, since the
/// direction of a zero-length segment is undefined.
#[must_use]
pub fn unit_vector(from: Point3D, to: Point3D, tolerance: f64) -> Option<Vector3<f64>> {
    let delta = to.to_vector() - from.to_vector();
    let length = delta.norm();
    if length < tolerance {
        None
    } else {
        Some(delta / length)
    }
}

/// Arc tangent of `opposite / adjacent` in degrees, or `None` when the
/// adjacent side vanishes.
#[must_use]
pub(crate) fn projected_angle_deg(opposite: f64, adjacent: f64) -> Option<f64> {
    if adjacent.abs() < EPSILON {
        None
    } else {
        Some((opposite / adjacent).atan().to_degrees())
    }
}

/// Convenience helper for creating [`Point2D`] instances.
///
/// # Examples
/// ```
/// use wishbone::point2;
///
/// let wheel_centre = point2(600.0, 0.0);
/// assert_eq!(wheel_centre.x, 600.0);
/// ```
#[must_use]
pub const fn point2(x: f64, y: f64) -> Point2D {
    Point2D::new(x, y)
}

/// Convenience helper for creating [`Point3D`] instances.
///
/// # Examples
/// ```
/// use wishbone::point3;
///
/// let ball_joint = point3(560.0, 120.0, 0.0);
/// assert_eq!(ball_joint.y, 120.0);
/// ```
#[must_use]
pub const fn point3(x: f64, y: f64, z: f64) -> Point3D {
    Point3D::new(x, y, z)
}

/// Convenience helper for creating [`Force`] instances.
///
/// # Examples
/// ```
/// use wishbone::force;
///
/// let braking = force(0.0, 0.0, -1_500.0);
/// assert_eq!(braking.z, -1_500.0);
/// ```
#[must_use]
pub const fn force(x: f64, y: f64, z: f64) -> Force {
    Force::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn point_to_vector_roundtrip() {
        let hardpoint = Point3D::new(1.0, 2.0, 3.0);
        let vector: Vector3<f64> = hardpoint.into();
        assert_eq!(vector, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(Point3D::from(vector), hardpoint);
    }

    #[test]
    fn force_defaults_to_zero() {
        assert_eq!(Force::default(), Force::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn forces_add_componentwise() {
        let total = force(1.0, -2.0, 3.0) + force(0.5, 2.0, -1.0);
        assert_eq!(total, force(1.5, 0.0, 2.0));
    }

    #[test]
    fn distance_matches_pythagoras() {
        let length = distance(point3(0.0, 0.0, 0.0), point3(300.0, 400.0, 0.0));
        assert_relative_eq!(length, 500.0);
    }

    #[test]
    fn unit_vector_rejects_coincident_points() {
        let p = point3(10.0, 20.0, 30.0);
        assert!(unit_vector(p, p, 1.0e-12).is_none());

        let u = unit_vector(p, point3(10.0, 20.0, 130.0), 1.0e-12).expect("distinct points");
        assert_relative_eq!(u.z, 1.0);
        assert_relative_eq!(u.norm(), 1.0);
    }

    #[test]
    fn projected_angle_is_undefined_for_vertical_adjacent() {
        assert!(projected_angle_deg(1.0, 0.0).is_none());
        let angle = projected_angle_deg(1.0, 1.0).expect("defined angle");
        assert_relative_eq!(angle, 45.0, epsilon = 1.0e-12);
    }
}
