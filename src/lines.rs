//! Implicit 2D lines and their intersection by Cramer's rule.

use tracing::trace;

use crate::geometry::Point2D;
use crate::EPSILON;

/// Coefficients of the implicit line `a·x + b·y + c = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineCoefficients {
    /// Coefficient multiplying `x`.
    pub a: f64,
    /// Coefficient multiplying `y`.
    pub b: f64,
    /// Constant term.
    pub c: f64,
}

impl LineCoefficients {
    /// Evaluate `a·x + b·y + c` at `point`.
    ///
    /// The result is zero (within rounding) for points on the line.
    #[must_use]
    pub fn evaluate(&self, point: Point2D) -> f64 {
        self.a * point.x + self.b * point.y + self.c
    }

    /// Return `true` when both direction coefficients vanish.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.a.abs() < EPSILON && self.b.abs() < EPSILON
    }
}

/// Build the line passing through `p1` and `p2`.
///
/// # Examples
/// ```
/// use wishbone::{line_through, point2};
///
/// let line = line_through(point2(0.0, 0.0), point2(2.0, 2.0));
/// assert_eq!(line.evaluate(point2(5.0, 5.0)), 0.0);
/// ```
#[must_use]
pub fn line_through(p1: Point2D, p2: Point2D) -> LineCoefficients {
    LineCoefficients {
        a: p1.y - p2.y,
        b: p2.x - p1.x,
        c: p1.x * p2.y - p2.x * p1.y,
    }
}

/// Intersect two lines.
///
/// Returns `None` when the lines are parallel or coincident, i.e. when the
/// system determinant is smaller than [`EPSILON`](crate::EPSILON).
///
/// # Examples
/// ```
/// use wishbone::{intersect, line_through, point2};
///
/// let horizontal = line_through(point2(0.0, 1.0), point2(1.0, 1.0));
/// let vertical = line_through(point2(3.0, 0.0), point2(3.0, 1.0));
/// let crossing = intersect(&horizontal, &vertical).expect("lines cross");
/// assert_eq!(crossing, point2(3.0, 1.0));
///
/// let parallel = line_through(point2(0.0, 2.0), point2(1.0, 2.0));
/// assert!(intersect(&horizontal, &parallel).is_none());
/// ```
#[must_use]
pub fn intersect(l1: &LineCoefficients, l2: &LineCoefficients) -> Option<Point2D> {
    let det = l1.a * l2.b - l2.a * l1.b;
    if det.abs() < EPSILON {
        trace!(det, "lines are parallel");
        return None;
    }
    let x = (l1.b * l2.c - l2.b * l1.c) / det;
    let y = (l1.c * l2.a - l2.c * l1.a) / det;
    Some(Point2D::new(x, y))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::point2;

    #[test]
    fn line_coefficients_follow_two_point_form() {
        let line = line_through(point2(1.0, 2.0), point2(4.0, 6.0));
        assert_eq!(line, LineCoefficients { a: -4.0, b: 3.0, c: -2.0 });
        assert_relative_eq!(line.evaluate(point2(1.0, 2.0)), 0.0);
        assert_relative_eq!(line.evaluate(point2(4.0, 6.0)), 0.0);
    }

    #[test]
    fn coincident_points_give_degenerate_line() {
        let line = line_through(point2(3.0, 3.0), point2(3.0, 3.0));
        assert!(line.is_degenerate());
    }

    #[test]
    fn sloped_lines_intersect_on_both() {
        let upper = line_through(point2(250.0, 330.0), point2(540.0, 400.0));
        let lower = line_through(point2(200.0, 110.0), point2(560.0, 120.0));
        let ic = intersect(&upper, &lower).expect("arms converge");
        assert_relative_eq!(upper.evaluate(ic), 0.0, epsilon = 1.0e-6);
        assert_relative_eq!(lower.evaluate(ic), 0.0, epsilon = 1.0e-6);
    }

    #[test]
    fn coincident_lines_have_no_intersection() {
        let l1 = line_through(point2(0.0, 0.0), point2(1.0, 1.0));
        let l2 = line_through(point2(2.0, 2.0), point2(3.0, 3.0));
        assert!(intersect(&l1, &l2).is_none());
    }
}
