//! 3D arm force decomposition, static alignment angles and anti-dive.

use serde::Serialize;
use tracing::debug;

use crate::errors::{Arm, GeometryError};
use crate::geometry::{distance, projected_angle_deg, Force, Point2D, Point3D};
use crate::lines::{intersect, line_through};
use crate::EPSILON;

/// Validated 3D hardpoints and load case of one corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuspensionGeometry3D {
    /// Upper arm chassis pivot.
    upper_in: Point3D,
    /// Upper arm ball joint.
    upper_out: Point3D,
    /// Lower arm chassis pivot.
    lower_in: Point3D,
    /// Lower arm ball joint.
    lower_out: Point3D,
    /// Upper point of the kingpin axis.
    kingpin_upper: Point3D,
    /// Lower point of the kingpin axis.
    kingpin_lower: Point3D,
    /// Reference point on the front face of the rim.
    toe_front: Point3D,
    /// Reference point on the rear face of the rim.
    toe_rear: Point3D,
    /// Share of the longitudinal load taken by the upper arm.
    stiffness_upper: f64,
    /// Share of the longitudinal load taken by the lower arm.
    stiffness_lower: f64,
    /// Longitudinal tyre force at the contact patch in newtons.
    longitudinal_force: f64,
}

impl SuspensionGeometry3D {
    /// Start building a geometry from the four arm hardpoints.
    ///
    /// # Examples
    /// ```
    /// use wishbone::{point3, SuspensionGeometry3D};
    ///
    /// let geo = SuspensionGeometry3D::builder(
    ///     point3(250.0, 330.0, 120.0),
    ///     point3(540.0, 400.0, 0.0),
    ///     point3(200.0, 110.0, 150.0),
    ///     point3(560.0, 120.0, 0.0),
    /// )
    /// .stiffness(0.4, 0.6)
    /// .longitudinal_force(-2_000.0)
    /// .build()
    /// .expect("valid geometry");
    /// assert_eq!(geo.longitudinal_force(), -2_000.0);
    /// ```
    #[must_use]
    pub fn builder(
        upper_in: Point3D,
        upper_out: Point3D,
        lower_in: Point3D,
        lower_out: Point3D,
    ) -> SuspensionGeometry3DBuilder {
        SuspensionGeometry3DBuilder {
            geometry: Self {
                upper_in,
                upper_out,
                lower_in,
                lower_out,
                kingpin_upper: upper_out,
                kingpin_lower: lower_out,
                toe_front: lower_out,
                toe_rear: lower_out,
                stiffness_upper: 1.0,
                stiffness_lower: 1.0,
                longitudinal_force: 0.0,
            },
        }
    }

    /// Upper arm hardpoints as `(inboard, outboard)`.
    #[must_use]
    pub fn upper_arm(&self) -> (Point3D, Point3D) {
        (self.upper_in, self.upper_out)
    }

    /// Lower arm hardpoints as `(inboard, outboard)`.
    #[must_use]
    pub fn lower_arm(&self) -> (Point3D, Point3D) {
        (self.lower_in, self.lower_out)
    }

    /// Longitudinal tyre force in newtons.
    #[must_use]
    pub fn longitudinal_force(&self) -> f64 {
        self.longitudinal_force
    }
}

/// Builder for [`SuspensionGeometry3D`].
///
/// The kingpin axis defaults to the two ball joints, both toe references
/// default to the lower ball joint (toe undetermined), stiffness ratios default
/// to `1.0` and the longitudinal force to zero.
#[derive(Clone, Copy, Debug)]
pub struct SuspensionGeometry3DBuilder {
    /// Geometry under construction.
    geometry: SuspensionGeometry3D,
}

impl SuspensionGeometry3DBuilder {
    /// Set the kingpin axis points.
    #[must_use]
    pub fn kingpin(mut self, upper: Point3D, lower: Point3D) -> Self {
        self.geometry.kingpin_upper = upper;
        self.geometry.kingpin_lower = lower;
        self
    }

    /// Set the rim reference points used to measure toe.
    #[must_use]
    pub fn toe_reference(mut self, front: Point3D, rear: Point3D) -> Self {
        self.geometry.toe_front = front;
        self.geometry.toe_rear = rear;
        self
    }

    /// Set the upper and lower arm stiffness ratios.
    #[must_use]
    pub fn stiffness(mut self, upper: f64, lower: f64) -> Self {
        self.geometry.stiffness_upper = upper;
        self.geometry.stiffness_lower = lower;
        self
    }

    /// Set the longitudinal tyre force in newtons.
    #[must_use]
    pub fn longitudinal_force(mut self, force: f64) -> Self {
        self.geometry.longitudinal_force = force;
        self
    }

    /// Validate and return the geometry.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for NaN or infinite values and
    /// [`GeometryError::NegativeStiffness`] for a negative stiffness ratio.
    pub fn build(self) -> Result<SuspensionGeometry3D, GeometryError> {
        let geo = self.geometry;
        let points = [
            geo.upper_in,
            geo.upper_out,
            geo.lower_in,
            geo.lower_out,
            geo.kingpin_upper,
            geo.kingpin_lower,
            geo.toe_front,
            geo.toe_rear,
        ];
        if !points.iter().all(|p| p.is_finite()) {
            return Err(GeometryError::NonFinite { field: "hardpoint" });
        }
        for (arm, value) in [
            (Arm::Upper, geo.stiffness_upper),
            (Arm::Lower, geo.stiffness_lower),
        ] {
            if !value.is_finite() {
                return Err(GeometryError::NonFinite {
                    field: "stiffness ratio",
                });
            }
            if value < 0.0 {
                return Err(GeometryError::NegativeStiffness { arm, value });
            }
        }
        if !geo.longitudinal_force.is_finite() {
            return Err(GeometryError::NonFinite {
                field: "longitudinal force",
            });
        }
        Ok(geo)
    }
}

/// Axial force in one arm and its decomposition along the global axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ForceVector {
    /// Components of the axial force in newtons.
    pub components: Force,
    /// Force along the arm axis in newtons; positive means tension.
    pub axial: f64,
    /// Arm length in millimetres.
    pub length: f64,
}

/// Arm forces reacting a longitudinal tyre load.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ForceResult3D {
    /// Upper arm.
    pub upper: ForceVector,
    /// Lower arm.
    pub lower: ForceVector,
    /// Sum of both arms at the chassis.
    pub total: Force,
}

/// Split the longitudinal tyre force between the two arms.
///
/// The arms share the load in proportion to their stiffness ratios so that
/// the sum of their longitudinal components equals the tyre force. Returns
/// `None` when an arm is shorter than [`EPSILON`](crate::EPSILON) or when
/// neither arm has a longitudinal component to react the load.
#[must_use]
pub fn forces(geo: &SuspensionGeometry3D) -> Option<ForceResult3D> {
    let upper_length = distance(geo.upper_in, geo.upper_out);
    let lower_length = distance(geo.lower_in, geo.lower_out);
    if upper_length < EPSILON || lower_length < EPSILON {
        debug!(upper_length, lower_length, "zero-length arm; forces undefined");
        return None;
    }

    let ez_upper = (geo.upper_out.z - geo.upper_in.z) / upper_length;
    let ez_lower = (geo.lower_out.z - geo.lower_in.z) / lower_length;
    let denominator = geo.stiffness_upper * ez_upper + geo.stiffness_lower * ez_lower;
    if denominator.abs() < EPSILON {
        debug!(denominator, "arms cannot react a longitudinal load");
        return None;
    }

    let scale = geo.longitudinal_force / denominator;
    let upper = decompose(
        geo.upper_in,
        geo.upper_out,
        scale * geo.stiffness_upper,
        upper_length,
    );
    let lower = decompose(
        geo.lower_in,
        geo.lower_out,
        scale * geo.stiffness_lower,
        lower_length,
    );

    Some(ForceResult3D {
        upper,
        lower,
        total: upper.components + lower.components,
    })
}

/// Resolve an axial force along the inboard→outboard direction of an arm.
fn decompose(inboard: Point3D, outboard: Point3D, axial: f64, length: f64) -> ForceVector {
    let direction = (outboard.to_vector() - inboard.to_vector()) / length;
    ForceVector {
        components: (direction * axial).into(),
        axial,
        length,
    }
}

/// Static alignment angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AlignmentResult {
    /// Front-view inclination of the kingpin axis.
    pub camber: Option<f64>,
    /// Side-view inclination of the kingpin axis.
    pub caster: Option<f64>,
    /// Plan-view angle of the rim.
    pub toe: Option<f64>,
    /// Instant Center of the arms projected on the front plane.
    pub instant_center: Option<Point2D>,
}

/// Project the kingpin axis and rim references onto the principal planes.
#[must_use]
pub fn alignment(geo: &SuspensionGeometry3D) -> AlignmentResult {
    let upper = line_through(geo.upper_in.front_view(), geo.upper_out.front_view());
    let lower = line_through(geo.lower_in.front_view(), geo.lower_out.front_view());
    let instant_center = intersect(&upper, &lower);

    let kingpin = geo.kingpin_upper.to_vector() - geo.kingpin_lower.to_vector();
    let camber = projected_angle_deg(kingpin.x, kingpin.y);
    let caster = projected_angle_deg(kingpin.z, kingpin.y);

    let rim = geo.toe_front.to_vector() - geo.toe_rear.to_vector();
    let toe = projected_angle_deg(rim.x, rim.z);

    AlignmentResult {
        camber,
        caster,
        toe,
        instant_center,
    }
}

/// Anti-dive percentage.
///
/// `fx` is the braking force, `fy_total` the vertical reaction the arms
/// develop, `h_cg` the centre of gravity height and `wheelbase` the
/// wheelbase, both lengths in the same unit. Returns `None` when the wheelbase
/// or the required load transfer vanishes.
///
/// # Examples
/// ```
/// use wishbone::anti_dive;
///
/// let percent = anti_dive(1_000.0, 50.0, 300.0, 1_500.0).expect("defined");
/// assert!((percent - 25.0).abs() < 1e-9);
/// assert!(anti_dive(1_000.0, 50.0, 300.0, 0.0).is_none());
/// ```
#[must_use]
pub fn anti_dive(fx: f64, fy_total: f64, h_cg: f64, wheelbase: f64) -> Option<f64> {
    if wheelbase.abs() < EPSILON {
        return None;
    }
    let fz_needed = fx * (h_cg / wheelbase);
    if fz_needed.abs() < EPSILON {
        return None;
    }
    Some(fy_total / fz_needed * 100.0)
}
