//! Front-view kinematics: Instant Center, Roll Center and camber gain.
//!
//! The construction follows Reimpell: the two arm lines meet at the Instant
//! Center, and the line from the Instant Center to the wheel centre (the
//! front-view swing arm) crosses the vehicle centreline at the Roll Center.

use serde::Serialize;
use tracing::debug;

use crate::errors::{Arm, GeometryError};
use crate::geometry::{Point2D, Point3D};
use crate::lines::{intersect, line_through};
use crate::EPSILON;

/// Validated front-view geometry of one double-wishbone corner.
///
/// Construct with [`SuspensionGeometry2D::new`], then optionally attach
/// wheel travel and camber readings for [`camber_gain`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuspensionGeometry2D {
    /// Distance between the tyre contact centres in millimetres.
    track_width: f64,
    /// Upper arm chassis pivot.
    upper_in: Point2D,
    /// Upper arm ball joint.
    upper_out: Point2D,
    /// Lower arm chassis pivot.
    lower_in: Point2D,
    /// Lower arm ball joint.
    lower_out: Point2D,
    /// Wheel travel of the outer wheel in millimetres.
    s1: f64,
    /// Wheel travel of the inner wheel in millimetres.
    s2: f64,
    /// Camber of the outer wheel in degrees.
    camber_out: f64,
    /// Camber of the inner wheel in degrees.
    camber_in: f64,
}

impl SuspensionGeometry2D {
    /// Create a front-view geometry from the track width and four hardpoints.
    ///
    /// Travel and camber default to zero.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for NaN or infinite input,
    /// [`GeometryError::CoincidentArmEndpoints`] when an arm has zero length,
    /// and [`GeometryError::CoincidentArmLines`] when both arms lie on the same
    /// line. Parallel but distinct arms are accepted.
    pub fn new(
        track_width: f64,
        upper_in: Point2D,
        upper_out: Point2D,
        lower_in: Point2D,
        lower_out: Point2D,
    ) -> Result<Self, GeometryError> {
        if !track_width.is_finite() {
            return Err(GeometryError::NonFinite {
                field: "track width",
            });
        }
        if ![upper_in, upper_out, lower_in, lower_out]
            .iter()
            .all(|p| p.is_finite())
        {
            return Err(GeometryError::NonFinite {
                field: "front-view hardpoint",
            });
        }
        let upper = line_through(upper_in, upper_out);
        if upper.is_degenerate() {
            return Err(GeometryError::CoincidentArmEndpoints { arm: Arm::Upper });
        }
        let lower = line_through(lower_in, lower_out);
        if lower.is_degenerate() {
            return Err(GeometryError::CoincidentArmEndpoints { arm: Arm::Lower });
        }
        let parallel = (upper.a * lower.b - lower.a * upper.b).abs() < EPSILON;
        // Distance from the lower pivot to the upper arm line.
        let offset = upper.evaluate(lower_in).abs() / upper.a.hypot(upper.b);
        if parallel && offset < EPSILON {
            return Err(GeometryError::CoincidentArmLines);
        }
        Ok(Self {
            track_width,
            upper_in,
            upper_out,
            lower_in,
            lower_out,
            s1: 0.0,
            s2: 0.0,
            camber_out: 0.0,
            camber_in: 0.0,
        })
    }

    /// Attach the wheel travel measured at the outer (`s1`) and inner (`s2`)
    /// wheel.
    #[must_use]
    pub fn with_travel(mut self, s1: f64, s2: f64) -> Self {
        self.s1 = s1;
        self.s2 = s2;
        self
    }

    /// Attach the camber (degrees) measured at the outer and inner wheel.
    #[must_use]
    pub fn with_camber(mut self, camber_out: f64, camber_in: f64) -> Self {
        self.camber_out = camber_out;
        self.camber_in = camber_in;
        self
    }

    /// Track width in millimetres.
    #[must_use]
    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    /// Upper arm hardpoints as `(inboard, outboard)`.
    #[must_use]
    pub fn upper_arm(&self) -> (Point2D, Point2D) {
        (self.upper_in, self.upper_out)
    }

    /// Lower arm hardpoints as `(inboard, outboard)`.
    #[must_use]
    pub fn lower_arm(&self) -> (Point2D, Point2D) {
        (self.lower_in, self.lower_out)
    }

    /// Wheel centre used for the swing-arm construction.
    #[must_use]
    pub fn wheel_centre(&self) -> Point2D {
        Point2D::new(self.track_width / 2.0, 0.0)
    }
}

/// Outcome of the front-view Roll Center construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RollCenterResult {
    /// Instant Center, absent when the arms are parallel.
    pub instant_center: Option<Point2D>,
    /// Roll Center height above ground in millimetres.
    pub height: Option<f64>,
    /// Roll Center on the vehicle centreline, `(0, height)`.
    pub point: Option<Point2D>,
    /// Reimpell's curvature factor `q`.
    pub q_factor: Option<f64>,
}

impl RollCenterResult {
    /// Result for a geometry with no Instant Center.
    const UNDEFINED: Self = Self {
        instant_center: None,
        height: None,
        point: None,
        q_factor: None,
    };
}

/// Locate the Instant Center and Roll Center of a corner.
///
/// # Examples
/// ```
/// use wishbone::{point2, roll_center, SuspensionGeometry2D};
///
/// let geo = SuspensionGeometry2D::new(
///     1200.0,
///     point2(250.0, 330.0),
///     point2(540.0, 400.0),
///     point2(200.0, 110.0),
///     point2(560.0, 120.0),
/// )
/// .expect("valid geometry");
/// let rc = roll_center(&geo);
/// assert!(rc.instant_center.is_some());
/// assert!(rc.height.is_some());
/// ```
#[must_use]
pub fn roll_center(geo: &SuspensionGeometry2D) -> RollCenterResult {
    let upper = line_through(geo.upper_in, geo.upper_out);
    let lower = line_through(geo.lower_in, geo.lower_out);

    let Some(ic) = intersect(&upper, &lower) else {
        debug!("arms are parallel in front view; no instant center");
        return RollCenterResult::UNDEFINED;
    };

    let wheel = geo.wheel_centre();
    if (ic.x - wheel.x).abs() < EPSILON {
        debug!(ic_x = ic.x, "swing arm is vertical; roll center undefined");
        return RollCenterResult {
            instant_center: Some(ic),
            ..RollCenterResult::UNDEFINED
        };
    }

    let slope = (ic.y - wheel.y) / (ic.x - wheel.x);
    let height = slope * (0.0 - wheel.x) + wheel.y;
    let q_factor = if height.abs() > EPSILON {
        Some((ic.y - wheel.y) * geo.track_width / (height * height))
    } else {
        None
    };

    RollCenterResult {
        instant_center: Some(ic),
        height: Some(height),
        point: Some(Point2D::new(0.0, height)),
        q_factor,
    }
}

/// Camber change per degree of body roll.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CamberGainResult {
    /// Body roll angle in degrees.
    pub roll_angle_deg: f64,
    /// Mean camber change in degrees.
    pub camber_change_deg: f64,
    /// Camber factor `kγ`, absent when the roll angle is zero.
    pub camber_factor: Option<f64>,
}

/// Compute the roll angle, camber change and camber factor of a corner.
///
/// A zero track width yields zero roll and camber change and no factor.
#[must_use]
pub fn camber_gain(geo: &SuspensionGeometry2D) -> CamberGainResult {
    if geo.track_width.abs() < EPSILON {
        return CamberGainResult {
            roll_angle_deg: 0.0,
            camber_change_deg: 0.0,
            camber_factor: None,
        };
    }
    let roll_angle_deg = ((geo.s1 + geo.s2) / geo.track_width).to_degrees();
    let camber_change_deg = (geo.camber_out - geo.camber_in) / 2.0;
    let camber_factor = if roll_angle_deg.abs() > EPSILON {
        Some(camber_change_deg / roll_angle_deg)
    } else {
        None
    };
    CamberGainResult {
        roll_angle_deg,
        camber_change_deg,
        camber_factor,
    }
}

/// Place the Roll Center of a 3D corner in space.
///
/// The hardpoints are projected onto the front plane to find the Roll Center
/// height; its longitudinal position is the mean Z of the two ball joints.
/// `Ok(None)` means the projected geometry is valid but has no Roll Center.
///
/// # Errors
/// Returns the [`GeometryError`] of [`SuspensionGeometry2D::new`] when the
/// projected front view is not a valid corner.
///
/// # Examples
/// ```
/// use wishbone::{point3, roll_center_3d};
/// let rc = roll_center_3d(
///     1200.0,
///     point3(250.0, 330.0, 0.0),
///     point3(540.0, 400.0, 0.0),
///     point3(200.0, 110.0, 0.0),
///     point3(560.0, 120.0, 0.0),
/// )
/// .unwrap()
/// .unwrap();
/// assert!(rc.y > 0.0);
/// ```
pub fn roll_center_3d(
    track_width: f64,
    upper_in: Point3D,
    upper_out: Point3D,
    lower_in: Point3D,
    lower_out: Point3D,
) -> Result<Option<Point3D>, GeometryError> {
    let geo = SuspensionGeometry2D::new(
        track_width,
        upper_in.front_view(),
        upper_out.front_view(),
        lower_in.front_view(),
        lower_out.front_view(),
    )?;
    let z = (upper_out.z + lower_out.z) / 2.0;
    Ok(roll_center(&geo).height.map(|height| Point3D::new(0.0, height, z)))
}
