//! Kingpin geometry and Ackermann steering.

use serde::Serialize;

use crate::errors::GeometryError;
use crate::geometry::{projected_angle_deg, Point3D};
use crate::EPSILON;

/// Whole-vehicle dimensions plus the front ball joints defining the kingpin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleGeometry {
    /// Front track in millimetres.
    track_front: f64,
    /// Rear track in millimetres.
    track_rear: f64,
    /// Wheelbase in millimetres.
    wheelbase: f64,
    /// Loaded tyre radius in millimetres.
    tire_radius: f64,
    /// Upper ball joint (top of the kingpin axis).
    upper_ball_joint: Point3D,
    /// Lower ball joint (bottom of the kingpin axis).
    lower_ball_joint: Point3D,
}

impl VehicleGeometry {
    /// Create a vehicle description.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for NaN or infinite input and
    /// [`GeometryError::NonPositiveTrack`] when the front track is not positive.
    pub fn new(
        track_front: f64,
        track_rear: f64,
        wheelbase: f64,
        tire_radius: f64,
        upper_ball_joint: Point3D,
        lower_ball_joint: Point3D,
    ) -> Result<Self, GeometryError> {
        let scalars = [track_front, track_rear, wheelbase, tire_radius];
        if !scalars.iter().all(|value| value.is_finite())
            || !upper_ball_joint.is_finite()
            || !lower_ball_joint.is_finite()
        {
            return Err(GeometryError::NonFinite {
                field: "vehicle geometry",
            });
        }
        if track_front <= 0.0 {
            return Err(GeometryError::NonPositiveTrack(track_front));
        }
        Ok(Self {
            track_front,
            track_rear,
            wheelbase,
            tire_radius,
            upper_ball_joint,
            lower_ball_joint,
        })
    }

    /// Front track in millimetres.
    #[must_use]
    pub fn track_front(&self) -> f64 {
        self.track_front
    }

    /// Rear track in millimetres.
    #[must_use]
    pub fn track_rear(&self) -> f64 {
        self.track_rear
    }

    /// Wheelbase in millimetres.
    #[must_use]
    pub fn wheelbase(&self) -> f64 {
        self.wheelbase
    }

    /// Loaded tyre radius in millimetres.
    #[must_use]
    pub fn tire_radius(&self) -> f64 {
        self.tire_radius
    }
}

/// Kingpin inclination, caster, scrub radius and mechanical trail.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct KingpinResult {
    /// Kingpin inclination in degrees (always non-negative).
    pub kpi: Option<f64>,
    /// Caster angle in degrees.
    pub caster: Option<f64>,
    /// Lateral distance from the kingpin ground intercept to the wheel centre, mm.
    pub scrub_radius: Option<f64>,
    /// Longitudinal distance from the wheel centre to the kingpin ground intercept, mm.
    pub mechanical_trail: Option<f64>,
}

/// Measure the steering axis defined by the two ball joints.
///
/// All values are `None` when the kingpin axis is horizontal.
#[must_use]
pub fn kingpin_metrics(geo: &VehicleGeometry) -> KingpinResult {
    let upper = geo.upper_ball_joint;
    let lower = geo.lower_ball_joint;
    let axis = upper.to_vector() - lower.to_vector();

    let kpi = projected_angle_deg(axis.x, axis.y).map(f64::abs);
    let caster = projected_angle_deg(axis.z, axis.y);
    if axis.y.abs() < EPSILON {
        return KingpinResult {
            kpi,
            caster,
            scrub_radius: None,
            mechanical_trail: None,
        };
    }

    // Follow the axis down from the lower ball joint to the ground plane.
    let x_ground = lower.x - lower.y * (axis.x / axis.y);
    let z_ground = lower.z - lower.y * (axis.z / axis.y);
    let wheel_z = (upper.z + lower.z) / 2.0;

    KingpinResult {
        kpi,
        caster,
        scrub_radius: Some(geo.track_front / 2.0 - x_ground),
        mechanical_trail: Some(z_ground - wheel_z),
    }
}

/// Ideal Ackermann steering for a given inner wheel angle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SteeringResult {
    /// Inner wheel steer angle in degrees.
    pub inner_angle_deg: f64,
    /// Outer wheel steer angle for 100 % Ackermann, degrees.
    pub outer_angle_deg: f64,
    /// Turning radius of the inner front wheel in metres.
    pub turning_radius_m: f64,
}

/// Compute the outer wheel angle that satisfies 100 % Ackermann.
///
/// Returns `None` for a zero wheelbase or a zero inner angle.
///
/// # Examples
/// ```
/// use wishbone::{ackermann, point3, VehicleGeometry};
///
/// let vehicle = VehicleGeometry::new(
///     1200.0, 1150.0, 1550.0, 260.0,
///     point3(540.0, 400.0, -10.0),
///     point3(560.0, 120.0, 0.0),
/// )
/// .expect("valid vehicle");
/// let steering = ackermann(&vehicle, 20.0).expect("defined");
/// assert!(steering.outer_angle_deg < 20.0);
/// ```
#[must_use]
pub fn ackermann(geo: &VehicleGeometry, inner_angle_deg: f64) -> Option<SteeringResult> {
    if geo.wheelbase.abs() < EPSILON {
        return None;
    }
    let inner = inner_angle_deg.to_radians();
    if inner.sin().abs() < EPSILON {
        return None;
    }
    let cot_outer = 1.0 / inner.tan() + geo.track_front / geo.wheelbase;
    let outer_angle_deg = (1.0 / cot_outer).atan().to_degrees();
    let turning_radius_m = geo.wheelbase / inner.sin() / 1000.0;
    Some(SteeringResult {
        inner_angle_deg,
        outer_angle_deg,
        turning_radius_m,
    })
}
