#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use wishbone::{
    camber_gain, point2, point3, roll_center, roll_center_3d, GeometryError, SuspensionGeometry2D,
};

fn baja_corner() -> SuspensionGeometry2D {
    SuspensionGeometry2D::new(
        1200.0,
        point2(250.0, 330.0),
        point2(540.0, 400.0),
        point2(200.0, 110.0),
        point2(560.0, 120.0),
    )
    .expect("converging arms are valid")
}

#[test]
fn converging_arms_locate_instant_and_roll_center() {
    let rc = roll_center(&baja_corner());

    let ic = rc.instant_center.expect("arms converge");
    assert_relative_eq!(ic.x, -773.452_914_798, epsilon = 1.0e-6);
    assert_relative_eq!(ic.y, 82.959_641_256, epsilon = 1.0e-6);

    // Swing arm from the wheel centre (600, 0) through the IC, evaluated at x = 0.
    let expected_height = ic.y / (ic.x - 600.0) * -600.0;
    assert_relative_eq!(rc.height.expect("defined"), expected_height, epsilon = 1.0e-9);
    assert_relative_eq!(rc.height.expect("defined"), 36.241_347_786, epsilon = 1.0e-6);

    let point = rc.point.expect("defined");
    assert_relative_eq!(point.x, 0.0);
    assert_relative_eq!(point.y, expected_height, epsilon = 1.0e-9);

    let q = rc.q_factor.expect("roll center is off the ground");
    assert_relative_eq!(q, ic.y * 1200.0 / (expected_height * expected_height), epsilon = 1.0e-9);
}

#[test]
fn parallel_arms_leave_everything_undetermined() {
    let geo = SuspensionGeometry2D::new(
        1200.0,
        point2(250.0, 330.0),
        point2(540.0, 390.0),
        point2(200.0, 110.0),
        point2(490.0, 170.0),
    )
    .expect("parallel but distinct arms are valid");
    let rc = roll_center(&geo);
    assert!(rc.instant_center.is_none());
    assert!(rc.height.is_none());
    assert!(rc.point.is_none());
    assert!(rc.q_factor.is_none());
}

#[test]
fn instant_center_below_wheel_centre_gives_no_roll_center() {
    // Both arm lines pass through (600, -300), directly below the wheel centre.
    let geo = SuspensionGeometry2D::new(
        1200.0,
        point2(200.0, 500.0),
        point2(400.0, 100.0),
        point2(0.0, 300.0),
        point2(300.0, 0.0),
    )
    .expect("valid geometry");
    let rc = roll_center(&geo);
    let ic = rc.instant_center.expect("arms intersect");
    assert_relative_eq!(ic.x, 600.0, epsilon = 1.0e-9);
    assert!(rc.height.is_none());
    assert!(rc.q_factor.is_none());
}

#[test]
fn collinear_arms_are_rejected() {
    let error = SuspensionGeometry2D::new(
        1200.0,
        point2(0.0, 100.0),
        point2(100.0, 200.0),
        point2(200.0, 300.0),
        point2(300.0, 400.0),
    )
    .expect_err("one line for both arms");
    assert_eq!(error, GeometryError::CoincidentArmLines);
}

#[test]
fn camber_gain_of_measured_roll() {
    let geo = baja_corner().with_travel(25.0, 25.0).with_camber(-1.8, 0.6);
    let gain = camber_gain(&geo);

    let roll = (50.0_f64 / 1200.0).to_degrees();
    assert_relative_eq!(gain.roll_angle_deg, roll, epsilon = 1.0e-12);
    assert_relative_eq!(gain.camber_change_deg, -1.2, epsilon = 1.0e-12);
    assert_relative_eq!(gain.camber_factor.expect("body rolls"), -1.2 / roll, epsilon = 1.0e-12);
}

#[test]
fn spatial_roll_center_sits_between_the_ball_joints() {
    let rc = roll_center_3d(
        1200.0,
        point3(250.0, 330.0, 120.0),
        point3(540.0, 400.0, -10.0),
        point3(200.0, 110.0, 150.0),
        point3(560.0, 120.0, 0.0),
    )
    .expect("valid geometry")
    .expect("roll center defined");
    assert_relative_eq!(rc.x, 0.0);
    assert_relative_eq!(rc.y, 36.241_347_786, epsilon = 1.0e-6);
    assert_relative_eq!(rc.z, -5.0);
}

#[test]
fn spatial_roll_center_reports_invalid_projection() {
    // Both arms project onto the line y = x.
    let error = roll_center_3d(
        1200.0,
        point3(0.0, 0.0, 50.0),
        point3(100.0, 100.0, 0.0),
        point3(200.0, 200.0, -50.0),
        point3(300.0, 300.0, 0.0),
    )
    .expect_err("collinear arms are a configuration error");
    assert_eq!(error, GeometryError::CoincidentArmLines);
}
