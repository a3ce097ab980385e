//! Property-based checks of the geometric and load-transfer invariants.

use approx::assert_relative_eq;
use proptest::prelude::*;
use wishbone::{
    camber_gain, default_members, force, forces, intersect, line_through, point2, point3,
    solve_linkage, AngleRange, ArmStatus, CgSweep, ForceAngleSweep, HardpointSet, LengthUnit,
    Point2D, SuspensionGeometry2D, SuspensionGeometry3D, SweepRange, VehicleLoad,
};

/// Generate a front-view point within a plausible corner envelope.
fn arb_point2() -> impl Strategy<Value = Point2D> {
    (0.0..700.0f64, 0.0..600.0f64).prop_map(|(x, y)| point2(x, y))
}

/// Upright hardpoints in a generic pose: each entry perturbs a known
/// determinate layout by a few millimetres.
fn arb_upright() -> impl Strategy<Value = HardpointSet> {
    prop::collection::vec(prop::array::uniform3(-5.0..5.0f64), 11).prop_map(|offsets| {
        let base = [
            ("A", [560.0, 120.0, 0.0]),
            ("B", [540.0, 400.0, -10.0]),
            ("G", [200.0, 110.0, 150.0]),
            ("K", [200.0, 100.0, -150.0]),
            ("E", [250.0, 330.0, 120.0]),
            ("D", [250.0, 320.0, -130.0]),
            ("I", [550.0, 200.0, -70.0]),
            ("J", [200.0, 210.0, -70.0]),
            ("Q", [530.0, 150.0, 10.0]),
            ("H", [260.0, 500.0, 15.0]),
            ("CP", [580.0, 0.0, 0.0]),
        ];
        base.iter()
            .zip(offsets)
            .map(|((label, [x, y, z]), [dx, dy, dz])| (*label, point3(x + dx, y + dy, z + dz)))
            .collect()
    })
}

proptest! {
    #[test]
    fn instant_center_lies_on_both_arm_lines(
        p1 in arb_point2(),
        p2 in arb_point2(),
        p3 in arb_point2(),
        p4 in arb_point2(),
    ) {
        let upper = line_through(p1, p2);
        let lower = line_through(p3, p4);
        let det = upper.a * lower.b - lower.a * upper.b;
        prop_assume!(det.abs() > 1.0);

        let ic = intersect(&upper, &lower).expect("lines are not parallel");
        let scale_upper = upper.a.hypot(upper.b);
        let scale_lower = lower.a.hypot(lower.b);
        prop_assert!(upper.evaluate(ic).abs() / scale_upper < 1.0e-6 * (1.0 + ic.x.abs() + ic.y.abs()));
        prop_assert!(lower.evaluate(ic).abs() / scale_lower < 1.0e-6 * (1.0 + ic.x.abs() + ic.y.abs()));
    }

    #[test]
    fn roll_angle_is_travel_over_track(
        track in 500.0..2000.0f64,
        s1 in -80.0..80.0f64,
        s2 in -80.0..80.0f64,
    ) {
        let geo = SuspensionGeometry2D::new(
            track,
            point2(250.0, 330.0),
            point2(540.0, 400.0),
            point2(200.0, 110.0),
            point2(560.0, 120.0),
        )
        .expect("valid geometry")
        .with_travel(s1, s2);
        let gain = camber_gain(&geo);
        assert_relative_eq!(gain.roll_angle_deg, ((s1 + s2) / track).to_degrees(), epsilon = 1.0e-12);
    }

    #[test]
    fn mirrored_arms_share_the_load_equally(
        reach in 200.0..400.0f64,
        sweep in 50.0..250.0f64,
        height in 50.0..300.0f64,
        fx in -5000.0..5000.0f64,
        stiffness in 0.1..5.0f64,
    ) {
        prop_assume!(fx.abs() > 1.0);
        // Upper and lower arms are the same link shifted vertically.
        let geo = SuspensionGeometry3D::builder(
            point3(0.0, height + 200.0, sweep),
            point3(reach, height + 200.0, 0.0),
            point3(0.0, height, sweep),
            point3(reach, height, 0.0),
        )
        .stiffness(stiffness, stiffness)
        .longitudinal_force(fx)
        .build()
        .expect("valid geometry");
        let result = forces(&geo).expect("arms react the load");
        assert_relative_eq!(result.upper.axial, result.lower.axial, epsilon = 1.0e-9 * fx.abs());
        assert_relative_eq!(result.total.z, fx, epsilon = 1.0e-9 * fx.abs());
    }

    #[test]
    fn reactions_balance_the_applied_load(
        points in arb_upright(),
        fx in -3000.0..3000.0f64,
        fy in -3000.0..3000.0f64,
        fz in -3000.0..3000.0f64,
    ) {
        let members = default_members();
        let load = force(fx, fy, fz);
        let reactions = solve_linkage(&points, &members, "CP", LengthUnit::Millimetre, load)
            .expect("perturbed upright stays determinate");

        let mut balance = nalgebra::Vector3::zeros();
        let mut moment = nalgebra::Vector3::zeros();
        let origin = points.get("CP").expect("reference point").to_vector();
        for member in &members {
            let from = points.get(&member.from).expect("known label").to_vector();
            let to = points.get(&member.to).expect("known label").to_vector();
            let at = points.get(&member.application).expect("known label").to_vector();
            let reaction = (to - from).normalize() * reactions.get(&member.name).expect("solved");
            balance += reaction;
            moment += ((at - origin) / 1000.0).cross(&reaction);
        }
        assert_relative_eq!(balance, load.to_vector(), epsilon = 1.0e-6);
        assert_relative_eq!(moment, nalgebra::Vector3::zeros(), epsilon = 1.0e-6);
    }

    #[test]
    fn load_transfer_grows_with_cg_height(
        mass in 100.0..400.0f64,
        accel in 0.1..15.0f64,
        track in 800.0..1600.0f64,
        rc_height in -50.0..150.0f64,
    ) {
        let load = VehicleLoad::new(mass, accel, track, rc_height, 40.0, 280.0).expect("valid load");
        let sweep = CgSweep::new(load, SweepRange::new(200.0, 700.0, 25.0).expect("valid range"));
        let rows: Vec<_> = sweep.rows().collect();
        for pair in rows.windows(2) {
            prop_assert!(pair[1].load_transfer >= pair[0].load_transfer);
            prop_assert!(pair[1].fz_inner <= pair[0].fz_inner);
        }
    }

    #[test]
    fn limit_status_is_monotonic_towards_horizontal(
        load in 1000.0..5000.0f64,
        limit in 2000.0..10000.0f64,
    ) {
        let sweep = ForceAngleSweep::new(
            load, 10.0, 20.0, 0.5, 0.5, limit,
            AngleRange::new(0, 65, 5).expect("valid range"),
        )
        .expect("valid sweep");
        let statuses: Vec<ArmStatus> = sweep.rows().map(|row| row.status).collect();
        if let Some(flip) = statuses.iter().position(|s| *s == ArmStatus::Limit) {
            prop_assert!(statuses[flip..].iter().all(|s| *s == ArmStatus::Limit));
        }
    }
}
