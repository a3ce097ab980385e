#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use wishbone::{
    load_transfer_components, AngleRange, ArmStatus, CgSweep, ForceAngleSweep, MassSweep,
    SweepRange, VehicleLoad, GRAVITY,
};

fn baja_load() -> VehicleLoad {
    VehicleLoad::new(250.0, 9.81, 1200.0, 50.0, 40.0, 280.0).expect("valid load")
}

#[test]
fn cg_sweep_covers_the_whole_range() {
    let sweep = CgSweep::new(baja_load(), SweepRange::new(300.0, 600.0, 50.0).expect("valid range"));
    let rows: Vec<_> = sweep.rows().collect();
    assert_eq!(rows.len(), 7);
    assert_relative_eq!(rows[0].cg_height, 300.0);
    assert_relative_eq!(rows[6].cg_height, 600.0);

    let fz_static = 250.0 * GRAVITY / 4.0;
    for row in &rows {
        assert_relative_eq!(row.fz_outer + row.fz_inner, 2.0 * fz_static, epsilon = 1.0e-9);
        assert_relative_eq!(row.fz_outer - row.fz_inner, row.load_transfer, epsilon = 1.0e-9);
        // The spindle moment does not depend on CG height.
        assert_relative_eq!(row.spindle_moment, rows[0].spindle_moment);
    }
    assert_relative_eq!(rows[6].load_transfer, 250.0 * 9.81 * 0.5, epsilon = 1.0e-9);
}

#[test]
fn cg_sweep_restarts_on_every_pass() {
    let sweep = CgSweep::new(baja_load(), SweepRange::new(300.0, 400.0, 25.0).expect("valid range"));
    let first: Vec<_> = (&sweep).into_iter().collect();
    let second: Vec<_> = (&sweep).into_iter().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
}

#[test]
fn fractional_steps_reach_the_upper_bound() {
    let sweep = CgSweep::new(baja_load(), SweepRange::new(0.3, 0.9, 0.1).expect("valid range"));
    let last = sweep.rows().last().expect("non-empty sweep");
    assert_relative_eq!(last.cg_height, 0.9, epsilon = 1.0e-12);
    assert_eq!(sweep.rows().count(), 7);
}

#[test]
fn mass_sweep_margin_scales_with_acceleration_only() {
    let sweep = MassSweep::new(
        9.81,
        1200.0,
        500.0,
        50.0,
        SweepRange::new(180.0, 300.0, 20.0).expect("valid range"),
    )
    .expect("valid sweep");
    let rows: Vec<_> = sweep.rows().collect();
    assert_eq!(rows.len(), 7);
    for row in &rows {
        assert_relative_eq!(row.static_stability_factor, 1.2);
        assert_relative_eq!(row.critical_accel, 1.2 * GRAVITY, epsilon = 1.0e-12);
        assert_relative_eq!(row.safety_margin, 9.81 / (1.2 * GRAVITY), epsilon = 1.0e-12);
        assert_relative_eq!(row.roll_moment, row.mass * 9.81 * 0.45, epsilon = 1.0e-9);
    }
    assert!(rows.windows(2).all(|pair| pair[1].load_transfer > pair[0].load_transfer));
}

#[test]
fn load_transfer_splits_at_the_roll_center() {
    let parts = load_transfer_components(&baja_load(), 500.0);
    let lateral = 250.0 * 9.81;
    assert_relative_eq!(parts.total, lateral * 500.0 / 1200.0, epsilon = 1.0e-9);
    assert_relative_eq!(parts.geometric, lateral * 50.0 / 1200.0, epsilon = 1.0e-9);
    assert_relative_eq!(parts.elastic, lateral * 450.0 / 1200.0, epsilon = 1.0e-9);
}

#[test]
fn angle_sweep_flips_to_limit_and_stays_there() {
    let sweep = ForceAngleSweep::new(
        3000.0,
        10.0,
        20.0,
        0.5,
        0.5,
        8000.0,
        AngleRange::new(0, 65, 5).expect("valid range"),
    )
    .expect("valid sweep");
    let rows: Vec<_> = sweep.rows().collect();
    assert_eq!(rows.len(), 14);

    let first = rows[0];
    assert_eq!(first.angle_delta, 0);
    assert_relative_eq!(first.force_sup, 1500.0 / 10.0_f64.to_radians().cos(), epsilon = 1.0e-9);
    assert!((first.force_sup - 1523.1).abs() < 0.1);
    assert_eq!(first.status, ArmStatus::Ok);

    let flip = rows
        .iter()
        .position(|row| row.status == ArmStatus::Limit)
        .expect("limit reached");
    assert_eq!(rows[flip].angle_delta, 60);
    assert_relative_eq!(rows[flip].force_inf, 1500.0 / 80.0_f64.to_radians().cos(), epsilon = 1.0e-6);
    assert!(rows[flip..].iter().all(|row| row.status == ArmStatus::Limit));
    assert!(rows[..flip].iter().all(|row| row.status == ArmStatus::Ok));
}

#[test]
fn angle_sweep_skips_horizontal_arms() {
    let sweep = ForceAngleSweep::new(
        3000.0,
        10.0,
        20.0,
        0.5,
        0.5,
        8000.0,
        AngleRange::new(50, 90, 10).expect("valid range"),
    )
    .expect("valid sweep");
    let deltas: Vec<i32> = sweep.rows().map(|row| row.angle_delta).collect();
    // 70 puts the lower arm at 90 degrees and 80 the upper arm.
    assert_eq!(deltas, [50, 60, 90]);
}
