//! Lateral load transfer and rollover stability sweeps.
//!
//! Masses are in kilograms, lateral acceleration in m/s², heights, track and
//! offsets in millimetres. Moments come out in N·m, loads in N.

use serde::Serialize;

use crate::errors::{GeometryError, SweepError};
use crate::range::{SweepRange, SweepValues};
use crate::EPSILON;

/// Standard gravity in m/s².
pub const GRAVITY: f64 = 9.81;

/// Vehicle parameters shared by every step of a CG-height sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleLoad {
    /// Total vehicle mass.
    mass: f64,
    /// Lateral acceleration.
    lateral_accel: f64,
    /// Track width.
    track: f64,
    /// Roll Center height.
    roll_center_height: f64,
    /// Scrub radius.
    scrub_radius: f64,
    /// Ground clearance added to the spindle lever arm.
    clearance: f64,
}

impl VehicleLoad {
    /// Create a load case.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for NaN or infinite input and
    /// [`GeometryError::NonPositiveTrack`] when `track <= 0`.
    pub fn new(
        mass: f64,
        lateral_accel: f64,
        track: f64,
        roll_center_height: f64,
        scrub_radius: f64,
        clearance: f64,
    ) -> Result<Self, GeometryError> {
        let values = [
            mass,
            lateral_accel,
            track,
            roll_center_height,
            scrub_radius,
            clearance,
        ];
        if !values.iter().all(|value| value.is_finite()) {
            return Err(GeometryError::NonFinite {
                field: "vehicle load",
            });
        }
        if track <= 0.0 {
            return Err(GeometryError::NonPositiveTrack(track));
        }
        Ok(Self {
            mass,
            lateral_accel,
            track,
            roll_center_height,
            scrub_radius,
            clearance,
        })
    }

    /// Total lateral force `m·ay` in newtons.
    fn lateral_force(&self) -> f64 {
        self.mass * self.lateral_accel
    }
}

/// One step of a CG-height sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SuspensionResult {
    /// CG height of this step.
    pub cg_height: f64,
    /// Roll moment about the Roll Center, N·m.
    pub roll_moment: f64,
    /// Lateral load transfer across the axle, N.
    pub load_transfer: f64,
    /// Vertical load on the outer wheel, N.
    pub fz_outer: f64,
    /// Vertical load on the inner wheel, N.
    pub fz_inner: f64,
    /// Moment about the steering axis from the lateral tyre force, N·m.
    pub spindle_moment: f64,
}

/// Evaluate the load transfer of `load` at a single CG height.
///
/// # Examples
/// ```
/// use wishbone::{load_transfer_row, VehicleLoad};
///
/// let load = VehicleLoad::new(250.0, 9.81, 1200.0, 50.0, 40.0, 10.0).expect("valid");
/// let row = load_transfer_row(&load, 450.0);
/// assert!(row.fz_outer > row.fz_inner);
/// ```
#[must_use]
pub fn load_transfer_row(load: &VehicleLoad, cg_height: f64) -> SuspensionResult {
    let lateral = load.lateral_force();
    let roll_moment = lateral * (cg_height - load.roll_center_height) / 1000.0;
    let load_transfer = lateral * (cg_height / load.track);
    let fz_static = load.mass * GRAVITY / 4.0;
    let spindle_moment = lateral / 2.0 * (load.scrub_radius + load.clearance) / 1000.0;
    SuspensionResult {
        cg_height,
        roll_moment,
        load_transfer,
        fz_outer: fz_static + load_transfer / 2.0,
        fz_inner: fz_static - load_transfer / 2.0,
        spindle_moment,
    }
}

/// Sweep of CG height for a fixed vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CgSweep {
    /// Fixed vehicle parameters.
    load: VehicleLoad,
    /// CG heights to evaluate.
    range: SweepRange,
}

impl CgSweep {
    /// Create a sweep over `range` CG heights.
    #[must_use]
    pub fn new(load: VehicleLoad, range: SweepRange) -> Self {
        Self { load, range }
    }

    /// Rows in ascending CG height. Each call starts a fresh sequence.
    #[must_use]
    pub fn rows(&self) -> CgSweepRows {
        CgSweepRows {
            load: self.load,
            heights: self.range.values(),
        }
    }
}

impl IntoIterator for &CgSweep {
    type Item = SuspensionResult;
    type IntoIter = CgSweepRows;

    fn into_iter(self) -> CgSweepRows {
        self.rows()
    }
}

/// Lazy iterator over the rows of a [`CgSweep`].
#[derive(Clone, Debug)]
pub struct CgSweepRows {
    /// Fixed vehicle parameters.
    load: VehicleLoad,
    /// Remaining CG heights.
    heights: SweepValues,
}

impl Iterator for CgSweepRows {
    type Item = SuspensionResult;

    fn next(&mut self) -> Option<SuspensionResult> {
        let height = self.heights.next()?;
        Some(load_transfer_row(&self.load, height))
    }
}

/// One step of a mass sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MassScanResult {
    /// Vehicle mass of this step.
    pub mass: f64,
    /// Roll moment about the Roll Center, N·m.
    pub roll_moment: f64,
    /// Lateral load transfer across the axle, N.
    pub load_transfer: f64,
    /// Static stability factor (half track over CG height).
    pub static_stability_factor: f64,
    /// Lateral acceleration at which the vehicle would tip, m/s².
    pub critical_accel: f64,
    /// Applied over critical lateral acceleration.
    pub safety_margin: f64,
}

/// Sweep of vehicle mass at a fixed CG height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassSweep {
    /// Lateral acceleration.
    lateral_accel: f64,
    /// Track width.
    track: f64,
    /// CG height.
    cg_height: f64,
    /// Roll Center height.
    roll_center_height: f64,
    /// Masses to evaluate.
    range: SweepRange,
}

impl MassSweep {
    /// Create a mass sweep.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Geometry`] wrapping
    /// [`GeometryError::NonPositiveTrack`] or
    /// [`GeometryError::NonPositiveCgHeight`], or [`GeometryError::NonFinite`]
    /// for NaN or infinite input.
    pub fn new(
        lateral_accel: f64,
        track: f64,
        cg_height: f64,
        roll_center_height: f64,
        range: SweepRange,
    ) -> Result<Self, SweepError> {
        if ![lateral_accel, track, cg_height, roll_center_height]
            .iter()
            .all(|value| value.is_finite())
        {
            return Err(GeometryError::NonFinite {
                field: "mass sweep parameter",
            }
            .into());
        }
        if track <= 0.0 {
            return Err(GeometryError::NonPositiveTrack(track).into());
        }
        if cg_height <= 0.0 {
            return Err(GeometryError::NonPositiveCgHeight(cg_height).into());
        }
        Ok(Self {
            lateral_accel,
            track,
            cg_height,
            roll_center_height,
            range,
        })
    }

    /// Evaluate a single mass.
    #[must_use]
    pub fn at(&self, mass: f64) -> MassScanResult {
        let lateral = mass * self.lateral_accel;
        let roll_moment = lateral * (self.cg_height - self.roll_center_height) / 1000.0;
        let load_transfer = lateral * (self.cg_height / self.track);
        let static_stability_factor = (self.track / 2.0) / self.cg_height;
        let critical_accel = static_stability_factor * GRAVITY;
        let safety_margin = if critical_accel > EPSILON {
            self.lateral_accel / critical_accel
        } else {
            0.0
        };
        MassScanResult {
            mass,
            roll_moment,
            load_transfer,
            static_stability_factor,
            critical_accel,
            safety_margin,
        }
    }

    /// Rows in ascending mass. Each call starts a fresh sequence.
    pub fn rows(&self) -> impl Iterator<Item = MassScanResult> + Clone + '_ {
        self.range.values().map(move |mass| self.at(mass))
    }
}

/// Split of the lateral load transfer between links and springs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LoadTransferComponents {
    /// Total load transfer, N.
    pub total: f64,
    /// Part reacted through the arms via the Roll Center, N.
    pub geometric: f64,
    /// Part reacted through the springs via the roll arm, N.
    pub elastic: f64,
}

/// Decompose the load transfer at `cg_height` into geometric and elastic parts.
#[must_use]
pub fn load_transfer_components(load: &VehicleLoad, cg_height: f64) -> LoadTransferComponents {
    let lateral = load.lateral_force();
    LoadTransferComponents {
        total: lateral * (cg_height / load.track),
        geometric: lateral * (load.roll_center_height / load.track),
        elastic: lateral * ((cg_height - load.roll_center_height) / load.track),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn baja() -> VehicleLoad {
        VehicleLoad::new(250.0, 9.81, 1200.0, 50.0, 40.0, 10.0).expect("valid load")
    }

    #[test]
    fn single_row_matches_hand_calculation() {
        let row = load_transfer_row(&baja(), 450.0);
        let lateral = 250.0 * 9.81;
        assert_relative_eq!(row.roll_moment, lateral * 0.4, epsilon = 1.0e-9);
        assert_relative_eq!(row.load_transfer, lateral * 450.0 / 1200.0, epsilon = 1.0e-9);
        let fz_static = 250.0 * GRAVITY / 4.0;
        assert_relative_eq!(row.fz_outer, fz_static + row.load_transfer / 2.0);
        assert_relative_eq!(row.fz_inner, fz_static - row.load_transfer / 2.0);
        assert_relative_eq!(row.spindle_moment, lateral / 2.0 * 0.05, epsilon = 1.0e-9);
    }

    #[test]
    fn cg_sweep_is_ordered_and_restartable() {
        let sweep = CgSweep::new(baja(), SweepRange::new(300.0, 500.0, 50.0).expect("valid"));
        let heights: Vec<f64> = sweep.rows().map(|row| row.cg_height).collect();
        assert_eq!(heights, [300.0, 350.0, 400.0, 450.0, 500.0]);
        let again: Vec<SuspensionResult> = (&sweep).into_iter().collect();
        assert_eq!(again, sweep.rows().collect::<Vec<_>>());
    }

    #[test]
    fn mass_sweep_reports_stability() {
        let sweep = MassSweep::new(9.81, 1200.0, 400.0, 50.0, SweepRange::new(200.0, 300.0, 50.0).expect("valid"))
            .expect("valid sweep");
        let rows: Vec<MassScanResult> = sweep.rows().collect();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_relative_eq!(row.static_stability_factor, 1.5);
            assert_relative_eq!(row.critical_accel, 1.5 * GRAVITY);
            assert_relative_eq!(row.safety_margin, 9.81 / (1.5 * GRAVITY));
        }
        assert_relative_eq!(rows[2].load_transfer, 300.0 * 9.81 / 3.0, epsilon = 1.0e-9);
    }

    #[test]
    fn mass_sweep_rejects_grounded_cg() {
        let error = MassSweep::new(9.81, 1200.0, 0.0, 50.0, SweepRange::new(200.0, 300.0, 50.0).expect("valid"))
            .expect_err("zero cg height");
        assert_eq!(error, SweepError::Geometry(GeometryError::NonPositiveCgHeight(0.0)));
    }

    #[test]
    fn components_add_up_to_total() {
        let parts = load_transfer_components(&baja(), 420.0);
        assert_relative_eq!(parts.geometric + parts.elastic, parts.total, epsilon = 1.0e-9);
        assert_relative_eq!(parts.geometric, 250.0 * 9.81 * 50.0 / 1200.0, epsilon = 1.0e-9);
    }

    #[test]
    fn zero_track_is_rejected() {
        assert_eq!(
            VehicleLoad::new(250.0, 9.81, 0.0, 50.0, 40.0, 10.0).expect_err("zero track"),
            GeometryError::NonPositiveTrack(0.0)
        );
    }
}
