//! Axial arm forces as the wishbones sweep through inclination angles.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::errors::SweepError;
use crate::range::AngleRange;
use crate::EPSILON;

/// Deviation of the stiffness sum from one that triggers re-scaling.
const STIFFNESS_SUM_TOLERANCE: f64 = 1.0e-5;

/// Whether an arm load stays within the allowable axial force.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArmStatus {
    /// Both arms are within the limit.
    Ok,
    /// At least one arm exceeds the limit.
    Limit,
}

impl fmt::Display for ArmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.pad("OK"),
            Self::Limit => f.pad("LIMIT"),
        }
    }
}

/// Arm forces at one angle delta.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ForceAngleResult {
    /// Angle added to both base inclinations, degrees.
    pub angle_delta: i32,
    /// Axial force in the upper arm, N.
    pub force_sup: f64,
    /// Axial force in the lower arm, N.
    pub force_inf: f64,
    /// Sum of both axial forces, N.
    pub force_total: f64,
    /// Limit check.
    pub status: ArmStatus,
}

/// Sweep of arm inclination under a fixed vertical load.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceAngleSweep {
    /// Vertical load shared by the arms.
    load: f64,
    /// Upper arm inclination at zero delta, degrees.
    base_sup: f64,
    /// Lower arm inclination at zero delta, degrees.
    base_inf: f64,
    /// Upper arm share of the load.
    k_sup: f64,
    /// Lower arm share of the load.
    k_inf: f64,
    /// Allowable axial force.
    limit: f64,
    /// Angle deltas to evaluate.
    range: AngleRange,
}

impl ForceAngleSweep {
    /// Create a sweep. Stiffness shares that do not add up to one are
    /// re-scaled by their sum.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::NonFinite`] for NaN or infinite input and
    /// [`SweepError::InvalidStiffnessSum`] when the shares sum to zero or less.
    ///
    /// # Examples
    /// ```
    /// use wishbone::{AngleRange, ArmStatus, ForceAngleSweep};
    ///
    /// let range = AngleRange::new(0, 40, 5).expect("valid range");
    /// let sweep = ForceAngleSweep::new(3000.0, 10.0, 20.0, 0.5, 0.5, 8000.0, range)
    ///     .expect("valid sweep");
    /// let first = sweep.rows().next().expect("at least one row");
    /// assert_eq!(first.status, ArmStatus::Ok);
    /// ```
    pub fn new(
        load: f64,
        base_sup_deg: f64,
        base_inf_deg: f64,
        k_sup: f64,
        k_inf: f64,
        limit: f64,
        range: AngleRange,
    ) -> Result<Self, SweepError> {
        for (field, value) in [
            ("load", load),
            ("upper base angle", base_sup_deg),
            ("lower base angle", base_inf_deg),
            ("upper stiffness", k_sup),
            ("lower stiffness", k_inf),
            ("force limit", limit),
        ] {
            if !value.is_finite() {
                return Err(SweepError::NonFinite { field });
            }
        }
        let sum = k_sup + k_inf;
        if sum <= 0.0 {
            return Err(SweepError::InvalidStiffnessSum(sum));
        }
        let (k_sup, k_inf) = if (sum - 1.0).abs() > STIFFNESS_SUM_TOLERANCE {
            debug!(sum, "rescaling stiffness shares");
            (k_sup / sum, k_inf / sum)
        } else {
            (k_sup, k_inf)
        };
        Ok(Self {
            load,
            base_sup: base_sup_deg,
            base_inf: base_inf_deg,
            k_sup,
            k_inf,
            limit,
            range,
        })
    }

    /// Stiffness shares after normalisation, upper then lower.
    #[must_use]
    pub fn stiffness(&self) -> (f64, f64) {
        (self.k_sup, self.k_inf)
    }

    /// Evaluate one angle delta. `None` when either arm is horizontal.
    #[must_use]
    pub fn at(&self, angle_delta: i32) -> Option<ForceAngleResult> {
        let delta = f64::from(angle_delta);
        let cos_sup = (self.base_sup + delta).to_radians().cos();
        let cos_inf = (self.base_inf + delta).to_radians().cos();
        if cos_sup.abs() < EPSILON || cos_inf.abs() < EPSILON {
            debug!(angle_delta, "arm horizontal, skipping step");
            return None;
        }
        let force_sup = self.load * self.k_sup / cos_sup;
        let force_inf = self.load * self.k_inf / cos_inf;
        let status = if force_sup.abs() > self.limit || force_inf.abs() > self.limit {
            ArmStatus::Limit
        } else {
            ArmStatus::Ok
        };
        Some(ForceAngleResult {
            angle_delta,
            force_sup,
            force_inf,
            force_total: force_sup + force_inf,
            status,
        })
    }

    /// Defined rows in ascending angle. Each call starts a fresh sequence.
    pub fn rows(&self) -> impl Iterator<Item = ForceAngleResult> + Clone + '_ {
        self.range.values().filter_map(move |delta| self.at(delta))
    }
}
