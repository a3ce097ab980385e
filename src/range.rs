//! Validated, inclusive sweep ranges.

use serde::{Deserialize, Serialize};

use crate::errors::SweepError;
use crate::EPSILON;

/// Inclusive floating-point range `[min, max]` sampled every `step`.
///
/// Values are computed as `min + i·step` rather than by accumulation, and the
/// upper bound is compared with an [`EPSILON`](crate::EPSILON) tolerance so the
/// final boundary is always produced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct SweepRange {
    /// First value.
    min: f64,
    /// Last value (inclusive).
    max: f64,
    /// Increment between values.
    step: f64,
}

/// Unvalidated form of [`SweepRange`] used for deserialisation.
#[derive(Deserialize)]
struct RawRange {
    /// First value.
    min: f64,
    /// Last value.
    max: f64,
    /// Increment.
    step: f64,
}

impl TryFrom<RawRange> for SweepRange {
    type Error = SweepError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max, raw.step)
    }
}

impl SweepRange {
    /// Create a range.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::NonFinite`] for NaN or infinite input,
    /// [`SweepError::NonPositiveStep`] when `step <= 0`,
    /// [`SweepError::InvertedRange`] when `max < min` and
    /// [`SweepError::TooManyValues`] when the step count does not fit a `u32`.
    ///
    /// # Examples
    /// ```
    /// use wishbone::SweepRange;
    ///
    /// let range = SweepRange::new(0.0, 1.0, 0.1).expect("valid range");
    /// let values: Vec<f64> = range.values().collect();
    /// assert_eq!(values.len(), 11);
    /// ```
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, SweepError> {
        for (field, value) in [("sweep minimum", min), ("sweep maximum", max), ("sweep step", step)] {
            if !value.is_finite() {
                return Err(SweepError::NonFinite { field });
            }
        }
        if step <= 0.0 {
            return Err(SweepError::NonPositiveStep(step));
        }
        if max < min {
            return Err(SweepError::InvertedRange { min, max });
        }
        if (max - min) / step >= f64::from(u32::MAX) {
            return Err(SweepError::TooManyValues { min, max, step });
        }
        Ok(Self { min, max, step })
    }

    /// First value of the range.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Last value of the range.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Increment between values.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Iterate over the sampled values in ascending order.
    #[must_use]
    pub fn values(&self) -> SweepValues {
        SweepValues {
            range: *self,
            index: 0,
        }
    }
}

/// Iterator over the values of a [`SweepRange`].
#[derive(Clone, Debug)]
pub struct SweepValues {
    /// Range being sampled.
    range: SweepRange,
    /// Index of the next value.
    index: u32,
}

impl Iterator for SweepValues {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let value = self.range.min + f64::from(self.index) * self.range.step;
        if value > self.range.max + EPSILON {
            return None;
        }
        self.index = self.index.checked_add(1)?;
        Some(value)
    }
}

impl std::iter::FusedIterator for SweepValues {}

/// Inclusive integer range of angle deltas in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAngleRange")]
pub struct AngleRange {
    /// First delta.
    min: i32,
    /// Last delta (inclusive).
    max: i32,
    /// Increment.
    step: i32,
}

/// Unvalidated form of [`AngleRange`] used for deserialisation.
#[derive(Deserialize)]
struct RawAngleRange {
    /// First delta.
    min: i32,
    /// Last delta.
    max: i32,
    /// Increment.
    step: i32,
}

impl TryFrom<RawAngleRange> for AngleRange {
    type Error = SweepError;

    fn try_from(raw: RawAngleRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max, raw.step)
    }
}

impl AngleRange {
    /// Create an angle range.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::NonPositiveStep`] when `step <= 0` and
    /// [`SweepError::InvertedRange`] when `max < min`.
    pub fn new(min: i32, max: i32, step: i32) -> Result<Self, SweepError> {
        if step <= 0 {
            return Err(SweepError::NonPositiveStep(f64::from(step)));
        }
        if max < min {
            return Err(SweepError::InvertedRange {
                min: f64::from(min),
                max: f64::from(max),
            });
        }
        Ok(Self { min, max, step })
    }

    /// Iterate over the deltas in ascending order.
    pub fn values(&self) -> impl Iterator<Item = i32> + Clone {
        // `step` is validated positive, so the conversion cannot fail.
        let step = usize::try_from(self.step).unwrap_or(1);
        (self.min..=self.max).step_by(step)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn final_boundary_survives_rounding() {
        let values: Vec<f64> = SweepRange::new(0.1, 0.7, 0.1).expect("valid").values().collect();
        assert_eq!(values.len(), 7);
        assert_relative_eq!(*values.last().expect("non-empty"), 0.7, epsilon = 1.0e-12);
    }

    #[test]
    fn single_point_range_yields_once() {
        let values: Vec<f64> = SweepRange::new(250.0, 250.0, 10.0).expect("valid").values().collect();
        assert_eq!(values, [250.0]);
    }

    #[test]
    fn uneven_step_stops_below_maximum() {
        let values: Vec<f64> = SweepRange::new(200.0, 300.0, 30.0).expect("valid").values().collect();
        assert_eq!(values, [200.0, 230.0, 260.0, 290.0]);
    }

    #[test]
    fn step_count_must_fit_the_index() {
        assert_eq!(
            SweepRange::new(0.0, 1.0e10, 1.0).expect_err("ten billion steps"),
            SweepError::TooManyValues {
                min: 0.0,
                max: 1.0e10,
                step: 1.0
            }
        );
        assert!(SweepRange::new(0.0, 4.0e9, 1.0).is_ok());
    }

    #[test]
    fn values_restart_from_the_beginning() {
        let range = SweepRange::new(0.0, 2.0, 1.0).expect("valid");
        let first: Vec<f64> = range.values().collect();
        let second: Vec<f64> = range.values().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert_eq!(
            SweepRange::new(0.0, 1.0, 0.0).expect_err("zero step"),
            SweepError::NonPositiveStep(0.0)
        );
        assert_eq!(
            SweepRange::new(5.0, 1.0, 1.0).expect_err("inverted"),
            SweepError::InvertedRange { min: 5.0, max: 1.0 }
        );
        assert!(matches!(
            SweepRange::new(f64::NAN, 1.0, 1.0).expect_err("nan"),
            SweepError::NonFinite { .. }
        ));
        assert_eq!(
            AngleRange::new(0, 40, -5).expect_err("negative step"),
            SweepError::NonPositiveStep(-5.0)
        );
    }

    #[test]
    fn angle_range_includes_maximum_on_step() {
        let deltas: Vec<i32> = AngleRange::new(0, 40, 5).expect("valid").values().collect();
        assert_eq!(deltas, [0, 5, 10, 15, 20, 25, 30, 35, 40]);
        let deltas: Vec<i32> = AngleRange::new(-10, 10, 7).expect("valid").values().collect();
        assert_eq!(deltas, [-10, -3, 4]);
    }

    #[test]
    fn ranges_deserialise_with_validation() {
        let range: SweepRange =
            serde_json::from_str(r#"{"min": 200.0, "max": 400.0, "step": 50.0}"#).expect("valid");
        assert_eq!(range.values().count(), 5);
        assert!(serde_json::from_str::<SweepRange>(r#"{"min": 1.0, "max": 0.0, "step": 1.0}"#).is_err());
    }
}
