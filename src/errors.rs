//! Error types produced while validating inputs or solving a linkage.
//!
//! Quantities that merely have no physical value for a given input (parallel
//! arms, a horizontal arm in an angle sweep) are reported as `None` by the
//! calculators instead. The enums below are reserved for inputs that are
//! themselves invalid.

use thiserror::Error;

/// Identifies one of the two control arms of a double wishbone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arm {
    /// Upper control arm.
    Upper,
    /// Lower control arm.
    Lower,
}

impl std::fmt::Display for Arm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arm::Upper => f.write_str("upper"),
            Arm::Lower => f.write_str("lower"),
        }
    }
}

/// Error returned when suspension geometry or vehicle parameters are rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeometryError {
    /// Returned when a coordinate or scalar is NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite {
        /// Name of the offending input.
        field: &'static str,
    },
    /// Returned when both endpoints of an arm are the same point.
    #[error("{arm} arm endpoints coincide; the arm has no line of action")]
    CoincidentArmEndpoints {
        /// The degenerate arm.
        arm: Arm,
    },
    /// Returned when the upper and lower arms lie on the same line.
    #[error("upper and lower arm lines coincide")]
    CoincidentArmLines,
    /// Returned when an arm stiffness ratio is negative.
    #[error("{arm} arm stiffness ratio must not be negative (received {value})")]
    NegativeStiffness {
        /// Arm whose ratio was rejected.
        arm: Arm,
        /// Rejected ratio.
        value: f64,
    },
    /// Returned when the track width is zero or negative.
    #[error("track width must be positive (received {0} mm)")]
    NonPositiveTrack(f64),
    /// Returned when the centre of gravity height is zero or negative.
    #[error("centre of gravity height must be positive (received {0} mm)")]
    NonPositiveCgHeight(f64),
}

/// Error returned when a six-member linkage cannot be solved.
///
/// Naming problems (`UnknownReferencePoint`, `UnknownHardpoint`,
/// `MemberCount`) are configuration errors; `DuplicateHardpoints` and
/// `SingularSystem` mean the geometry itself cannot react the load.
///
/// # Examples
///
/// ```
/// use wishbone::{default_members, solve_linkage, force, EquilibriumError, HardpointSet, LengthUnit};
///
/// let points = HardpointSet::new();
/// let error = solve_linkage(&points, &default_members(), "O", LengthUnit::Millimetre, force(0.0, 0.0, 1.0))
///     .expect_err("empty hardpoint set is rejected");
/// assert_eq!(error, EquilibriumError::UnknownReferencePoint("O".to_owned()));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EquilibriumError {
    /// Returned when the moment reference point is not among the hardpoints.
    #[error("moment reference point '{0}' does not exist in the hardpoint set")]
    UnknownReferencePoint(String),
    /// Returned when a member refers to a hardpoint that does not exist.
    #[error("hardpoint '{label}' not found (member {member})")]
    UnknownHardpoint {
        /// Member that references the missing hardpoint.
        member: String,
        /// Missing hardpoint label.
        label: String,
    },
    /// Returned when the two endpoints of a member coincide.
    #[error("member {member} has coincident endpoints (duplicate hardpoints)")]
    DuplicateHardpoints {
        /// Member with no defined direction.
        member: String,
    },
    /// Returned when the linkage does not have exactly six members.
    #[error("a statically determinate linkage needs exactly 6 members (received {0})")]
    MemberCount(usize),
    /// Returned when the coefficient matrix cannot be inverted.
    #[error(
        "equilibrium matrix is singular (normalised determinant {normalised_determinant:.3e}); \
         the members do not form a determinate support"
    )]
    SingularSystem {
        /// `|det A|` divided by the product of the column norms of `A`.
        normalised_determinant: f64,
    },
}

/// Error returned when sweep parameters are rejected before any computation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SweepError {
    /// Returned when a bound or step is NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite {
        /// Name of the offending input.
        field: &'static str,
    },
    /// Returned when the step is zero or negative.
    #[error("sweep step must be positive (received {0})")]
    NonPositiveStep(f64),
    /// Returned when the upper bound is below the lower bound.
    #[error("sweep maximum {max} is below minimum {min}")]
    InvertedRange {
        /// Lower bound supplied.
        min: f64,
        /// Upper bound supplied.
        max: f64,
    },
    /// Returned when the range holds more values than a sweep can index.
    #[error("sweep from {min} to {max} needs more than u32::MAX steps of {step}")]
    TooManyValues {
        /// Lower bound supplied.
        min: f64,
        /// Upper bound supplied.
        max: f64,
        /// Step supplied.
        step: f64,
    },
    /// Returned when the arm stiffness fractions cannot be normalised.
    #[error("arm stiffness fractions must have a positive sum (received {0})")]
    InvalidStiffnessSum(f64),
    /// Returned when the vehicle parameters of a sweep are invalid.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Error returned when a member section or a strength check is rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StrengthError {
    /// Returned when a dimension or material property is not a positive number.
    #[error("{field} must be positive and finite (received {value})")]
    NonPositive {
        /// Name of the offending input.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when a tube wall does not fit inside the section.
    #[error("wall thickness {thickness} exceeds half the section ({limit})")]
    WallTooThick {
        /// Wall thickness supplied.
        thickness: f64,
        /// Largest wall the section allows.
        limit: f64,
    },
    /// Returned when a member has neither its own section nor a default.
    #[error("no section given for member {0}")]
    MissingSection(String),
    /// Returned when a member has no solved reaction.
    #[error("no reaction solved for member {0}")]
    MissingReaction(String),
    /// Returned when a member endpoint is not in the hardpoint set.
    #[error("hardpoint '{label}' not found (member {member})")]
    UnknownHardpoint {
        /// Member that references the missing hardpoint.
        member: String,
        /// Missing hardpoint label.
        label: String,
    },
    /// Returned when a member has no length to buckle over.
    #[error("member {0} has zero length")]
    ZeroLength(String),
}

/// Error returned when numeric text cannot be parsed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// Returned for blank input.
    #[error("value is empty")]
    Empty,
    /// Returned when the text is not a number.
    #[error("'{0}' is not a number")]
    NotANumber(String),
}
