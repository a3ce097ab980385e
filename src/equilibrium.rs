//! Static equilibrium of an upright supported by six two-force members.
//!
//! Each member reacts a scalar force along its own axis. Force balance gives
//! three equations and moment balance about a reference hardpoint gives three
//! more, so six members are exactly determined:
//!
//! ```text
//! | u_1        ...  u_6       | | R_1 |   | F |
//! | r_1 × u_1  ...  r_6 × u_6 | | ... | = | 0 |
//!                               | R_6 |
//! ```

use std::collections::BTreeMap;

use nalgebra::{Matrix6, Vector6};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::EquilibriumError;
use crate::geometry::{unit_vector, Force, Point3D};

/// Number of members (and equations) in a determinate linkage.
pub const MEMBER_COUNT: usize = 6;

/// Smallest separation between member endpoints, in hardpoint units.
pub const DIRECTION_EPSILON: f64 = 1.0e-12;

/// Lower bound on `|det A| / Π‖col_j‖` below which the system is singular.
pub const SINGULAR_TOLERANCE: f64 = 1.0e-10;

/// Unit in which hardpoint coordinates are expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Millimetres; moment arms are converted to metres.
    #[default]
    #[serde(alias = "mm")]
    Millimetre,
    /// Metres.
    #[serde(alias = "m")]
    Metre,
}

impl LengthUnit {
    /// Factor converting a length in this unit to metres.
    #[must_use]
    pub fn to_metres(self) -> f64 {
        match self {
            LengthUnit::Millimetre => 1.0e-3,
            LengthUnit::Metre => 1.0,
        }
    }
}

/// Named hardpoints of a linkage.
///
/// Serialises as a plain map from label to `{x, y, z}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HardpointSet {
    /// Points keyed by label.
    points: BTreeMap<String, Point3D>,
}

impl HardpointSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a hardpoint, returning the previous position.
    pub fn insert(&mut self, label: impl Into<String>, point: Point3D) -> Option<Point3D> {
        self.points.insert(label.into(), point)
    }

    /// Look up a hardpoint by label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<Point3D> {
        self.points.get(label).copied()
    }

    /// Number of hardpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return `true` when the set holds no hardpoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over `(label, point)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Point3D)> {
        self.points.iter().map(|(label, point)| (label.as_str(), *point))
    }
}

impl<S: Into<String>> FromIterator<(S, Point3D)> for HardpointSet {
    fn from_iter<I: IntoIterator<Item = (S, Point3D)>>(iter: I) -> Self {
        Self {
            points: iter
                .into_iter()
                .map(|(label, point)| (label.into(), point))
                .collect(),
        }
    }
}

/// A two-force member identified by hardpoint labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionMember {
    /// Name reported alongside the solved reaction.
    pub name: String,
    /// Label of the endpoint the direction vector starts from.
    pub from: String,
    /// Label of the endpoint the direction vector points to.
    pub to: String,
    /// Label of the point where the line of action meets the upright.
    #[serde(rename = "at")]
    pub application: String,
}

impl ReactionMember {
    /// Create a member from its name and three hardpoint labels.
    pub fn new(
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        application: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
            application: application.into(),
        }
    }

    /// Resolve one of this member's labels against the hardpoint set.
    fn resolve(&self, points: &HardpointSet, label: &str) -> Result<Point3D, EquilibriumError> {
        points
            .get(label)
            .ok_or_else(|| EquilibriumError::UnknownHardpoint {
                member: self.name.clone(),
                label: label.to_owned(),
            })
    }
}

/// The stock six-member upright: two members from each arm apex, a tie rod
/// and a push rod, each applied at its outboard end.
#[must_use]
pub fn default_members() -> Vec<ReactionMember> {
    [
        ("R_G", "A", "G"),
        ("R_K", "A", "K"),
        ("R_E", "B", "E"),
        ("R_D", "B", "D"),
        ("R_J", "I", "J"),
        ("R_H", "Q", "H"),
    ]
    .into_iter()
    .map(|(name, from, to)| ReactionMember::new(name, from, to, to))
    .collect()
}

/// Assemble the 6×6 coefficient matrix of a linkage.
///
/// Column `j` holds the unit direction `u_j` of member `j` in its first three
/// rows and the moment `r_j × u_j` about `moment_about` in its last three,
/// with `r_j` converted to metres according to `unit`.
///
/// # Errors
///
/// Returns [`EquilibriumError::UnknownReferencePoint`] or
/// [`EquilibriumError::UnknownHardpoint`] for missing labels,
/// [`EquilibriumError::MemberCount`] unless exactly six members are given, and
/// [`EquilibriumError::DuplicateHardpoints`] when a member has coincident
/// endpoints.
pub fn build_coefficient_matrix(
    points: &HardpointSet,
    members: &[ReactionMember],
    moment_about: &str,
    unit: LengthUnit,
) -> Result<Matrix6<f64>, EquilibriumError> {
    let origin = points
        .get(moment_about)
        .ok_or_else(|| EquilibriumError::UnknownReferencePoint(moment_about.to_owned()))?;
    if members.len() != MEMBER_COUNT {
        return Err(EquilibriumError::MemberCount(members.len()));
    }

    let scale = unit.to_metres();
    let mut matrix = Matrix6::zeros();
    for (column, member) in members.iter().enumerate() {
        let from = member.resolve(points, &member.from)?;
        let to = member.resolve(points, &member.to)?;
        let application = member.resolve(points, &member.application)?;

        let direction = unit_vector(from, to, DIRECTION_EPSILON).ok_or_else(|| {
            EquilibriumError::DuplicateHardpoints {
                member: member.name.clone(),
            }
        })?;
        let arm = (application.to_vector() - origin.to_vector()) * scale;
        let moment = arm.cross(&direction);

        for axis in 0..3 {
            matrix[(axis, column)] = direction[axis];
            matrix[(axis + 3, column)] = moment[axis];
        }
    }
    Ok(matrix)
}

/// Right-hand side for a pure force applied at the moment reference point.
#[must_use]
pub fn build_load_vector(load: Force) -> Vector6<f64> {
    Vector6::new(load.x, load.y, load.z, 0.0, 0.0, 0.0)
}

/// Solved reaction magnitudes, in member order.
///
/// Positive values act along the member's `from → to` direction.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Reactions {
    /// One row per member.
    rows: Vec<Reaction>,
}

/// Reaction carried by a single member.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reaction {
    /// Member name.
    pub member: String,
    /// Reaction magnitude in newtons.
    pub force: f64,
}

impl Reactions {
    /// Reaction of the member called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.member == name)
            .map(|row| row.force)
    }

    /// Iterate over the reactions in member order.
    pub fn iter(&self) -> std::slice::Iter<'_, Reaction> {
        self.rows.iter()
    }

    /// Reaction magnitudes as a vector, in member order.
    #[must_use]
    pub fn to_vector(&self) -> Vector6<f64> {
        Vector6::from_iterator(self.rows.iter().map(|row| row.force))
    }

    /// Largest absolute entry of `A·x − b`.
    ///
    /// This is the force and moment imbalance left by the solution.
    #[must_use]
    pub fn residual(&self, matrix: &Matrix6<f64>, load: &Vector6<f64>) -> f64 {
        (matrix * self.to_vector() - load).amax()
    }
}

impl<'a> IntoIterator for &'a Reactions {
    type Item = &'a Reaction;
    type IntoIter = std::slice::Iter<'a, Reaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Solve `A·x = b` for the six member reactions.
///
/// # Errors
///
/// Returns [`EquilibriumError::MemberCount`] unless six members are supplied
/// and [`EquilibriumError::SingularSystem`] when the members do not form a
/// determinate support. No approximate solution is returned in that case.
pub fn solve_reactions(
    matrix: &Matrix6<f64>,
    load: &Vector6<f64>,
    members: &[ReactionMember],
) -> Result<Reactions, EquilibriumError> {
    if members.len() != MEMBER_COUNT {
        return Err(EquilibriumError::MemberCount(members.len()));
    }

    let column_norms: f64 = matrix.column_iter().map(|column| column.norm()).product();
    let lu = matrix.lu();
    let normalised_determinant = if column_norms > 0.0 {
        lu.determinant().abs() / column_norms
    } else {
        0.0
    };
    if normalised_determinant < SINGULAR_TOLERANCE {
        debug!(normalised_determinant, "equilibrium matrix is singular");
        return Err(EquilibriumError::SingularSystem {
            normalised_determinant,
        });
    }

    let solution = lu
        .solve(load)
        .ok_or(EquilibriumError::SingularSystem {
            normalised_determinant,
        })?;
    debug!(normalised_determinant, "solved member reactions");

    Ok(Reactions {
        rows: members
            .iter()
            .zip(solution.iter())
            .map(|(member, force)| Reaction {
                member: member.name.clone(),
                force: *force,
            })
            .collect(),
    })
}

/// Build and solve a linkage in one call.
///
/// # Errors
///
/// Propagates every error of [`build_coefficient_matrix`] and
/// [`solve_reactions`].
pub fn solve_linkage(
    points: &HardpointSet,
    members: &[ReactionMember],
    moment_about: &str,
    unit: LengthUnit,
    load: Force,
) -> Result<Reactions, EquilibriumError> {
    let matrix = build_coefficient_matrix(points, members, moment_about, unit)?;
    solve_reactions(&matrix, &build_load_vector(load), members)
}
