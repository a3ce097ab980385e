#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod dynamics;
pub mod equilibrium;
pub mod errors;
pub mod forces;
pub mod geometry;
pub mod input;
pub mod kinematics;
pub mod lines;
pub mod range;
pub mod steering;
pub mod strength;
pub mod structural;

/// Tolerance for geometric degeneracy tests and sweep boundary comparisons.
pub const EPSILON: f64 = 1.0e-9;

pub use dynamics::{
    load_transfer_components, load_transfer_row, CgSweep, LoadTransferComponents,
    MassScanResult, MassSweep, SuspensionResult, VehicleLoad, GRAVITY,
};
pub use equilibrium::{
    build_coefficient_matrix, build_load_vector, default_members, solve_linkage,
    solve_reactions, HardpointSet, LengthUnit, Reaction, ReactionMember, Reactions,
};
pub use errors::{Arm, EquilibriumError, GeometryError, InputError, StrengthError, SweepError};
pub use forces::{
    alignment, anti_dive, forces, AlignmentResult, ForceResult3D, ForceVector,
    SuspensionGeometry3D, SuspensionGeometry3DBuilder,
};
pub use geometry::{distance, force, point2, point3, unit_vector, Force, Point2D, Point3D};
pub use input::parse_decimal;
pub use kinematics::{
    camber_gain, roll_center, roll_center_3d, CamberGainResult, RollCenterResult,
    SuspensionGeometry2D,
};
pub use lines::{intersect, line_through, LineCoefficients};
pub use range::{AngleRange, SweepRange, SweepValues};
pub use steering::{ackermann, kingpin_metrics, KingpinResult, SteeringResult, VehicleGeometry};
pub use structural::{ArmStatus, ForceAngleResult, ForceAngleSweep};
pub use strength::{
    analyse_members, critical_buckling_force, member_strength, normal_stress, Fastening,
    Material, MemberSection, MemberSections, MemberStrength, Profile,
};
