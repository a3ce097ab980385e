//! JSON case files.
//!
//! Every section is optional in the file and only required by the command
//! that reads it. Scalars may be written as numbers or as text using either
//! decimal separator (`"12,5"`).

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use wishbone::{
    default_members, parse_decimal, AngleRange, CgSweep, Force, ForceAngleSweep, GeometryError,
    HardpointSet, LengthUnit, MassSweep, MemberSections, Point2D, Point3D, ReactionMember,
    SuspensionGeometry2D, SuspensionGeometry3D, SweepError, SweepRange, VehicleGeometry,
    VehicleLoad,
};

/// A scalar written either as a JSON number or as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Decimal {
    /// Plain JSON number.
    Number(f64),
    /// Hand-typed text such as `"0,5"`.
    Text(String),
}

/// Deserialise a scalar through [`parse_decimal`] when it is given as text.
fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Decimal::deserialize(deserializer)? {
        Decimal::Number(value) => Ok(value),
        Decimal::Text(text) => parse_decimal(&text).map_err(serde::de::Error::custom),
    }
}

/// [`decimal`] for a scalar that may be absent or `null`.
fn optional_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<Decimal>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Decimal::Number(value)) => Ok(Some(value)),
        Some(Decimal::Text(text)) => parse_decimal(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Default stiffness share of an arm.
fn unit_stiffness() -> f64 {
    1.0
}

/// Inner wheel angles evaluated when a case lists none.
fn default_inner_angles() -> Vec<f64> {
    vec![10.0, 20.0, 30.0]
}

/// Contents of a case file.
#[derive(Debug, Default, Deserialize)]
pub struct Case {
    /// Front-view hardpoints.
    pub front_view: Option<FrontViewInput>,
    /// 3D arm hardpoints and load.
    pub arms_3d: Option<Arms3dInput>,
    /// Whole-vehicle dimensions for steering.
    pub vehicle: Option<VehicleInput>,
    /// Six-member upright.
    pub equilibrium: Option<EquilibriumInput>,
    /// CG-height sweep.
    pub cg_sweep: Option<CgSweepInput>,
    /// Mass sweep.
    pub mass_sweep: Option<MassSweepInput>,
    /// Arm inclination sweep.
    pub angle_sweep: Option<AngleSweepInput>,
}

impl Case {
    /// Read and parse a case file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading case file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing case file {}", path.display()))
    }

    /// Return `section` or an error naming it.
    pub fn require<'a, T>(section: Option<&'a T>, name: &str) -> Result<&'a T> {
        section.with_context(|| format!("case file has no `{name}` section"))
    }
}

/// Front-view section.
#[derive(Debug, Deserialize)]
pub struct FrontViewInput {
    /// Track width.
    #[serde(deserialize_with = "decimal")]
    pub track: f64,
    /// Upper arm chassis pivot.
    pub upper_in: Point2D,
    /// Upper ball joint.
    pub upper_out: Point2D,
    /// Lower arm chassis pivot.
    pub lower_in: Point2D,
    /// Lower ball joint.
    pub lower_out: Point2D,
    /// Outer wheel travel.
    #[serde(default, deserialize_with = "decimal")]
    pub s1: f64,
    /// Inner wheel travel.
    #[serde(default, deserialize_with = "decimal")]
    pub s2: f64,
    /// Outer wheel camber.
    #[serde(default, deserialize_with = "decimal")]
    pub camber_out: f64,
    /// Inner wheel camber.
    #[serde(default, deserialize_with = "decimal")]
    pub camber_in: f64,
}

impl TryFrom<&FrontViewInput> for SuspensionGeometry2D {
    type Error = GeometryError;

    fn try_from(input: &FrontViewInput) -> Result<Self, GeometryError> {
        Ok(SuspensionGeometry2D::new(
            input.track,
            input.upper_in,
            input.upper_out,
            input.lower_in,
            input.lower_out,
        )?
        .with_travel(input.s1, input.s2)
        .with_camber(input.camber_out, input.camber_in))
    }
}

/// Braking case for anti-dive.
#[derive(Debug, Deserialize)]
pub struct AntiDiveInput {
    /// Braking force at the wheel.
    #[serde(deserialize_with = "decimal")]
    pub braking_force: f64,
    /// CG height.
    #[serde(deserialize_with = "decimal")]
    pub cg_height: f64,
    /// Wheelbase.
    #[serde(deserialize_with = "decimal")]
    pub wheelbase: f64,
}

/// 3D arms section.
#[derive(Debug, Deserialize)]
pub struct Arms3dInput {
    /// Upper arm chassis pivot.
    pub upper_in: Point3D,
    /// Upper ball joint.
    pub upper_out: Point3D,
    /// Lower arm chassis pivot.
    pub lower_in: Point3D,
    /// Lower ball joint.
    pub lower_out: Point3D,
    /// Kingpin axis as `[upper, lower]`; the ball joints when absent.
    pub kingpin: Option<[Point3D; 2]>,
    /// Rim reference points as `[front, rear]`.
    pub toe_reference: Option<[Point3D; 2]>,
    /// Upper arm stiffness share.
    #[serde(default = "unit_stiffness", deserialize_with = "decimal")]
    pub stiffness_upper: f64,
    /// Lower arm stiffness share.
    #[serde(default = "unit_stiffness", deserialize_with = "decimal")]
    pub stiffness_lower: f64,
    /// Longitudinal tyre force.
    #[serde(default, deserialize_with = "decimal")]
    pub longitudinal_force: f64,
    /// Track width, used to place the Roll Center in space.
    #[serde(default, deserialize_with = "optional_decimal")]
    pub track: Option<f64>,
    /// Braking case for anti-dive.
    pub anti_dive: Option<AntiDiveInput>,
}

impl TryFrom<&Arms3dInput> for SuspensionGeometry3D {
    type Error = GeometryError;

    fn try_from(input: &Arms3dInput) -> Result<Self, GeometryError> {
        let mut builder = SuspensionGeometry3D::builder(
            input.upper_in,
            input.upper_out,
            input.lower_in,
            input.lower_out,
        )
        .stiffness(input.stiffness_upper, input.stiffness_lower)
        .longitudinal_force(input.longitudinal_force);
        if let Some([upper, lower]) = input.kingpin {
            builder = builder.kingpin(upper, lower);
        }
        if let Some([front, rear]) = input.toe_reference {
            builder = builder.toe_reference(front, rear);
        }
        builder.build()
    }
}

/// Vehicle section for kingpin and steering.
#[derive(Debug, Deserialize)]
pub struct VehicleInput {
    /// Front track.
    #[serde(deserialize_with = "decimal")]
    pub track_front: f64,
    /// Rear track.
    #[serde(deserialize_with = "decimal")]
    pub track_rear: f64,
    /// Wheelbase.
    #[serde(deserialize_with = "decimal")]
    pub wheelbase: f64,
    /// Loaded tyre radius.
    #[serde(deserialize_with = "decimal")]
    pub tire_radius: f64,
    /// Upper ball joint.
    pub upper_ball_joint: Point3D,
    /// Lower ball joint.
    pub lower_ball_joint: Point3D,
    /// Inner wheel angles to evaluate, degrees.
    #[serde(default = "default_inner_angles")]
    pub inner_angles: Vec<f64>,
}

impl TryFrom<&VehicleInput> for VehicleGeometry {
    type Error = GeometryError;

    fn try_from(input: &VehicleInput) -> Result<Self, GeometryError> {
        VehicleGeometry::new(
            input.track_front,
            input.track_rear,
            input.wheelbase,
            input.tire_radius,
            input.upper_ball_joint,
            input.lower_ball_joint,
        )
    }
}

/// Equilibrium section.
#[derive(Debug, Deserialize)]
pub struct EquilibriumInput {
    /// Labelled hardpoints.
    pub hardpoints: HardpointSet,
    /// Members; the stock upright labelling when absent.
    #[serde(default = "default_members")]
    pub members: Vec<ReactionMember>,
    /// Label of the moment reference point.
    pub moment_about: String,
    /// Unit of the hardpoint coordinates.
    #[serde(default)]
    pub unit: LengthUnit,
    /// Load at the contact patch.
    pub load: Force,
    /// Member sections for the strength check; skipped when absent.
    #[serde(default)]
    pub sections: Option<MemberSections>,
}

/// CG-height sweep section.
#[derive(Debug, Deserialize)]
pub struct CgSweepInput {
    /// Vehicle mass.
    #[serde(deserialize_with = "decimal")]
    pub mass: f64,
    /// Lateral acceleration.
    #[serde(deserialize_with = "decimal")]
    pub lateral_accel: f64,
    /// Track width.
    #[serde(deserialize_with = "decimal")]
    pub track: f64,
    /// Roll Center height.
    #[serde(deserialize_with = "decimal")]
    pub roll_center_height: f64,
    /// Scrub radius.
    #[serde(default, deserialize_with = "decimal")]
    pub scrub_radius: f64,
    /// Ground clearance.
    #[serde(default, deserialize_with = "decimal")]
    pub clearance: f64,
    /// CG heights.
    pub cg_height: SweepRange,
}

impl CgSweepInput {
    /// Vehicle parameters of the sweep.
    pub fn load(&self) -> Result<VehicleLoad, GeometryError> {
        VehicleLoad::new(
            self.mass,
            self.lateral_accel,
            self.track,
            self.roll_center_height,
            self.scrub_radius,
            self.clearance,
        )
    }
}

impl TryFrom<&CgSweepInput> for CgSweep {
    type Error = GeometryError;

    fn try_from(input: &CgSweepInput) -> Result<Self, GeometryError> {
        Ok(CgSweep::new(input.load()?, input.cg_height))
    }
}

/// Mass sweep section.
#[derive(Debug, Deserialize)]
pub struct MassSweepInput {
    /// Lateral acceleration.
    #[serde(deserialize_with = "decimal")]
    pub lateral_accel: f64,
    /// Track width.
    #[serde(deserialize_with = "decimal")]
    pub track: f64,
    /// CG height.
    #[serde(deserialize_with = "decimal")]
    pub cg_height: f64,
    /// Roll Center height.
    #[serde(deserialize_with = "decimal")]
    pub roll_center_height: f64,
    /// Masses.
    pub mass: SweepRange,
}

impl TryFrom<&MassSweepInput> for MassSweep {
    type Error = SweepError;

    fn try_from(input: &MassSweepInput) -> Result<Self, SweepError> {
        MassSweep::new(
            input.lateral_accel,
            input.track,
            input.cg_height,
            input.roll_center_height,
            input.mass,
        )
    }
}

/// Arm inclination sweep section.
#[derive(Debug, Deserialize)]
pub struct AngleSweepInput {
    /// Vertical load.
    #[serde(deserialize_with = "decimal")]
    pub load: f64,
    /// Upper arm base inclination.
    #[serde(deserialize_with = "decimal")]
    pub base_sup: f64,
    /// Lower arm base inclination.
    #[serde(deserialize_with = "decimal")]
    pub base_inf: f64,
    /// Upper arm stiffness share.
    #[serde(deserialize_with = "decimal")]
    pub k_sup: f64,
    /// Lower arm stiffness share.
    #[serde(deserialize_with = "decimal")]
    pub k_inf: f64,
    /// Allowable axial force.
    #[serde(deserialize_with = "decimal")]
    pub limit: f64,
    /// Angle deltas.
    pub delta: AngleRange,
}

impl TryFrom<&AngleSweepInput> for ForceAngleSweep {
    type Error = SweepError;

    fn try_from(input: &AngleSweepInput) -> Result<Self, SweepError> {
        ForceAngleSweep::new(
            input.load,
            input.base_sup,
            input.base_inf,
            input.k_sup,
            input.k_inf,
            input.limit,
            input.delta,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_comma_decimals() {
        let case: Case = serde_json::from_str(
            r#"{
                "front_view": {
                    "track": "1200,0",
                    "upper_in": {"x": 250.0, "y": 330.0},
                    "upper_out": {"x": 540.0, "y": 400.0},
                    "lower_in": {"x": 200.0, "y": 110.0},
                    "lower_out": {"x": 560.0, "y": 120.0},
                    "s1": "12,5"
                }
            }"#,
        )
        .expect("valid case");
        let front = case.front_view.expect("section present");
        assert_eq!(front.track, 1200.0);
        assert_eq!(front.s1, 12.5);
        assert_eq!(front.s2, 0.0);
        assert!(SuspensionGeometry2D::try_from(&front).is_ok());
    }

    #[test]
    fn arms_track_accepts_text_or_absence() {
        let arms = |track: &str| -> Arms3dInput {
            serde_json::from_str(&format!(
                r#"{{
                    "upper_in": {{"x": 250.0, "y": 330.0, "z": 0.0}},
                    "upper_out": {{"x": 540.0, "y": 400.0, "z": 0.0}},
                    "lower_in": {{"x": 200.0, "y": 110.0, "z": 0.0}},
                    "lower_out": {{"x": 560.0, "y": 120.0, "z": 0.0}}{track}
                }}"#
            ))
            .expect("valid section")
        };
        assert_eq!(arms(r#", "track": "1200,0""#).track, Some(1200.0));
        assert_eq!(arms(r#", "track": 1150.5"#).track, Some(1150.5));
        assert_eq!(arms(r#", "track": null"#).track, None);
        assert_eq!(arms("").track, None);
    }

    #[test]
    fn missing_section_is_named() {
        let case = Case::default();
        let error = Case::require(case.cg_sweep.as_ref(), "cg_sweep").expect_err("absent");
        assert!(error.to_string().contains("cg_sweep"));
    }

    #[test]
    fn equilibrium_defaults_to_stock_members() {
        let input: EquilibriumInput = serde_json::from_str(
            r#"{
                "hardpoints": {"CP": {"x": 0.0, "y": 0.0, "z": 0.0}},
                "moment_about": "CP",
                "load": {"x": 0.0, "y": 1000.0, "z": 0.0}
            }"#,
        )
        .expect("valid section");
        assert_eq!(input.members, default_members());
        assert_eq!(input.unit, LengthUnit::Millimetre);
        assert!(input.sections.is_none());
    }

    #[test]
    fn invalid_sweep_is_rejected_on_conversion() {
        let input: AngleSweepInput = serde_json::from_str(
            r#"{
                "load": 3000.0, "base_sup": 10.0, "base_inf": 20.0,
                "k_sup": 0.0, "k_inf": 0.0, "limit": 8000.0,
                "delta": {"min": 0, "max": 40, "step": 5}
            }"#,
        )
        .expect("valid section");
        assert_eq!(
            ForceAngleSweep::try_from(&input).expect_err("zero shares"),
            SweepError::InvalidStiffnessSum(0.0)
        );
    }
}
