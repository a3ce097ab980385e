use std::fmt::{self, Write};

use serde::Serialize;
use wishbone::{
    AlignmentResult, CamberGainResult, ForceAngleResult, ForceResult3D, ForceVector,
    KingpinResult, LoadTransferComponents, MassScanResult, MemberStrength, Point2D, Point3D,
    Reactions, RollCenterResult, SteeringResult, SuspensionResult,
};

/// Text printed for quantities with no value.
const UNDETERMINED: &str = "undetermined";

/// Front-view kinematics of one corner.
#[derive(Debug, Serialize)]
pub struct FrontViewReport {
    /// Instant Center and Roll Center.
    pub roll_center: RollCenterResult,
    /// Camber gain from the measured travel and camber.
    pub camber_gain: CamberGainResult,
}

/// 3D arm analysis of one corner.
#[derive(Debug, Serialize)]
pub struct ArmsReport {
    /// Arm forces, absent when the arms cannot react the load.
    pub forces: Option<ForceResult3D>,
    /// Alignment angles.
    pub alignment: AlignmentResult,
    /// Roll Center placed in space, when a track width was given.
    pub roll_center: Option<Point3D>,
    /// Anti-dive percentage, when a braking case was given.
    pub anti_dive: Option<f64>,
}

/// Kingpin geometry and Ackermann angles.
#[derive(Debug, Serialize)]
pub struct SteeringReport {
    /// Kingpin metrics.
    pub kingpin: KingpinResult,
    /// One entry per defined inner wheel angle.
    pub ackermann: Vec<SteeringResult>,
}

/// Solved upright reactions.
#[derive(Debug, Serialize)]
pub struct EquilibriumReport {
    /// Member reactions.
    pub reactions: Reactions,
    /// Largest force or moment imbalance left by the solution.
    pub residual: f64,
    /// Stress and buckling check, when member sections were given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<Vec<MemberStrength>>,
}

/// One CG height with its load-transfer split.
#[derive(Debug, Serialize)]
pub struct CgSweepRow {
    /// Loads at this height.
    #[serde(flatten)]
    pub result: SuspensionResult,
    /// Geometric and elastic parts of the load transfer.
    pub components: LoadTransferComponents,
}

/// Format an optional value with `decimals` places, or [`UNDETERMINED`].
fn value(quantity: Option<f64>, decimals: usize, unit: &str) -> String {
    match quantity {
        Some(v) => format!("{v:.decimals$} {unit}").trim_end().to_owned(),
        None => UNDETERMINED.to_owned(),
    }
}

/// Format an optional front-view point.
fn point_text(point: Option<Point2D>) -> String {
    point.map_or_else(
        || UNDETERMINED.to_owned(),
        |p| format!("({:.2}, {:.2}) mm", p.x, p.y),
    )
}

/// Render the front-view report.
pub fn front_view(report: &FrontViewReport) -> Result<String, fmt::Error> {
    let mut output = String::new();
    let rc = &report.roll_center;
    let gain = &report.camber_gain;

    writeln!(&mut output, "Front-view kinematics")?;
    writeln!(&mut output, "Instant Center: {}", point_text(rc.instant_center))?;
    writeln!(&mut output, "Roll Center: {}", point_text(rc.point))?;
    writeln!(&mut output, "Roll Center height: {}", value(rc.height, 2, "mm"))?;
    writeln!(&mut output, "Curvature factor q: {}", value(rc.q_factor, 4, ""))?;
    writeln!(&mut output, "Roll angle: {:.4} deg", gain.roll_angle_deg)?;
    writeln!(&mut output, "Camber change: {:.4} deg", gain.camber_change_deg)?;
    writeln!(
        &mut output,
        "Camber factor: {}",
        value(gain.camber_factor, 4, "deg/deg")
    )?;
    Ok(output)
}

/// Append one arm's force line.
fn arm_line(output: &mut String, name: &str, arm: &ForceVector) -> fmt::Result {
    writeln!(
        output,
        "  {name}: axial = {:+.1} N over {:.1} mm, (Fx, Fy, Fz) = ({:+.1}, {:+.1}, {:+.1}) N",
        arm.axial, arm.length, arm.components.x, arm.components.y, arm.components.z
    )
}

/// Render the 3D arms report.
pub fn arms(report: &ArmsReport) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(&mut output, "Arm forces")?;
    match &report.forces {
        Some(forces) => {
            arm_line(&mut output, "upper", &forces.upper)?;
            arm_line(&mut output, "lower", &forces.lower)?;
            writeln!(
                &mut output,
                "  total: ({:+.1}, {:+.1}, {:+.1}) N",
                forces.total.x, forces.total.y, forces.total.z
            )?;
        }
        None => writeln!(&mut output, "  {UNDETERMINED}")?,
    }

    let alignment = &report.alignment;
    writeln!(&mut output, "Alignment")?;
    writeln!(&mut output, "  camber: {}", value(alignment.camber, 3, "deg"))?;
    writeln!(&mut output, "  caster: {}", value(alignment.caster, 3, "deg"))?;
    writeln!(&mut output, "  toe: {}", value(alignment.toe, 3, "deg"))?;
    writeln!(
        &mut output,
        "  Instant Center: {}",
        point_text(alignment.instant_center)
    )?;

    if let Some(rc) = report.roll_center {
        writeln!(
            &mut output,
            "Roll Center: ({:.2}, {:.2}, {:.2}) mm",
            rc.x, rc.y, rc.z
        )?;
    }
    writeln!(&mut output, "Anti-dive: {}", value(report.anti_dive, 1, "%"))?;
    Ok(output)
}

/// Render the steering report.
pub fn steering(report: &SteeringReport) -> Result<String, fmt::Error> {
    let mut output = String::new();
    let kingpin = &report.kingpin;

    writeln!(&mut output, "Kingpin")?;
    writeln!(&mut output, "  inclination: {}", value(kingpin.kpi, 3, "deg"))?;
    writeln!(&mut output, "  caster: {}", value(kingpin.caster, 3, "deg"))?;
    writeln!(&mut output, "  scrub radius: {}", value(kingpin.scrub_radius, 2, "mm"))?;
    writeln!(
        &mut output,
        "  mechanical trail: {}",
        value(kingpin.mechanical_trail, 2, "mm")
    )?;

    writeln!(&mut output, "Ackermann")?;
    if report.ackermann.is_empty() {
        writeln!(&mut output, "  {UNDETERMINED}")?;
    }
    for row in &report.ackermann {
        writeln!(
            &mut output,
            "  inner {:>6.2} deg -> outer {:>6.2} deg, radius {:.2} m",
            row.inner_angle_deg, row.outer_angle_deg, row.turning_radius_m
        )?;
    }
    Ok(output)
}

/// Render the equilibrium report.
pub fn equilibrium(report: &EquilibriumReport) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(&mut output, "Member reactions (positive along from -> to)")?;
    for reaction in &report.reactions {
        writeln!(&mut output, "  {:<8} {:>+12.2} N", reaction.member, reaction.force)?;
    }
    writeln!(&mut output, "Residual: {:.3e}", report.residual)?;
    if let Some(rows) = &report.strength {
        writeln!(&mut output)?;
        output.push_str(&strength(rows)?);
    }
    Ok(output)
}

/// Render the member stress and buckling table.
pub fn strength(rows: &[MemberStrength]) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(
        &mut output,
        "  {:<8} {:>10} {:>12} {:>12} {:>10} {:>10}",
        "member", "L", "stress", "P_cr [N]", "SF_buck", "SF_yield"
    )?;
    for row in rows {
        writeln!(
            &mut output,
            "  {:<8} {:>10.1} {:>+12.2} {:>12.1} {:>10} {:>10}",
            row.member,
            row.length,
            row.normal_stress,
            row.critical_buckling_force,
            factor(row.buckling_safety_factor),
            factor(row.stress_safety_factor),
        )?;
    }
    Ok(output)
}

/// Safety factor to two decimals, or `-` for an unloaded member.
fn factor(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.2}"))
}

/// Render the CG-height sweep table.
pub fn cg_sweep(rows: &[CgSweepRow]) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(
        &mut output,
        "{:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "h [mm]", "M_roll", "dFz [N]", "geom [N]", "elast [N]", "Fz_out", "Fz_in", "M_sp"
    )?;
    for row in rows {
        let r = &row.result;
        writeln!(
            &mut output,
            "{:>8.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1}",
            r.cg_height,
            r.roll_moment,
            r.load_transfer,
            row.components.geometric,
            row.components.elastic,
            r.fz_outer,
            r.fz_inner,
            r.spindle_moment
        )?;
    }
    Ok(output)
}

/// Render the mass sweep table.
pub fn mass_sweep(rows: &[MassScanResult]) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(
        &mut output,
        "{:>8} {:>10} {:>10} {:>8} {:>10} {:>8}",
        "m [kg]", "M_roll", "dFz [N]", "SSF", "ay_crit", "margin"
    )?;
    for row in rows {
        writeln!(
            &mut output,
            "{:>8.1} {:>10.1} {:>10.1} {:>8.3} {:>10.2} {:>8.3}",
            row.mass,
            row.roll_moment,
            row.load_transfer,
            row.static_stability_factor,
            row.critical_accel,
            row.safety_margin
        )?;
    }
    Ok(output)
}

/// Render the arm inclination sweep table.
pub fn angle_sweep(rows: &[ForceAngleResult]) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(
        &mut output,
        "{:>6} {:>12} {:>12} {:>12} {:>7}",
        "d [deg]", "upper [N]", "lower [N]", "total [N]", "status"
    )?;
    for row in rows {
        writeln!(
            &mut output,
            "{:>6} {:>12.1} {:>12.1} {:>12.1} {:>7}",
            row.angle_delta, row.force_sup, row.force_inf, row.force_total, row.status
        )?;
    }
    Ok(output)
}
