mod case;
mod report;

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;
use wishbone::{
    ackermann, alignment, analyse_members, anti_dive, build_coefficient_matrix,
    build_load_vector, camber_gain, forces, kingpin_metrics, load_transfer_components,
    roll_center, roll_center_3d, solve_reactions, CgSweep, ForceAngleSweep, MassSweep,
    SuspensionGeometry2D, SuspensionGeometry3D, VehicleGeometry,
};

use case::Case;
use report::{ArmsReport, CgSweepRow, EquilibriumReport, FrontViewReport, SteeringReport};

#[derive(Parser)]
#[command(name = "wishbone")]
#[command(about = "Kinematics and statics of double-wishbone suspensions")]
struct Cmd {
    /// JSON case file describing the suspension
    #[arg(long)]
    case: PathBuf,

    /// Print the result records as JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Log engine decisions to stderr
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum Action {
    /// Instant Center, Roll Center and camber gain in front view
    FrontView,
    /// Arm forces, alignment and anti-dive from the 3D hardpoints
    Arms,
    /// Kingpin geometry and Ackermann angles
    Steering,
    /// Member reactions of the six-link upright, with a strength check when sections are given
    Equilibrium,
    /// Load transfer over a range of CG heights
    CgSweep,
    /// Rollover stability over a range of vehicle masses
    MassSweep,
    /// Arm axial forces over a range of inclinations
    AngleSweep,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::WARN };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let case = Case::from_path(&cmd.case)?;
    tracing::info!(action = ?cmd.action, case = %cmd.case.display(), "evaluating");
    let output = match cmd.action {
        Action::FrontView => front_view(&case, cmd.json),
        Action::Arms => arms(&case, cmd.json),
        Action::Steering => steering(&case, cmd.json),
        Action::Equilibrium => equilibrium(&case, cmd.json),
        Action::CgSweep => cg_sweep(&case, cmd.json),
        Action::MassSweep => mass_sweep(&case, cmd.json),
        Action::AngleSweep => angle_sweep(&case, cmd.json),
    }?;
    println!("{output}");
    Ok(())
}

/// Serialise `record` as JSON, or render it with `text`.
fn render<T: Serialize + ?Sized>(
    json: bool,
    record: &T,
    text: fn(&T) -> Result<String, fmt::Error>,
) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(record)?)
    } else {
        Ok(text(record)?)
    }
}

fn front_view(case: &Case, json: bool) -> Result<String> {
    let input = Case::require(case.front_view.as_ref(), "front_view")?;
    let geo = SuspensionGeometry2D::try_from(input).context("invalid front_view section")?;
    let record = FrontViewReport {
        roll_center: roll_center(&geo),
        camber_gain: camber_gain(&geo),
    };
    render(json, &record, report::front_view)
}

fn arms(case: &Case, json: bool) -> Result<String> {
    let input = Case::require(case.arms_3d.as_ref(), "arms_3d")?;
    let geo = SuspensionGeometry3D::try_from(input).context("invalid arms_3d section")?;
    let arm_forces = forces(&geo);
    let (upper_in, upper_out) = geo.upper_arm();
    let (lower_in, lower_out) = geo.lower_arm();
    let spatial_roll_center = input
        .track
        .map(|track| roll_center_3d(track, upper_in, upper_out, lower_in, lower_out))
        .transpose()
        .context("invalid arms_3d track or front-view projection")?
        .flatten();
    let anti_dive_percent = match (&input.anti_dive, &arm_forces) {
        (Some(braking), Some(result)) => anti_dive(
            braking.braking_force,
            result.total.y,
            braking.cg_height,
            braking.wheelbase,
        ),
        _ => None,
    };
    let record = ArmsReport {
        forces: arm_forces,
        alignment: alignment(&geo),
        roll_center: spatial_roll_center,
        anti_dive: anti_dive_percent,
    };
    render(json, &record, report::arms)
}

fn steering(case: &Case, json: bool) -> Result<String> {
    let input = Case::require(case.vehicle.as_ref(), "vehicle")?;
    let geo = VehicleGeometry::try_from(input).context("invalid vehicle section")?;
    let record = SteeringReport {
        kingpin: kingpin_metrics(&geo),
        ackermann: input
            .inner_angles
            .iter()
            .filter_map(|&angle| ackermann(&geo, angle))
            .collect(),
    };
    render(json, &record, report::steering)
}

fn equilibrium(case: &Case, json: bool) -> Result<String> {
    let input = Case::require(case.equilibrium.as_ref(), "equilibrium")?;
    let matrix = build_coefficient_matrix(
        &input.hardpoints,
        &input.members,
        &input.moment_about,
        input.unit,
    )
    .context("invalid equilibrium section")?;
    let load = build_load_vector(input.load);
    let reactions = solve_reactions(&matrix, &load, &input.members)?;
    let residual = reactions.residual(&matrix, &load);
    tracing::debug!(residual, "equilibrium check");
    let strength = input
        .sections
        .as_ref()
        .map(|sections| analyse_members(&input.hardpoints, &input.members, &reactions, sections))
        .transpose()
        .context("member strength check failed")?;
    let record = EquilibriumReport {
        reactions,
        residual,
        strength,
    };
    render(json, &record, report::equilibrium)
}

fn cg_sweep(case: &Case, json: bool) -> Result<String> {
    let input = Case::require(case.cg_sweep.as_ref(), "cg_sweep")?;
    let sweep = CgSweep::try_from(input).context("invalid cg_sweep section")?;
    let load = input.load()?;
    let rows: Vec<CgSweepRow> = sweep
        .rows()
        .map(|result| CgSweepRow {
            components: load_transfer_components(&load, result.cg_height),
            result,
        })
        .collect();
    render(json, rows.as_slice(), report::cg_sweep)
}

fn mass_sweep(case: &Case, json: bool) -> Result<String> {
    let input = Case::require(case.mass_sweep.as_ref(), "mass_sweep")?;
    let sweep = MassSweep::try_from(input).context("invalid mass_sweep section")?;
    let rows: Vec<_> = sweep.rows().collect();
    render(json, rows.as_slice(), report::mass_sweep)
}

fn angle_sweep(case: &Case, json: bool) -> Result<String> {
    let input = Case::require(case.angle_sweep.as_ref(), "angle_sweep")?;
    let sweep = ForceAngleSweep::try_from(input).context("invalid angle_sweep section")?;
    let rows: Vec<_> = sweep.rows().collect();
    render(json, rows.as_slice(), report::angle_sweep)
}
