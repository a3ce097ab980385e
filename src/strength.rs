//! Strength of solved members: axial stress, Euler buckling and safety factors.
//!
//! Every member of the upright is a two-force member, so the only stress it
//! carries is the normal stress `F / A`. Compressed members are also checked
//! against the Euler load `π²EI / (KL)²`.
//!
//! Units must be consistent with the hardpoints. With newtons and millimetres,
//! profile dimensions are in millimetres and stresses, Young's modulus and the
//! yield strength are in MPa.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equilibrium::{HardpointSet, ReactionMember, Reactions};
use crate::errors::StrengthError;
use crate::geometry::distance;
use crate::EPSILON;

/// Cross-section of a member. A missing `thickness` means a solid section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Profile {
    /// Round bar or tube.
    Circular {
        /// Outer diameter.
        diameter: f64,
        /// Wall thickness of a tube.
        #[serde(default)]
        thickness: Option<f64>,
    },
    /// Rectangular bar or tube, bending about the axis parallel to `width`.
    Rectangular {
        /// Outer width.
        width: f64,
        /// Outer height.
        height: f64,
        /// Wall thickness of a tube.
        #[serde(default)]
        thickness: Option<f64>,
    },
}

impl Profile {
    /// Check that every dimension is positive and a tube wall fits the section.
    ///
    /// # Errors
    ///
    /// Returns [`StrengthError::NonPositive`] for a zero, negative or
    /// non-finite dimension and [`StrengthError::WallTooThick`] when twice the
    /// wall exceeds the smallest outer dimension.
    ///
    /// # Examples
    /// ```
    /// use wishbone::{Profile, StrengthError};
    ///
    /// let tube = Profile::Circular { diameter: 20.0, thickness: Some(12.0) };
    /// assert!(matches!(tube.validate(), Err(StrengthError::WallTooThick { .. })));
    /// ```
    pub fn validate(&self) -> Result<(), StrengthError> {
        let (outer, thickness) = match *self {
            Self::Circular {
                diameter,
                thickness,
            } => {
                positive("profile diameter", diameter)?;
                (diameter, thickness)
            }
            Self::Rectangular {
                width,
                height,
                thickness,
            } => {
                positive("profile width", width)?;
                positive("profile height", height)?;
                (width.min(height), thickness)
            }
        };
        if let Some(thickness) = thickness {
            positive("profile thickness", thickness)?;
            if 2.0 * thickness > outer {
                return Err(StrengthError::WallTooThick {
                    thickness,
                    limit: outer / 2.0,
                });
            }
        }
        Ok(())
    }

    /// Cross-sectional area.
    ///
    /// # Examples
    /// ```
    /// use wishbone::Profile;
    ///
    /// let bar = Profile::Rectangular { width: 25.0, height: 3.0, thickness: None };
    /// assert_eq!(bar.area(), 75.0);
    /// ```
    #[must_use]
    pub fn area(&self) -> f64 {
        match *self {
            Self::Circular {
                diameter,
                thickness,
            } => {
                let inner = thickness.map_or(0.0, |t| diameter - 2.0 * t);
                PI / 4.0 * (diameter.powi(2) - inner.powi(2))
            }
            Self::Rectangular {
                width,
                height,
                thickness,
            } => {
                let hollow = thickness.map_or(0.0, |t| (width - 2.0 * t) * (height - 2.0 * t));
                width * height - hollow
            }
        }
    }

    /// Second moment of area about the bending axis.
    #[must_use]
    pub fn moment_of_inertia(&self) -> f64 {
        match *self {
            Self::Circular {
                diameter,
                thickness,
            } => {
                let inner = thickness.map_or(0.0, |t| diameter - 2.0 * t);
                PI / 64.0 * (diameter.powi(4) - inner.powi(4))
            }
            Self::Rectangular {
                width,
                height,
                thickness,
            } => {
                let hollow = thickness
                    .map_or(0.0, |t| (height - 2.0 * t).powi(3) * (width - 2.0 * t));
                (height.powi(3) * width - hollow) / 12.0
            }
        }
    }
}

/// Elastic and yield properties of a member material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMaterial")]
pub struct Material {
    /// Young's modulus.
    young_modulus: f64,
    /// Yield strength.
    yield_strength: f64,
}

/// Unvalidated form of [`Material`] used for deserialisation.
#[derive(Deserialize)]
struct RawMaterial {
    /// Young's modulus.
    young_modulus: f64,
    /// Yield strength.
    yield_strength: f64,
}

impl TryFrom<RawMaterial> for Material {
    type Error = StrengthError;

    fn try_from(raw: RawMaterial) -> Result<Self, Self::Error> {
        Self::new(raw.young_modulus, raw.yield_strength)
    }
}

impl Material {
    /// SAE 1020 steel, in MPa.
    pub const STEEL_1020: Self = Self::unchecked(205.0e3, 350.0);
    /// SAE 1045 steel, in MPa.
    pub const STEEL_1045: Self = Self::unchecked(200.0e3, 450.0);
    /// SAE 4130 chromoly steel, in MPa.
    pub const STEEL_4130: Self = Self::unchecked(200.0e3, 552.0);
    /// 6061-T6 aluminium, in MPa.
    pub const ALUMINIUM_6061_T6: Self = Self::unchecked(70.0e3, 310.0);

    /// Build a material without validation.
    const fn unchecked(young_modulus: f64, yield_strength: f64) -> Self {
        Self {
            young_modulus,
            yield_strength,
        }
    }

    /// Create a material.
    ///
    /// # Errors
    ///
    /// Returns [`StrengthError::NonPositive`] unless both values are positive
    /// and finite.
    ///
    /// # Examples
    /// ```
    /// use wishbone::Material;
    ///
    /// assert!(Material::new(205.0e3, 350.0).is_ok());
    /// assert!(Material::new(205.0e3, 0.0).is_err());
    /// ```
    pub fn new(young_modulus: f64, yield_strength: f64) -> Result<Self, StrengthError> {
        positive("Young's modulus", young_modulus)?;
        positive("yield strength", yield_strength)?;
        Ok(Self::unchecked(young_modulus, yield_strength))
    }

    /// Young's modulus.
    #[must_use]
    pub const fn young_modulus(&self) -> f64 {
        self.young_modulus
    }

    /// Yield strength.
    #[must_use]
    pub const fn yield_strength(&self) -> f64 {
        self.yield_strength
    }
}

/// End conditions of a column, which set its effective length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fastening {
    /// Rod ends or spherical joints at both ends.
    #[default]
    BothEndsPinned,
    /// Clamped at both ends.
    BothEndsFixed,
    /// Clamped at one end and pinned at the other.
    FixedPinned,
    /// Clamped at one end and free at the other.
    FixedFree,
}

impl Fastening {
    /// Ratio `K` of the effective buckling length to the member length.
    #[must_use]
    pub fn effective_length_factor(self) -> f64 {
        match self {
            Self::BothEndsPinned => 1.0,
            Self::BothEndsFixed => 0.5,
            Self::FixedPinned => std::f64::consts::FRAC_1_SQRT_2,
            Self::FixedFree => 2.0,
        }
    }
}

/// Profile, material and end conditions of one member.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSection")]
pub struct MemberSection {
    /// Cross-section.
    profile: Profile,
    /// Material.
    material: Material,
    /// End conditions.
    fastening: Fastening,
}

/// Unvalidated form of [`MemberSection`] used for deserialisation.
#[derive(Deserialize)]
struct RawSection {
    /// Cross-section.
    profile: Profile,
    /// Material.
    material: Material,
    /// End conditions.
    #[serde(default)]
    fastening: Fastening,
}

impl TryFrom<RawSection> for MemberSection {
    type Error = StrengthError;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.profile, raw.material)?.with_fastening(raw.fastening))
    }
}

impl MemberSection {
    /// Create a pinned-pinned section after validating the profile.
    ///
    /// # Errors
    ///
    /// Returns the error of [`Profile::validate`].
    pub fn new(profile: Profile, material: Material) -> Result<Self, StrengthError> {
        profile.validate()?;
        Ok(Self {
            profile,
            material,
            fastening: Fastening::default(),
        })
    }

    /// Replace the end conditions.
    #[must_use]
    pub const fn with_fastening(mut self, fastening: Fastening) -> Self {
        self.fastening = fastening;
        self
    }

    /// Cross-section.
    #[must_use]
    pub const fn profile(&self) -> Profile {
        self.profile
    }

    /// Material.
    #[must_use]
    pub const fn material(&self) -> Material {
        self.material
    }

    /// End conditions.
    #[must_use]
    pub const fn fastening(&self) -> Fastening {
        self.fastening
    }
}

/// Sections keyed by member name, with an optional fallback for the rest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberSections {
    /// Section used by members without their own entry.
    #[serde(default)]
    default: Option<MemberSection>,
    /// Per-member sections.
    #[serde(default)]
    members: BTreeMap<String, MemberSection>,
}

impl MemberSections {
    /// Give every member the same section.
    #[must_use]
    pub fn uniform(section: MemberSection) -> Self {
        Self {
            default: Some(section),
            members: BTreeMap::new(),
        }
    }

    /// Assign a section to one member, returning the one it replaces.
    pub fn insert(&mut self, member: impl Into<String>, section: MemberSection) -> Option<MemberSection> {
        self.members.insert(member.into(), section)
    }

    /// Section of `member`, falling back to the default.
    #[must_use]
    pub fn get(&self, member: &str) -> Option<&MemberSection> {
        self.members.get(member).or(self.default.as_ref())
    }
}

/// Normal stress of an axially loaded member.
///
/// # Examples
/// ```
/// use wishbone::normal_stress;
///
/// assert_eq!(normal_stress(1000.0, 0.5), 2000.0);
/// ```
#[must_use]
pub fn normal_stress(force: f64, area: f64) -> f64 {
    force / area
}

/// Euler critical buckling force `π²EI / (KL)²`.
///
/// # Examples
/// ```
/// use wishbone::{critical_buckling_force, Fastening};
///
/// let load = critical_buckling_force(1.0, 1.0, 1.0, Fastening::BothEndsPinned);
/// assert!((load - std::f64::consts::PI.powi(2)).abs() < 1.0e-12);
/// ```
#[must_use]
pub fn critical_buckling_force(
    young_modulus: f64,
    moment_of_inertia: f64,
    length: f64,
    fastening: Fastening,
) -> f64 {
    let effective_length = fastening.effective_length_factor() * length;
    PI.powi(2) * young_modulus * moment_of_inertia / effective_length.powi(2)
}

/// Strength check of one member under its solved reaction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MemberStrength {
    /// Member name.
    pub member: String,
    /// Axial force; positive along the member's `from → to` direction.
    pub force: f64,
    /// Distance between the member endpoints.
    pub length: f64,
    /// Normal stress `force / area`.
    pub normal_stress: f64,
    /// Euler critical buckling force.
    pub critical_buckling_force: f64,
    /// `|P_cr / force|`; `None` for an unloaded member.
    pub buckling_safety_factor: Option<f64>,
    /// `|yield / stress|`; `None` for an unloaded member.
    pub stress_safety_factor: Option<f64>,
}

/// Check one member of known length under `force`.
#[must_use]
pub fn member_strength(
    member: &str,
    force: f64,
    length: f64,
    section: &MemberSection,
) -> MemberStrength {
    let stress = normal_stress(force, section.profile.area());
    let critical = critical_buckling_force(
        section.material.young_modulus,
        section.profile.moment_of_inertia(),
        length,
        section.fastening,
    );
    let loaded = force.abs() > EPSILON;
    MemberStrength {
        member: member.to_owned(),
        force,
        length,
        normal_stress: stress,
        critical_buckling_force: critical,
        buckling_safety_factor: loaded.then(|| (critical / force).abs()),
        stress_safety_factor: loaded.then(|| (section.material.yield_strength / stress).abs()),
    }
}

/// Check every member of a solved linkage, in member order.
///
/// # Errors
///
/// Returns [`StrengthError::MissingSection`] when a member has no section,
/// [`StrengthError::MissingReaction`] when `reactions` has no entry for it,
/// [`StrengthError::UnknownHardpoint`] for an endpoint label not in `points`
/// and [`StrengthError::ZeroLength`] when its endpoints coincide.
pub fn analyse_members(
    points: &HardpointSet,
    members: &[ReactionMember],
    reactions: &Reactions,
    sections: &MemberSections,
) -> Result<Vec<MemberStrength>, StrengthError> {
    members
        .iter()
        .map(|member| {
            let section = sections
                .get(&member.name)
                .ok_or_else(|| StrengthError::MissingSection(member.name.clone()))?;
            let force = reactions
                .get(&member.name)
                .ok_or_else(|| StrengthError::MissingReaction(member.name.clone()))?;
            let endpoint = |label: &str| {
                points
                    .get(label)
                    .ok_or_else(|| StrengthError::UnknownHardpoint {
                        member: member.name.clone(),
                        label: label.to_owned(),
                    })
            };
            let length = distance(endpoint(&member.from)?, endpoint(&member.to)?);
            if length <= EPSILON {
                return Err(StrengthError::ZeroLength(member.name.clone()));
            }
            let result = member_strength(&member.name, force, length, section);
            debug!(
                member = %member.name,
                stress = result.normal_stress,
                critical = result.critical_buckling_force,
                "member checked"
            );
            Ok(result)
        })
        .collect()
}

/// Reject zero, negative and non-finite values.
fn positive(field: &'static str, value: f64) -> Result<(), StrengthError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StrengthError::NonPositive { field, value })
    }
}
