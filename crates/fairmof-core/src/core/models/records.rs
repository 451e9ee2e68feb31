use super::structure::Structure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Normalized pore geometry of one framework, in Angstrom-based units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub void_fraction: f64,
    pub n_channels: u32,
    #[serde(rename = "pore_limiting_diameter_A")]
    pub pore_limiting_diameter: f64,
    #[serde(rename = "largest_cavity_diameter_A")]
    pub largest_cavity_diameter: f64,
    #[serde(rename = "largest_included_sphere_along_free_sphere_path_A")]
    pub largest_included_sphere_along_free_sphere_path: f64,
    #[serde(rename = "accessible_surface_area_A^2")]
    pub accessible_surface_area: f64,
    #[serde(rename = "accessible_volume_A^3")]
    pub accessible_volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SbuKind {
    #[serde(rename = "metal_sbu")]
    MetalBuildingUnit,
    #[serde(rename = "organic_sbu")]
    OrganicBuildingUnit,
    #[serde(rename = "ligand")]
    Ligand,
}

impl SbuKind {
    /// The label substring that marks entries of this kind.
    pub const fn label_token(self) -> &'static str {
        match self {
            SbuKind::MetalBuildingUnit => "metal_sbu",
            SbuKind::OrganicBuildingUnit => "organic_sbu",
            SbuKind::Ligand => "ligand",
        }
    }
}

impl fmt::Display for SbuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label_token())
    }
}

/// A classified building unit or ligand with its atoms wrapped into the unit cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SbuRecord {
    pub kind: SbuKind,
    pub label: String,
    pub atoms: Structure,
    /// Sub-type of a metal building unit (e.g. a paddlewheel).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sbu_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sbu_coordination_number: Option<u32>,
}

/// Building units of one identifier, keyed by topology label.
pub type SbuMap = BTreeMap<String, SbuRecord>;
