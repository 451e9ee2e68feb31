//! Classification of topology entries into the framework and its building units.
//!
//! Each entry is classified exactly once into an [`EntryKind`]. The framework is
//! the entry whose label equals the configured framework label; building units and
//! ligands are `molecule` entries whose label contains one of the [`SbuKind`]
//! tokens, tested in the fixed order metal, organic, ligand.

use super::error::PipelineError;
use crate::core::archive::TopologyEntry;
use crate::core::models::records::{SbuKind, SbuMap, SbuRecord};
use crate::core::models::structure::{Structure, StructureError};
use tracing::{debug, warn};

pub const MOLECULE_STRUCTURAL_TYPE: &str = "molecule";

/// Token order decides labels that contain more than one token.
const SBU_KINDS: [SbuKind; 3] = [
    SbuKind::MetalBuildingUnit,
    SbuKind::OrganicBuildingUnit,
    SbuKind::Ligand,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Framework,
    MetalBuildingUnit,
    OrganicBuildingUnit,
    Ligand,
    Unclassified,
}

impl EntryKind {
    pub fn sbu_kind(self) -> Option<SbuKind> {
        match self {
            EntryKind::MetalBuildingUnit => Some(SbuKind::MetalBuildingUnit),
            EntryKind::OrganicBuildingUnit => Some(SbuKind::OrganicBuildingUnit),
            EntryKind::Ligand => Some(SbuKind::Ligand),
            EntryKind::Framework | EntryKind::Unclassified => None,
        }
    }
}

impl From<SbuKind> for EntryKind {
    fn from(kind: SbuKind) -> Self {
        match kind {
            SbuKind::MetalBuildingUnit => EntryKind::MetalBuildingUnit,
            SbuKind::OrganicBuildingUnit => EntryKind::OrganicBuildingUnit,
            SbuKind::Ligand => EntryKind::Ligand,
        }
    }
}

pub fn classify_entry(entry: &TopologyEntry, framework_label: &str) -> EntryKind {
    if entry.label == framework_label {
        return EntryKind::Framework;
    }
    if entry.structural_type != MOLECULE_STRUCTURAL_TYPE {
        return EntryKind::Unclassified;
    }
    SBU_KINDS
        .iter()
        .find(|kind| entry.label.contains(kind.label_token()))
        .map_or(EntryKind::Unclassified, |&kind| kind.into())
}

/// Returns the first framework entry, warning if the list holds more than one.
pub fn find_framework<'a>(
    entries: &'a [TopologyEntry],
    framework_label: &str,
) -> Option<&'a TopologyEntry> {
    let mut frameworks = entries
        .iter()
        .filter(|e| classify_entry(e, framework_label) == EntryKind::Framework);
    let first = frameworks.next()?;
    let extra = frameworks.count();
    if extra > 0 {
        warn!(
            label = framework_label,
            ignored = extra,
            "Topology lists several framework entries; using the first."
        );
    }
    Some(first)
}

/// Extracts the wrapped atoms of every building-unit and ligand entry, keyed by label.
///
/// # Errors
///
/// * [`PipelineError::MalformedTopology`] if a building unit has no index sequence.
/// * [`PipelineError::ClassificationAmbiguity`] if an index lies outside `structure`.
pub fn extract_building_units(
    entries: &[TopologyEntry],
    structure: &Structure,
    framework_label: &str,
) -> Result<SbuMap, PipelineError> {
    let mut sbus = SbuMap::new();
    for entry in entries {
        let kind = classify_entry(entry, framework_label);
        let Some(sbu_kind) = kind.sbu_kind() else {
            debug!(label = %entry.label, ?kind, "Skipping topology entry.");
            continue;
        };

        let atoms = select_entry_atoms(entry, structure)?.wrapped();
        debug!(
            label = %entry.label,
            kind = %sbu_kind,
            atoms = atoms.len(),
            "Extracted building unit."
        );

        let record = SbuRecord {
            kind: sbu_kind,
            label: entry.label.clone(),
            atoms,
            sbu_type: match sbu_kind {
                SbuKind::MetalBuildingUnit => entry.sbu_type.clone(),
                _ => None,
            },
            sbu_coordination_number: match sbu_kind {
                SbuKind::Ligand => None,
                _ => entry.sbu_coordination_number,
            },
        };
        if sbus.insert(entry.label.clone(), record).is_some() {
            warn!(label = %entry.label, "Duplicate topology label; keeping the later entry.");
        }
    }
    Ok(sbus)
}

/// Selects the atoms named by the entry's first index sequence.
pub(crate) fn select_entry_atoms(
    entry: &TopologyEntry,
    structure: &Structure,
) -> Result<Structure, PipelineError> {
    let indices = entry
        .primary_indices()
        .ok_or_else(|| PipelineError::malformed_topology(&entry.label, "no index sequence"))?;
    structure.select(indices).map_err(|e| match e {
        StructureError::IndexOutOfBounds { index, atom_count } => {
            PipelineError::ClassificationAmbiguity {
                label: entry.label.clone(),
                index,
                atom_count,
            }
        }
        other => PipelineError::malformed_topology(&entry.label, other.to_string()),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification<'a> {
    pub framework: Option<&'a TopologyEntry>,
    pub sbus: SbuMap,
}

pub fn classify<'a>(
    entries: &'a [TopologyEntry],
    structure: &Structure,
    framework_label: &str,
) -> Result<Classification<'a>, PipelineError> {
    Ok(Classification {
        framework: find_framework(entries, framework_label),
        sbus: extract_building_units(entries, structure, framework_label)?,
    })
}
