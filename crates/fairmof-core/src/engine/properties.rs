use super::classifier::select_entry_atoms;
use super::error::PipelineError;
use crate::core::archive::TopologyEntry;
use crate::core::models::records::PropertyRecord;
use crate::core::models::structure::Structure;
use crate::core::units::{self, Unit};

/// Selects the framework atoms and normalizes its pore geometry to Angstrom-based units.
///
/// The framework subset is taken unwrapped. Diameters are converted from metres to
/// Angstroms, the surface area to square Angstroms and the volume to cubic
/// Angstroms; the void fraction and channel count pass through.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedTopology`] naming the first missing field, or
/// [`PipelineError::ClassificationAmbiguity`] for an out-of-range atom index.
pub fn extract(
    entry: &TopologyEntry,
    structure: &Structure,
) -> Result<(Structure, PropertyRecord), PipelineError> {
    let framework = select_entry_atoms(entry, structure)?;

    let length = |name: &'static str, value: Option<f64>| {
        convert_field(entry, name, value, Unit::METER, Unit::ANGSTROM)
    };
    let record = PropertyRecord {
        void_fraction: required(entry, "void_fraction", entry.void_fraction)?,
        n_channels: required(entry, "n_channels", entry.n_channels)?,
        pore_limiting_diameter: length("pore_limiting_diameter", entry.pore_limiting_diameter)?,
        largest_cavity_diameter: length("largest_cavity_diameter", entry.largest_cavity_diameter)?,
        largest_included_sphere_along_free_sphere_path: length(
            "largest_included_sphere_along_free_sphere_path",
            entry.largest_included_sphere_along_free_sphere_path,
        )?,
        accessible_surface_area: convert_field(
            entry,
            "accessible_surface_area",
            entry.accessible_surface_area,
            Unit::SQUARE_METER,
            Unit::SQUARE_ANGSTROM,
        )?,
        accessible_volume: convert_field(
            entry,
            "accessible_volume",
            entry.accessible_volume,
            Unit::CUBIC_METER,
            Unit::CUBIC_ANGSTROM,
        )?,
    };
    Ok((framework, record))
}

fn required<T>(entry: &TopologyEntry, name: &str, value: Option<T>) -> Result<T, PipelineError> {
    value.ok_or_else(|| {
        PipelineError::malformed_topology(&entry.label, format!("missing '{name}'"))
    })
}

fn convert_field(
    entry: &TopologyEntry,
    name: &str,
    value: Option<f64>,
    from: Unit,
    to: Unit,
) -> Result<f64, PipelineError> {
    let value = required(entry, name, value)?;
    units::convert(value, from, to)
        .map_err(|e| PipelineError::malformed_topology(&entry.label, format!("'{name}': {e}")))
}
