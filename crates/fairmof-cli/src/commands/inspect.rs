use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use fairmof::core::archive::Archive;
use fairmof::core::models::structure::Structure;
use fairmof::engine::classifier::{self, EntryKind};
use fairmof::engine::{builder, properties};
use std::fmt::{self, Write as _};
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    info!("Loading archive from {:?}", &args.archive);
    let archive = Archive::from_path(&args.archive).map_err(|e| CliError::FileParsing {
        path: args.archive.clone(),
        source: e.into(),
    })?;
    print!("{}", summarize(&archive, &args.framework_label)?);
    Ok(())
}

/// Renders a human-readable summary of an archive's structure and topology.
pub fn summarize(archive: &Archive, framework_label: &str) -> Result<String> {
    let structure = builder::build(archive.raw_system()?)?;
    let mut out = String::new();
    write_summary(&mut out, archive, &structure, framework_label)
        .map_err(|e| CliError::Other(e.into()))?;
    Ok(out)
}

fn write_summary(
    out: &mut String,
    archive: &Archive,
    structure: &Structure,
    framework_label: &str,
) -> fmt::Result {
    if let Some(id) = archive.identifier_from_mainfile() {
        writeln!(out, "Identifier: {}", id)?;
    }
    if let Some(entry_id) = archive.entry_id() {
        writeln!(out, "Entry: {}", entry_id)?;
    }
    let formula = if structure.is_empty() {
        "-".to_string()
    } else {
        structure.chemical_formula()
    };
    writeln!(out, "Atoms: {} ({})", structure.len(), formula)?;

    let lattice = structure.lattice();
    if lattice.is_singular() {
        writeln!(out, "Cell: none")?;
    } else {
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();
        writeln!(
            out,
            "Cell: a={:.4} b={:.4} c={:.4} Å, α={:.2} β={:.2} γ={:.2}°, V={:.3} Å³",
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
            lattice.volume()
        )?;
    }

    let entries = archive.topology();
    writeln!(out, "Topology entries: {}", entries.len())?;
    for entry in entries {
        let kind = classifier::classify_entry(entry, framework_label);
        let atoms = entry.primary_indices().map_or(0, <[usize]>::len);
        writeln!(
            out,
            "  {:<24} {:<20} {:>6} atoms",
            entry.label,
            kind_name(kind),
            atoms
        )?;
    }

    match classifier::find_framework(entries, framework_label) {
        Some(entry) => match properties::extract(entry, structure) {
            Ok((_, record)) => {
                writeln!(out, "Framework properties:")?;
                writeln!(out, "  void fraction       {:.4}", record.void_fraction)?;
                writeln!(out, "  channels            {}", record.n_channels)?;
                writeln!(
                    out,
                    "  PLD / LCD           {:.3} / {:.3} Å",
                    record.pore_limiting_diameter, record.largest_cavity_diameter
                )?;
                writeln!(out, "  surface area        {:.3} Å²", record.accessible_surface_area)?;
                writeln!(out, "  accessible volume   {:.3} Å³", record.accessible_volume)?;
            }
            Err(e) => writeln!(out, "Framework properties unavailable: {}", e)?,
        },
        None => writeln!(out, "No framework entry.")?,
    }
    Ok(())
}

fn kind_name(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Framework => "framework",
        EntryKind::MetalBuildingUnit => "metal building unit",
        EntryKind::OrganicBuildingUnit => "organic building unit",
        EntryKind::Ligand => "ligand",
        EntryKind::Unclassified => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(json: &str) -> Archive {
        Archive::from_reader(json.as_bytes()).unwrap()
    }

    #[test]
    fn summary_lists_entries_and_framework_properties() {
        let archive = archive(
            r#"{
            "metadata": {
                "mainfile": "MOFData/ABAVIJ_fair_op/ABAVIJ_fair_op.out",
                "entry_id": "entry-abavij"
            },
            "run": [{"system": [{"atoms": {
                "lattice_vectors": [[1e-9, 0, 0], [0, 1e-9, 0], [0, 0, 1e-9]],
                "positions": [[0, 0, 0], [1e-10, 0, 0]],
                "species": [30, 8],
                "periodic": [true, true, true]
            }}]}],
            "results": {"material": {"topology": [
                {"label": "MOF", "indices": [[0, 1]], "void_fraction": 0.5,
                 "pore_limiting_diameter": 3e-10, "largest_cavity_diameter": 4e-10,
                 "largest_included_sphere_along_free_sphere_path": 3.5e-10,
                 "accessible_surface_area": 1e-18, "accessible_volume": 1e-27, "n_channels": 1},
                {"label": "metal_sbu_0", "structural_type": "molecule", "indices": [[0]]}
            ]}}
        }"#,
        );
        let summary = summarize(&archive, "MOF").unwrap();

        assert!(summary.contains("Identifier: ABAVIJ_fair_op"));
        assert!(summary.contains("Entry: entry-abavij"));
        assert!(summary.contains("Atoms: 2 (OZn)"));
        assert!(summary.contains("a=10.0000"));
        assert!(summary.contains("metal building unit"));
        assert!(summary.contains("void fraction       0.5000"));
        assert!(summary.contains("PLD / LCD           3.000 / 4.000"));
    }

    #[test]
    fn summary_handles_empty_systems_without_framework() {
        let archive = archive(r#"{"run": [{"system": [{"atoms": {"species": []}}]}]}"#);
        let summary = summarize(&archive, "MOF").unwrap();
        assert!(summary.contains("Atoms: 0 (-)"));
        assert!(summary.contains("Cell: none"));
        assert!(summary.contains("No framework entry."));
    }

    #[test]
    fn summary_requires_a_system() {
        let archive = archive(r#"{"run": []}"#);
        assert!(matches!(
            summarize(&archive, "MOF"),
            Err(CliError::Archive(_))
        ));
    }
}
