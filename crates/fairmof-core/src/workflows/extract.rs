use crate::core::archive::Archive;
use crate::core::io::{self, store};
use crate::core::models::records::{PropertyRecord, SbuMap};
use crate::core::models::structure::Structure;
use crate::engine::config::ExtractionConfig;
use crate::engine::error::PipelineError;
use crate::engine::{builder, classifier, properties};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Everything derived from one archive, before anything touches the disk.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Framework {
        framework: Structure,
        properties: PropertyRecord,
        sbus: SbuMap,
    },
    /// No framework entry; the full structure is kept for the unrecognized directory.
    NoFramework { structure: Structure },
}

impl Analysis {
    pub fn is_framework(&self) -> bool {
        matches!(self, Analysis::Framework { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Framework {
        properties: PropertyRecord,
        sbu_count: usize,
        structure_path: PathBuf,
    },
    NoFramework { structure_path: PathBuf },
}

impl ExtractionOutcome {
    pub fn structure_path(&self) -> &PathBuf {
        match self {
            ExtractionOutcome::Framework { structure_path, .. }
            | ExtractionOutcome::NoFramework { structure_path } => structure_path,
        }
    }
}

/// Builds the structure, looks up the framework and derives its properties and building units.
pub fn analyze(archive: &Archive, config: &ExtractionConfig) -> Result<Analysis, PipelineError> {
    let structure = builder::build(archive.raw_system()?)?;
    let entries = archive.topology();

    let Some(framework_entry) = classifier::find_framework(entries, &config.framework_label)
    else {
        debug!(
            entries = entries.len(),
            "No framework entry in topology; treating the system as unrecognized."
        );
        return Ok(Analysis::NoFramework { structure });
    };

    let (framework, properties) = properties::extract(framework_entry, &structure)?;
    let sbus = classifier::extract_building_units(entries, &structure, &config.framework_label)?;
    debug!(
        framework_atoms = framework.len(),
        building_units = sbus.len(),
        "Analysed framework."
    );
    Ok(Analysis::Framework {
        framework,
        properties,
        sbus,
    })
}

/// Writes the structure file and, for a framework, merges both stores.
///
/// The output directories must already exist.
pub fn persist(
    identifier: &str,
    analysis: &Analysis,
    config: &ExtractionConfig,
) -> Result<ExtractionOutcome, PipelineError> {
    let layout = &config.layout;
    let structure_path = layout.structure_path(identifier, analysis.is_framework());
    let structure = match analysis {
        Analysis::Framework { framework, .. } => framework,
        Analysis::NoFramework { structure } => structure,
    };
    io::write_structure(structure, layout.format, &structure_path).map_err(|source| {
        PipelineError::StructureWrite {
            path: structure_path.clone(),
            source,
        }
    })?;

    match analysis {
        Analysis::Framework {
            properties, sbus, ..
        } => {
            store::merge_properties(
                &layout.properties_store_path(),
                identifier,
                properties.clone(),
            )?;
            store::merge_sbus(&layout.sbu_store_path(), identifier, sbus.clone())?;
            Ok(ExtractionOutcome::Framework {
                properties: properties.clone(),
                sbu_count: sbus.len(),
                structure_path,
            })
        }
        Analysis::NoFramework { .. } => Ok(ExtractionOutcome::NoFramework { structure_path }),
    }
}

/// Runs the whole pipeline for one identifier.
#[instrument(skip_all, name = "extract_workflow", fields(identifier = %identifier))]
pub fn run(
    identifier: &str,
    archive: &Archive,
    config: &ExtractionConfig,
) -> Result<ExtractionOutcome, PipelineError> {
    let analysis = analyze(archive, config)?;
    let outcome = persist(identifier, &analysis, config)?;
    match &outcome {
        ExtractionOutcome::Framework {
            sbu_count,
            structure_path,
            ..
        } => info!(
            building_units = sbu_count,
            path = %structure_path.display(),
            "Framework recognized."
        ),
        ExtractionOutcome::NoFramework { structure_path } => info!(
            path = %structure_path.display(),
            "No framework recognized."
        ),
    }
    Ok(outcome)
}
