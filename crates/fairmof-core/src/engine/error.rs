use crate::core::archive::ArchiveError;
use crate::core::io::StructureFileError;
use crate::core::io::store::StoreError;
use crate::core::units::UnitError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Malformed archive: {source}")]
    MalformedArchive {
        #[from]
        source: ArchiveError,
    },

    #[error("Malformed system: {species} species given for {positions} positions")]
    MalformedSystem { species: usize, positions: usize },

    #[error("Unit conversion failed: {source}")]
    UnitConversion {
        #[from]
        source: UnitError,
    },

    #[error("Malformed topology entry '{label}': {reason}")]
    MalformedTopology { label: String, reason: String },

    #[error(
        "Topology entry '{label}' references atom {index}, but the structure has only {atom_count} atoms"
    )]
    ClassificationAmbiguity {
        label: String,
        index: usize,
        atom_count: usize,
    },

    #[error("Persistence failed: {source}")]
    PersistenceIo {
        #[from]
        source: StoreError,
    },

    #[error("Failed to write structure file '{path}': {source}", path = path.display())]
    StructureWrite {
        path: PathBuf,
        #[source]
        source: StructureFileError,
    },
}

impl PipelineError {
    pub(crate) fn malformed_topology(label: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTopology {
            label: label.to_string(),
            reason: reason.into(),
        }
    }
}

/// A pipeline failure together with the identifier being processed.
#[derive(Debug, Error)]
#[error("{identifier}: {source}")]
pub struct IdentifiedError {
    pub identifier: String,
    #[source]
    pub source: PipelineError,
}

impl IdentifiedError {
    pub fn new(identifier: impl Into<String>, source: PipelineError) -> Self {
        Self {
            identifier: identifier.into(),
            source,
        }
    }
}
