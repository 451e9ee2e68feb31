//! Serde schema for the subset of a NOMAD archive consumed by the pipeline.
//!
//! Only `run[0].system[-1].atoms`, `results.material.topology` and
//! `metadata.mainfile` are modelled; every other archive field is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Archive is missing required section: {0}")]
    MissingSection(&'static str),
    #[error("Query response contains no entries")]
    EmptyQuery,
}

/// Raw atoms section of an archive, in SI units.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSystem {
    /// Lattice vectors as rows, in metres. Absent for non-periodic systems.
    #[serde(default)]
    pub lattice_vectors: Option<[[f64; 3]; 3]>,
    /// Cartesian positions in metres; may be empty.
    #[serde(default)]
    pub positions: Vec<[f64; 3]>,
    /// Atomic numbers, one per position.
    #[serde(default)]
    pub species: Vec<u8>,
    #[serde(default)]
    pub periodic: [bool; 3],
}

/// One record of `results.material.topology`.
///
/// Which optional fields are present depends on the kind of entry: building units
/// carry `sbu_type`/`sbu_coordination_number`, the framework carries the pore
/// geometry, all in SI units.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopologyEntry {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub structural_type: String,
    /// Atom-index sequences; the first one selects this entry's atoms.
    #[serde(default)]
    pub indices: Vec<Vec<usize>>,
    pub sbu_type: Option<String>,
    pub sbu_coordination_number: Option<u32>,
    pub void_fraction: Option<f64>,
    pub pore_limiting_diameter: Option<f64>,
    pub largest_cavity_diameter: Option<f64>,
    pub largest_included_sphere_along_free_sphere_path: Option<f64>,
    pub accessible_surface_area: Option<f64>,
    pub accessible_volume: Option<f64>,
    pub n_channels: Option<u32>,
}

impl TopologyEntry {
    pub fn primary_indices(&self) -> Option<&[usize]> {
        self.indices.first().map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    pub mainfile: Option<String>,
    pub entry_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemSection {
    pub atoms: Option<RawSystem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub system: Vec<SystemSection>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub topology: Vec<TopologyEntry>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Results {
    pub material: Option<Material>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Archive {
    pub metadata: Option<ArchiveMetadata>,
    #[serde(default)]
    pub run: Vec<Run>,
    pub results: Option<Results>,
}

impl Archive {
    /// Parses an archive from any of the accepted envelopes.
    ///
    /// The document may be a bare archive, an entry document (`{"archive": {...}}`)
    /// or an API query response (`{"data": [{"archive": {...}}, ...]}`), in which
    /// case the first entry is used.
    pub fn from_value(mut document: Value) -> Result<Self, ArchiveError> {
        if let Some(Value::Array(entries)) = document.get_mut("data") {
            let first = entries.first_mut().ok_or(ArchiveError::EmptyQuery)?.take();
            document = first;
        }
        if let Some(inner) = document.get_mut("archive").map(Value::take) {
            document = inner;
        }
        Ok(serde_json::from_value(document)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ArchiveError> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::from_value(document)
    }

    pub fn from_path(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path).map_err(|e| ArchiveError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Returns the atoms of the last system of the first run.
    pub fn raw_system(&self) -> Result<&RawSystem, ArchiveError> {
        let run = self.run.first().ok_or(ArchiveError::MissingSection("run"))?;
        let system = run
            .system
            .last()
            .ok_or(ArchiveError::MissingSection("run[0].system"))?;
        system
            .atoms
            .as_ref()
            .ok_or(ArchiveError::MissingSection("run[0].system[-1].atoms"))
    }

    /// Returns the topology list, or an empty slice when the archive has none.
    pub fn topology(&self) -> &[TopologyEntry] {
        self.results
            .as_ref()
            .and_then(|r| r.material.as_ref())
            .map(|m| m.topology.as_slice())
            .unwrap_or_default()
    }

    /// Derives the database reference code from `metadata.mainfile`.
    ///
    /// `MOFData/ABAVIJ_fair_op/ABAVIJ_fair_op.out` yields `ABAVIJ_fair_op`.
    pub fn identifier_from_mainfile(&self) -> Option<String> {
        let mainfile = self.metadata.as_ref()?.mainfile.as_deref()?;
        let basename = mainfile.rsplit('/').next()?;
        let stem = basename.split('.').next()?;
        (!stem.is_empty()).then(|| stem.to_string())
    }

    /// The NOMAD entry id from `metadata.entry_id`, if recorded.
    pub fn entry_id(&self) -> Option<&str> {
        self.metadata.as_ref()?.entry_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn archive_body() -> Value {
        json!({
            "metadata": {"mainfile": "MOFData/ABAVIJ_fair_op/ABAVIJ_fair_op.out", "entry_id": "abc"},
            "run": [{"system": [
                {"atoms": {"species": [1], "positions": [[0.0, 0.0, 0.0]], "periodic": [false, false, false]}},
                {"atoms": {
                    "lattice_vectors": [[1e-9, 0.0, 0.0], [0.0, 1e-9, 0.0], [0.0, 0.0, 1e-9]],
                    "positions": [[0.0, 0.0, 0.0], [1e-10, 0.0, 0.0]],
                    "species": [30, 8],
                    "periodic": [true, true, true],
                    "labels": ["Zn", "O"]
                }}
            ]}],
            "results": {"material": {"topology": [
                {"label": "original", "structural_type": "bulk", "method": "parser"},
                {"label": "MOF", "structural_type": "bulk", "indices": [[0, 1]], "void_fraction": 0.4, "n_channels": 2}
            ]}}
        })
    }

    #[test]
    fn bare_archive_exposes_last_system_and_topology() {
        let archive = Archive::from_value(archive_body()).unwrap();
        let raw = archive.raw_system().unwrap();
        assert_eq!(raw.species, vec![30, 8]);
        assert_eq!(raw.periodic, [true; 3]);
        assert_eq!(archive.topology().len(), 2);
        assert_eq!(archive.topology()[1].label, "MOF");
        assert_eq!(archive.topology()[1].primary_indices(), Some(&[0, 1][..]));
        assert_eq!(archive.topology()[1].n_channels, Some(2));
        assert_eq!(archive.topology()[0].void_fraction, None);
    }

    #[test]
    fn entry_and_query_envelopes_are_unwrapped() {
        let entry = Archive::from_value(json!({"archive": archive_body()})).unwrap();
        let query = Archive::from_value(json!({"data": [{"archive": archive_body()}]})).unwrap();
        assert_eq!(entry, query);
        assert_eq!(entry.raw_system().unwrap().species, vec![30, 8]);
    }

    #[test]
    fn empty_query_is_an_error() {
        let err = Archive::from_value(json!({"data": []})).unwrap_err();
        assert!(matches!(err, ArchiveError::EmptyQuery));
    }

    #[test]
    fn missing_sections_are_reported() {
        let archive = Archive::from_value(json!({"run": []})).unwrap();
        assert!(matches!(
            archive.raw_system(),
            Err(ArchiveError::MissingSection("run"))
        ));
        assert!(archive.topology().is_empty());

        let archive = Archive::from_value(json!({"run": [{"system": [{}]}]})).unwrap();
        assert!(matches!(
            archive.raw_system(),
            Err(ArchiveError::MissingSection("run[0].system[-1].atoms"))
        ));
    }

    #[test]
    fn missing_optional_atom_fields_default() {
        let archive =
            Archive::from_value(json!({"run": [{"system": [{"atoms": {"species": []}}]}]}))
                .unwrap();
        let raw = archive.raw_system().unwrap();
        assert!(raw.lattice_vectors.is_none());
        assert!(raw.positions.is_empty());
        assert_eq!(raw.periodic, [false; 3]);
    }

    #[test]
    fn malformed_lattice_shape_is_a_json_error() {
        let err = Archive::from_value(
            json!({"run": [{"system": [{"atoms": {"lattice_vectors": [[1.0, 2.0]]}}]}]}),
        )
        .unwrap_err();
        assert!(matches!(err, ArchiveError::Json(_)));
    }

    #[test]
    fn identifier_is_derived_from_mainfile() {
        let archive = Archive::from_value(archive_body()).unwrap();
        assert_eq!(
            archive.identifier_from_mainfile().as_deref(),
            Some("ABAVIJ_fair_op")
        );
        assert_eq!(Archive::default().identifier_from_mainfile(), None);
    }

    #[test]
    fn entry_id_is_read_from_metadata() {
        let archive = Archive::from_value(archive_body()).unwrap();
        assert_eq!(archive.entry_id(), Some("abc"));
        assert_eq!(Archive::default().entry_id(), None);
    }

    #[test]
    fn reads_archive_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.json");
        std::fs::write(&path, json!({"archive": archive_body()}).to_string()).unwrap();
        let archive = Archive::from_path(&path).unwrap();
        assert_eq!(archive.topology().len(), 2);

        let missing = Archive::from_path(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, ArchiveError::Io { .. }));
    }
}
