//! Identifier-keyed JSON documents that accumulate results across runs.
//!
//! A store is loaded in full (a missing or empty file is an empty mapping), the
//! current identifier's record replaces any previous one, and the whole mapping is
//! written back. The read-modify-write cycle assumes a single writer per file.

use crate::core::models::records::{PropertyRecord, SbuMap};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error for '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct JsonStore<R> {
    path: PathBuf,
    entries: BTreeMap<String, R>,
}

pub type PropertyStore = JsonStore<PropertyRecord>;
pub type SbuStore = JsonStore<SbuMap>;

impl<R> JsonStore<R>
where
    R: Serialize + DeserializeOwned,
{
    /// Loads the store at `path`, or starts an empty one if the file is absent or blank.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| StoreError::Json {
                path: path.clone(),
                source: e,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        debug!(path = %path.display(), entries = entries.len(), "Opened JSON store.");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, identifier: &str) -> Option<&R> {
        self.entries.get(identifier)
    }

    /// Replaces the record stored under `identifier`, returning the previous one.
    pub fn insert(&mut self, identifier: impl Into<String>, record: R) -> Option<R> {
        self.entries.insert(identifier.into(), record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &R)> {
        self.entries.iter()
    }

    /// Rewrites the whole mapping.
    ///
    /// The document is written to a sibling `.tmp` file first and then renamed over
    /// the store, so an interrupted write leaves the previous contents in place.
    pub fn save(&self) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(&self.entries).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })?;
        let tmp_path = temporary_sibling(&self.path);
        let io_err = |e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        };
        fs::write(&tmp_path, content).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)?;
        debug!(path = %self.path.display(), entries = self.entries.len(), "Saved JSON store.");
        Ok(())
    }
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "store.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Loads the store at `path`, sets `store[identifier] = record` and writes it back.
pub fn merge_record<R>(path: &Path, identifier: &str, record: R) -> Result<(), StoreError>
where
    R: Serialize + DeserializeOwned,
{
    let mut store = JsonStore::<R>::open(path)?;
    if store.insert(identifier, record).is_some() {
        debug!(identifier, "Replaced existing store entry.");
    }
    store.save()
}

pub fn merge_properties(
    path: &Path,
    identifier: &str,
    record: PropertyRecord,
) -> Result<(), StoreError> {
    merge_record(path, identifier, record)
}

pub fn merge_sbus(path: &Path, identifier: &str, sbus: SbuMap) -> Result<(), StoreError> {
    merge_record(path, identifier, sbus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::lattice::Lattice;
    use crate::core::models::records::{SbuKind, SbuRecord};
    use crate::core::models::structure::Structure;
    use tempfile::tempdir;

    fn record(void_fraction: f64) -> PropertyRecord {
        PropertyRecord {
            void_fraction,
            n_channels: 1,
            pore_limiting_diameter: 3.0,
            largest_cavity_diameter: 4.0,
            largest_included_sphere_along_free_sphere_path: 3.5,
            accessible_surface_area: 100.0,
            accessible_volume: 1000.0,
        }
    }

    #[test]
    fn absent_file_opens_as_empty_store() {
        let dir = tempdir().unwrap();
        let store = PropertyStore::open(dir.path().join("missing.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn blank_file_opens_as_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.json");
        fs::write(&path, "  \n").unwrap();
        assert!(PropertyStore::open(&path).unwrap().is_empty());
    }

    #[test]
    fn merging_same_identifier_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("props.json");
        merge_properties(&path, "X", record(0.1)).unwrap();
        merge_properties(&path, "X", record(0.2)).unwrap();

        let store = PropertyStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("X"), Some(&record(0.2)));
    }

    #[test]
    fn merging_distinct_identifiers_accumulates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("props.json");
        merge_properties(&path, "X", record(0.1)).unwrap();
        merge_properties(&path, "Y", record(0.3)).unwrap();

        let store = PropertyStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("X"), Some(&record(0.1)));
        assert_eq!(store.get("Y"), Some(&record(0.3)));
        assert!(!temporary_sibling(&path).exists());
    }

    #[test]
    fn earlier_entries_keep_exact_floats_across_merges() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("props.json");
        let exact = PropertyRecord {
            accessible_surface_area: 100.00000000000001,
            accessible_volume: 1000.0000000000001,
            pore_limiting_diameter: 0.1 + 0.2,
            ..record(0.1)
        };
        merge_properties(&path, "X", exact.clone()).unwrap();
        merge_properties(&path, "Y", record(0.3)).unwrap();
        merge_properties(&path, "Z", record(0.4)).unwrap();

        let store = PropertyStore::open(&path).unwrap();
        let reloaded = store.get("X").unwrap();
        assert_eq!(
            reloaded.accessible_surface_area.to_bits(),
            exact.accessible_surface_area.to_bits()
        );
        assert_eq!(
            reloaded.accessible_volume.to_bits(),
            exact.accessible_volume.to_bits()
        );
        assert_eq!(
            reloaded.pore_limiting_diameter.to_bits(),
            exact.pore_limiting_diameter.to_bits()
        );
    }

    #[test]
    fn sbu_maps_replace_whole_identifier_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sbu.json");
        let unit = |label: &str| SbuRecord {
            kind: SbuKind::MetalBuildingUnit,
            label: label.to_string(),
            atoms: Structure::empty(Lattice::default(), [true; 3]),
            sbu_type: Some("paddlewheel".to_string()),
            sbu_coordination_number: Some(4),
        };

        let mut first = SbuMap::new();
        first.insert("metal_sbu_0".to_string(), unit("metal_sbu_0"));
        first.insert("metal_sbu_1".to_string(), unit("metal_sbu_1"));
        merge_sbus(&path, "X", first).unwrap();

        let mut second = SbuMap::new();
        second.insert("metal_sbu_2".to_string(), unit("metal_sbu_2"));
        merge_sbus(&path, "X", second.clone()).unwrap();

        let store = SbuStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("X"), Some(&second));
    }

    #[test]
    fn corrupt_store_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("props.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PropertyStore::open(&path),
            Err(StoreError::Json { .. })
        ));
        assert!(matches!(
            merge_properties(&path, "X", record(0.1)),
            Err(StoreError::Json { .. })
        ));
    }

    #[test]
    fn unwritable_location_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("props.json");
        assert!(matches!(
            merge_properties(&path, "X", record(0.1)),
            Err(StoreError::Io { .. })
        ));
    }
}
