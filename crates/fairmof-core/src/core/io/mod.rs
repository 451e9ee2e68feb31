//! Provides file output for crystallographic structures and the accumulating result stores.
//!
//! Structures are written through the [`traits::StructureFile`] interface (CIF and
//! extended XYZ). Per-identifier results are merged into JSON documents by [`store`].

pub mod cif;
pub mod store;
pub mod traits;
pub mod xyz;

use crate::core::models::structure::Structure;
use cif::CifFile;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use traits::StructureFile;
use xyz::XyzFile;

#[derive(Debug, Error)]
pub enum StructureFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("The {format} format requires a non-singular unit cell")]
    SingularCell { format: StructureFormat },
}

/// Output formats for structure files; the extension of written files follows the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StructureFormat {
    #[default]
    Cif,
    Xyz,
}

impl StructureFormat {
    pub fn extension(self) -> &'static str {
        match self {
            StructureFormat::Cif => CifFile::EXTENSION,
            StructureFormat::Xyz => XyzFile::EXTENSION,
        }
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unsupported structure format: '{0}' (expected 'cif' or 'xyz')")]
pub struct ParseFormatError(String);

impl FromStr for StructureFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "cif" => Ok(StructureFormat::Cif),
            "xyz" | "extxyz" => Ok(StructureFormat::Xyz),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

/// Serializes a structure to `path` in the given format.
pub fn write_structure(
    structure: &Structure,
    format: StructureFormat,
    path: &Path,
) -> Result<(), StructureFileError> {
    match format {
        StructureFormat::Cif => CifFile::write_to_path(structure, path),
        StructureFormat::Xyz => XyzFile::write_to_path(structure, path),
    }
}
