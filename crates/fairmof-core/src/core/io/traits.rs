use super::StructureFileError;
use crate::core::models::structure::Structure;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Defines the interface for writing crystallographic structure formats.
///
/// Implementors handle format-specific serialization; the provided path-based
/// method takes care of buffering and flushing.
pub trait StructureFile {
    /// Conventional file extension, without the leading dot.
    const EXTENSION: &'static str;

    /// Writes a structure to a writer.
    ///
    /// # Arguments
    ///
    /// * `structure` - The structure to write.
    /// * `title` - A name for the structure (CIF data block, XYZ comment).
    /// * `writer` - The writer to output to.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure cannot be represented in the format or writing fails.
    fn write_to(
        structure: &Structure,
        title: &str,
        writer: &mut impl Write,
    ) -> Result<(), StructureFileError>;

    /// Writes a structure to a file path, using the file stem as the title.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        structure: &Structure,
        path: P,
    ) -> Result<(), StructureFileError> {
        let path = path.as_ref();
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "structure".to_string());
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structure, &title, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
