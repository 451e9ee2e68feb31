use super::StructureFileError;
use super::traits::StructureFile;
use crate::core::models::structure::Structure;
use std::io::Write;

/// Extended XYZ writer; the cell and periodicity travel in the comment line.
pub struct XyzFile;

impl StructureFile for XyzFile {
    const EXTENSION: &'static str = "xyz";

    fn write_to(
        structure: &Structure,
        _title: &str,
        writer: &mut impl Write,
    ) -> Result<(), StructureFileError> {
        writeln!(writer, "{}", structure.len())?;

        let lattice = structure.lattice();
        if !lattice.is_singular() {
            let flat: Vec<String> = lattice
                .rows()
                .iter()
                .flatten()
                .map(|v| format!("{:.8}", v))
                .collect();
            write!(writer, "Lattice=\"{}\" ", flat.join(" "))?;
        }
        let pbc: Vec<&str> = structure
            .pbc()
            .iter()
            .map(|&p| if p { "T" } else { "F" })
            .collect();
        writeln!(
            writer,
            "Properties=species:S:1:pos:R:3 pbc=\"{}\"",
            pbc.join(" ")
        )?;

        for (symbol, p) in structure.symbols().zip(structure.positions()) {
            writeln!(
                writer,
                "{:<3} {:>16.8} {:>16.8} {:>16.8}",
                symbol, p.x, p.y, p.z
            )?;
        }
        Ok(())
    }
}
