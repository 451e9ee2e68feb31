use super::StructureFileError;
use super::traits::StructureFile;
use crate::core::models::structure::Structure;
use std::collections::HashMap;
use std::io::Write;

/// Crystallographic Information File writer, emitting every atom in space group P 1.
pub struct CifFile;

impl StructureFile for CifFile {
    const EXTENSION: &'static str = "cif";

    fn write_to(
        structure: &Structure,
        title: &str,
        writer: &mut impl Write,
    ) -> Result<(), StructureFileError> {
        let lattice = structure.lattice();
        let has_cell = !lattice.is_singular();
        let fractional = has_cell && structure.pbc().iter().all(|&p| p);

        writeln!(writer, "data_{}", block_name(title))?;
        writeln!(writer, "_symmetry_space_group_name_H-M    'P 1'")?;
        writeln!(writer, "_symmetry_Int_Tables_number       1")?;
        writeln!(writer)?;

        if has_cell {
            let (a, b, c, alpha, beta, gamma) = lattice.parameters();
            writeln!(writer, "_cell_length_a       {:.6}", a)?;
            writeln!(writer, "_cell_length_b       {:.6}", b)?;
            writeln!(writer, "_cell_length_c       {:.6}", c)?;
            writeln!(writer, "_cell_angle_alpha    {:.6}", alpha)?;
            writeln!(writer, "_cell_angle_beta     {:.6}", beta)?;
            writeln!(writer, "_cell_angle_gamma    {:.6}", gamma)?;
            writeln!(writer, "_cell_volume         {:.6}", lattice.volume())?;
            writeln!(writer)?;
        }

        writeln!(writer, "loop_")?;
        writeln!(writer, "  _symmetry_equiv_pos_as_xyz")?;
        writeln!(writer, "  'x, y, z'")?;

        if structure.is_empty() {
            return Ok(());
        }

        // Non-periodic systems carry Cartesian coordinates in Å.
        let axis = if fractional { "fract" } else { "Cartn" };
        writeln!(writer)?;
        writeln!(writer, "loop_")?;
        writeln!(writer, "  _atom_site_label")?;
        writeln!(writer, "  _atom_site_type_symbol")?;
        writeln!(writer, "  _atom_site_{}_x", axis)?;
        writeln!(writer, "  _atom_site_{}_y", axis)?;
        writeln!(writer, "  _atom_site_{}_z", axis)?;
        writeln!(writer, "  _atom_site_occupancy")?;

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (symbol, position) in structure.symbols().zip(structure.positions()) {
            let count = seen.entry(symbol).or_default();
            *count += 1;
            let coords = if fractional {
                lattice
                    .to_fractional(position)
                    .ok_or(StructureFileError::SingularCell {
                        format: super::StructureFormat::Cif,
                    })?
            } else {
                position.coords
            };
            writeln!(
                writer,
                "  {:<8} {:<3} {:>10.5} {:>10.5} {:>10.5}  1.0000",
                format!("{}{}", symbol, count),
                symbol,
                coords.x,
                coords.y,
                coords.z
            )?;
        }
        Ok(())
    }
}

fn block_name(title: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    if name.is_empty() {
        "structure".to_string()
    } else {
        name
    }
}
