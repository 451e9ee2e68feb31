use super::element;
use super::lattice::Lattice;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use thiserror::Error;

/// Fractional coordinates this close to 1.0 fold back to 0.0 when wrapping.
const WRAP_EPS: f64 = 1e-7;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("{numbers} atomic numbers were given for {positions} positions")]
    LengthMismatch { numbers: usize, positions: usize },
    #[error("Atom index {index} is out of bounds for a structure with {atom_count} atoms")]
    IndexOutOfBounds { index: usize, atom_count: usize },
}

/// A periodic atomic system with positions and lattice in Angstroms.
///
/// A `Structure` offers no way to mutate itself after construction; subsets and
/// wrapped copies are new values derived from it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "StructureDocument", try_from = "StructureDocument")]
pub struct Structure {
    numbers: Vec<u8>,
    positions: Vec<Point3<f64>>,
    lattice: Lattice,
    pbc: [bool; 3],
}

impl Structure {
    /// Creates a structure from parallel atomic-number and position lists.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::LengthMismatch`] if the two lists differ in length.
    pub fn new(
        numbers: Vec<u8>,
        positions: Vec<Point3<f64>>,
        lattice: Lattice,
        pbc: [bool; 3],
    ) -> Result<Self, StructureError> {
        if numbers.len() != positions.len() {
            return Err(StructureError::LengthMismatch {
                numbers: numbers.len(),
                positions: positions.len(),
            });
        }
        Ok(Self {
            numbers,
            positions,
            lattice,
            pbc,
        })
    }

    /// An atom-free structure that still carries a cell and periodicity.
    pub fn empty(lattice: Lattice, pbc: [bool; 3]) -> Self {
        Self {
            numbers: Vec::new(),
            positions: Vec::new(),
            lattice,
            pbc,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn pbc(&self) -> [bool; 3] {
        self.pbc
    }

    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.numbers.iter().map(|&z| element::symbol_or_unknown(z))
    }

    /// Returns a new structure holding the atoms at `indices`, in that order.
    ///
    /// The cell and periodicity are kept. Repeated indices produce repeated atoms.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::IndexOutOfBounds`] for the first index past the end.
    pub fn select(&self, indices: &[usize]) -> Result<Structure, StructureError> {
        let mut numbers = Vec::with_capacity(indices.len());
        let mut positions = Vec::with_capacity(indices.len());
        for &index in indices {
            if index >= self.len() {
                return Err(StructureError::IndexOutOfBounds {
                    index,
                    atom_count: self.len(),
                });
            }
            numbers.push(self.numbers[index]);
            positions.push(self.positions[index]);
        }
        Ok(Structure {
            numbers,
            positions,
            lattice: self.lattice,
            pbc: self.pbc,
        })
    }

    /// Returns a copy with every atom moved into the unit cell along periodic axes.
    ///
    /// Non-periodic axes are left untouched. A singular cell has no fractional
    /// frame, so the structure is returned unchanged.
    pub fn wrapped(&self) -> Structure {
        if self.lattice.is_singular() || !self.pbc.iter().any(|&p| p) {
            return self.clone();
        }
        let positions = self
            .positions
            .iter()
            .map(|position| {
                let Some(mut fractional) = self.lattice.to_fractional(position) else {
                    return *position;
                };
                for axis in 0..3 {
                    if self.pbc[axis] {
                        fractional[axis] = wrap_coordinate(fractional[axis]);
                    }
                }
                self.lattice.to_cartesian(&fractional)
            })
            .collect();
        Structure {
            numbers: self.numbers.clone(),
            positions,
            lattice: self.lattice,
            pbc: self.pbc,
        }
    }

    /// Returns the chemical formula in Hill order (C, H, then alphabetical).
    pub fn chemical_formula(&self) -> String {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for symbol in self.symbols() {
            *counts.entry(symbol).or_default() += 1;
        }

        let mut formula = String::new();
        let mut push = |symbol: &str, count: usize| {
            if count == 1 {
                formula.push_str(symbol);
            } else {
                let _ = write!(formula, "{}{}", symbol, count);
            }
        };

        if let Some(carbon) = counts.remove("C") {
            push("C", carbon);
            if let Some(hydrogen) = counts.remove("H") {
                push("H", hydrogen);
            }
        }
        for (symbol, count) in counts {
            push(symbol, count);
        }
        formula
    }
}

fn wrap_coordinate(value: f64) -> f64 {
    let wrapped = value - value.floor();
    if (1.0 - wrapped).abs() < WRAP_EPS {
        0.0
    } else {
        wrapped
    }
}

/// Serialized form of a [`Structure`], in the `numbers`/`positions`/`cell`/`pbc`
/// layout used for atom dictionaries in the SBU store.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StructureDocument {
    numbers: Vec<u8>,
    #[serde(default, skip_deserializing)]
    symbols: Vec<String>,
    positions: Vec<[f64; 3]>,
    cell: [[f64; 3]; 3],
    pbc: [bool; 3],
}

impl From<Structure> for StructureDocument {
    fn from(structure: Structure) -> Self {
        Self {
            symbols: structure.symbols().map(str::to_string).collect(),
            positions: structure.positions.iter().map(|p| [p.x, p.y, p.z]).collect(),
            cell: structure.lattice.rows(),
            numbers: structure.numbers,
            pbc: structure.pbc,
        }
    }
}

impl TryFrom<StructureDocument> for Structure {
    type Error = StructureError;

    fn try_from(document: StructureDocument) -> Result<Self, Self::Error> {
        Structure::new(
            document.numbers,
            document.positions.into_iter().map(Point3::from).collect(),
            Lattice::from_rows(document.cell),
            document.pbc,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn cubic(edge: f64) -> Lattice {
        Lattice::from_rows([[edge, 0.0, 0.0], [0.0, edge, 0.0], [0.0, 0.0, edge]])
    }

    fn water_like() -> Structure {
        Structure::new(
            vec![8, 1, 1],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.96, 0.0, 0.0),
                Point3::new(-0.24, 0.93, 0.0),
            ],
            cubic(10.0),
            [true; 3],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_mismatched_lengths() {
        let err = Structure::new(vec![1, 1], vec![Point3::origin()], cubic(1.0), [true; 3])
            .unwrap_err();
        assert_eq!(
            err,
            StructureError::LengthMismatch {
                numbers: 2,
                positions: 1
            }
        );
    }

    #[test]
    fn select_keeps_order_and_cell() {
        let subset = water_like().select(&[2, 0]).unwrap();
        assert_eq!(subset.numbers(), &[1, 8]);
        assert_eq!(subset.positions()[1], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(subset.lattice(), &cubic(10.0));
        assert_eq!(subset.pbc(), [true; 3]);
    }

    #[test]
    fn select_reports_out_of_bounds_index() {
        let err = water_like().select(&[0, 3]).unwrap_err();
        assert_eq!(
            err,
            StructureError::IndexOutOfBounds {
                index: 3,
                atom_count: 3
            }
        );
    }

    #[test]
    fn wrapped_moves_atoms_into_the_cell() {
        let structure = Structure::new(
            vec![6, 6],
            vec![Point3::new(-1.0, 12.0, 5.0), Point3::new(10.0, 3.0, 25.0)],
            cubic(10.0),
            [true; 3],
        )
        .unwrap();
        let wrapped = structure.wrapped();
        let p0 = wrapped.positions()[0];
        let p1 = wrapped.positions()[1];
        assert!(approx_eq(p0.x, 9.0) && approx_eq(p0.y, 2.0) && approx_eq(p0.z, 5.0));
        assert!(approx_eq(p1.x, 0.0) && approx_eq(p1.y, 3.0) && approx_eq(p1.z, 5.0));
    }

    #[test]
    fn wrapped_ignores_non_periodic_axes() {
        let structure = Structure::new(
            vec![6],
            vec![Point3::new(-1.0, -1.0, -1.0)],
            cubic(10.0),
            [true, false, true],
        )
        .unwrap();
        let p = structure.wrapped().positions()[0];
        assert!(approx_eq(p.x, 9.0) && approx_eq(p.y, -1.0) && approx_eq(p.z, 9.0));
    }

    #[test]
    fn wrapped_is_a_no_op_for_singular_cells() {
        let structure = Structure::new(
            vec![6],
            vec![Point3::new(-1.0, 42.0, 3.0)],
            Lattice::default(),
            [true; 3],
        )
        .unwrap();
        assert_eq!(structure.wrapped(), structure);
    }

    #[test]
    fn chemical_formula_uses_hill_order() {
        let structure = Structure::new(
            vec![30, 8, 6, 1, 6, 1, 1, 8],
            vec![Point3::origin(); 8],
            cubic(10.0),
            [true; 3],
        )
        .unwrap();
        assert_eq!(structure.chemical_formula(), "C2H3O2Zn");
        assert_eq!(water_like().chemical_formula(), "H2O");
    }

    #[test]
    fn serde_round_trip_preserves_structure() {
        let structure = water_like();
        let json = serde_json::to_value(&structure).unwrap();
        assert_eq!(json["symbols"], serde_json::json!(["O", "H", "H"]));
        assert_eq!(json["cell"][0], serde_json::json!([10.0, 0.0, 0.0]));
        let back: Structure = serde_json::from_value(json).unwrap();
        assert_eq!(back, structure);
    }

    #[test]
    fn deserializing_inconsistent_document_fails() {
        let json = serde_json::json!({
            "numbers": [1, 1],
            "positions": [[0.0, 0.0, 0.0]],
            "cell": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            "pbc": [true, true, true]
        });
        assert!(serde_json::from_value::<Structure>(json).is_err());
    }
}
