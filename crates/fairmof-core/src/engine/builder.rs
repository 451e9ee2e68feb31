use super::error::PipelineError;
use crate::core::archive::RawSystem;
use crate::core::models::lattice::Lattice;
use crate::core::models::structure::Structure;
use crate::core::units::{self, Unit};
use nalgebra::Point3;
use tracing::debug;

/// Builds the canonical Angstrom-based structure from an archive's SI atoms section.
///
/// The lattice is always converted, even for a system without positions. An empty
/// position list yields a zero-atom structure; its species, if any, are dropped.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedSystem`] when positions are present but their
/// count differs from the number of species.
pub fn build(raw: &RawSystem) -> Result<Structure, PipelineError> {
    let lattice = match raw.lattice_vectors {
        Some(rows) => {
            let matrix = *Lattice::from_rows(rows).matrix();
            Lattice::new(units::convert(matrix, Unit::METER, Unit::ANGSTROM)?)
        }
        None => Lattice::default(),
    };

    if raw.positions.is_empty() {
        debug!(
            species = raw.species.len(),
            "System has no positions; building a zero-atom structure."
        );
        return Ok(Structure::empty(lattice, raw.periodic));
    }

    if raw.positions.len() != raw.species.len() {
        return Err(PipelineError::MalformedSystem {
            species: raw.species.len(),
            positions: raw.positions.len(),
        });
    }

    let positions: Vec<Point3<f64>> = raw.positions.iter().copied().map(Point3::from).collect();
    let positions = units::convert(positions, Unit::METER, Unit::ANGSTROM)?;

    Structure::new(raw.species.clone(), positions, lattice, raw.periodic).map_err(|_| {
        PipelineError::MalformedSystem {
            species: raw.species.len(),
            positions: raw.positions.len(),
        }
    })
}
