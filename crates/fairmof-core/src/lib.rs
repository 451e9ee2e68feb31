//! Extraction of metal-organic framework data from NOMAD archives.
//!
//! The crate is layered like a small pipeline:
//!
//! - [`core`] holds the archive schema, the structure and record models, unit
//!   conversion, and file output (CIF, extended XYZ and the accumulating JSON stores).
//! - [`engine`] holds the pure stages: building the Angstrom-based structure,
//!   classifying topology entries and normalizing framework properties.
//! - [`workflows`] ties the stages to persistence for one archive or a batch.

pub mod core;
pub mod engine;
pub mod workflows;
