//! # Core Module
//!
//! The stateless foundation of FAIR-MOF: structure models, the archive schema,
//! unit conversion and file I/O.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Lattices, elements and the canonical `Structure`
//! - **Input Schema** ([`archive`]) - Deserialization of NOMAD archive records
//! - **Units** ([`units`]) - Length, area and volume conversion without global state
//! - **File I/O** ([`io`]) - Crystallographic structure writers and accumulating JSON stores

pub mod archive;
pub mod io;
pub mod models;
pub mod units;
