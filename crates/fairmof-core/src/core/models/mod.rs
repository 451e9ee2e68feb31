//! # Core Models Module
//!
//! Data structures describing crystalline atomic systems in FAIR-MOF.
//!
//! ## Key Components
//!
//! - [`structure`] - The canonical periodic atomic system, with subset selection and
//!   unit-cell wrapping
//! - [`lattice`] - Unit cells, lattice parameters and fractional/Cartesian conversion
//! - [`records`] - Property and building-unit records persisted per identifier
//! - [`element`] - Chemical symbols for atomic numbers
//!
//! ## Usage
//!
//! ```ignore
//! use fairmof::core::models::{lattice::Lattice, structure::Structure};
//! use nalgebra::Point3;
//!
//! let cell = Lattice::from_rows([[10.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]]);
//! let structure = Structure::new(vec![30], vec![Point3::new(-1.0, 2.0, 3.0)], cell, [true; 3])?;
//! let wrapped = structure.wrapped();
//! ```

pub mod element;
pub mod lattice;
pub mod records;
pub mod structure;
