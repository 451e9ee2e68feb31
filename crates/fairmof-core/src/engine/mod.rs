//! The per-identifier pipeline stages.
//!
//! [`builder`] turns an archive's SI atoms section into a canonical
//! [`Structure`](crate::core::models::structure::Structure), [`classifier`] splits the
//! topology list into the framework and its building units, and [`properties`]
//! normalizes the framework's pore geometry. Every stage is pure; persistence lives
//! in the workflows.

pub mod builder;
pub mod classifier;
pub mod config;
pub mod error;
pub mod progress;
pub mod properties;
