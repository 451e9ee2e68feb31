//! Pipelines that combine the engine stages with persistence.
//!
//! [`extract`] handles a single archive; [`batch`] handles many, analysing them in
//! parallel while funnelling every store update through one thread.

pub mod batch;
pub mod extract;
