//! # Unit Components
//!
//! Fine-grained tests for each module of the model, from the pure geometry
//! helpers up to the end-to-end pipeline.



/// Cost model resolution and aggregation.
pub mod cost;

/// Geometry, kernels, border policy, and address layout.
pub mod image;
