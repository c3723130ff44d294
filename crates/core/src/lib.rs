//! Cache-hierarchy model for geometric image-resampling kernels.
//!
//! This crate replays the pixel-addressing pattern of rotation and flip kernels
//! against a multi-level set-associative cache and turns the resulting counters
//! into time and energy estimates. It is organized as follows:
//! 1. **Image:** Image geometry, kernels (coordinate transforms), reflect-101 border handling, and address layout.
//! 2. **Cache:** Set-associative LRU levels chained into a hierarchy backed by main memory.
//! 3. **Simulation:** Trace driver that issues loads/stores per destination pixel, plus parallel sweeps.
//! 4. **Cost:** Externally supplied per-access time/energy constants and the per-pixel aggregator.
//! 5. **Reporting:** Configuration, error taxonomy, and per-level statistics.

/// Cache levels, replacement policies, and the multi-level hierarchy.
pub mod cache;
/// Shared types (access kinds, error taxonomy).
pub mod common;
/// Simulation configuration (defaults, serde structures, validation).
pub mod config;
/// Cost model input and the energy/time aggregator.
pub mod cost;
/// Image geometry, kernels, border policy, and address translation.
pub mod image;
/// Trace driver, one-call pipeline, and configuration sweeps.
pub mod sim;
/// Per-level counters and the simulation report.
pub mod stats;

/// Root configuration type; deserialize from JSON or start from `SimConfig::default()`.
pub use crate::config::SimConfig;
/// Externally supplied access-time/energy table.
pub use crate::cost::CostModel;
/// One-call pipeline: validate, simulate, aggregate.
pub use crate::sim::simulate;
/// Result of a completed run.
pub use crate::stats::SimulationReport;
