//! Simulation pipeline.
//!
//! This module ties the pieces together:
//! 1. **Driver:** Generates the access trace of a batch and feeds it to a hierarchy.
//! 2. **Pipeline:** [`simulate`] validates, drives, and aggregates in one call.
//! 3. **Sweeps:** Independent configurations evaluated in parallel.

/// Trace generation.
pub mod driver;

/// Parallel configuration sweeps.
pub mod sweep;

pub use driver::{TraceDriver, row_parallel_order};
pub use sweep::{SweepPlan, SweepRecord, run_sweep};

use crate::cache::{CacheHierarchy, HierarchyStats};
use crate::common::error::{AccessError, SimError};
use crate::config::{SimConfig, ValidatedConfig};
use crate::cost::{CostModel, aggregate};
use crate::stats::SimulationReport;

/// Drives a validated configuration through a fresh hierarchy and returns its counters.
///
/// # Errors
///
/// Returns an [`AccessError`] if the trace leaves the image or the address space.
pub fn run_trace(config: &ValidatedConfig) -> Result<HierarchyStats, AccessError> {
    let mut hierarchy = CacheHierarchy::from_config(config);
    TraceDriver::new(config).run(&mut hierarchy)?;
    Ok(hierarchy.stats())
}

/// Runs one configuration end to end.
///
/// Configuration and cost model are checked before any simulator state is
/// created; the run then either completes or fails without a partial result.
///
/// # Errors
///
/// Returns [`SimError::Config`] or [`SimError::CostModel`] for rejected inputs
/// and [`SimError::Access`] if a runtime invariant is violated.
pub fn simulate(config: &SimConfig, cost: &CostModel) -> Result<SimulationReport, SimError> {
    let validated = config.validate()?;
    cost.check_levels(validated.levels.len())?;

    let stats = run_trace(&validated)?;
    let pixels = validated.total_pixels();
    let metrics = aggregate(
        &stats.levels,
        &stats.dram,
        cost,
        validated.dram_multiplier,
        pixels,
    )?;

    tracing::info!(
        kernel = %validated.kernel,
        n_images = validated.n_images,
        rows = validated.parallelism,
        l1_loads = stats.levels.first().map_or(0, |l| l.load_count()),
        l1_misses = stats.levels.first().map_or(0, |l| l.miss_count()),
        dram_accesses = stats.dram.access_count(),
        time_per_pixel_ns = metrics.time_per_pixel_ns,
        energy_per_pixel_nj = metrics.energy_per_pixel_nj,
        "simulation complete"
    );

    let first = config.levels.first();
    Ok(SimulationReport {
        kernel: validated.kernel.name().to_string(),
        width: validated.image.width,
        height: validated.image.height,
        n_images: validated.n_images,
        parallelism: validated.parallelism,
        ways: first.map_or(0, |l| l.ways),
        l1_size: first.map_or(0, |l| l.capacity_bytes),
        pixels,
        levels: stats.levels,
        dram: stats.dram,
        metrics,
    })
}
