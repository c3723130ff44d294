//! Configuration sweeps.
//!
//! Runs are independent: each owns its own [`CacheHierarchy`](crate::cache::CacheHierarchy),
//! so a sweep parallelizes across runs and never within one.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::simulate;
use crate::common::error::SimError;
use crate::config::SimConfig;
use crate::cost::CostModel;
use crate::image::{ImageGeometry, KernelKind};
use crate::stats::SimulationReport;

/// Grid of experiments, expanded into one [`SimConfig`] per point.
///
/// Fields not swept (L2 and beyond, stores, DRAM multiplier, seed, pixel size)
/// come from `base`. Each point sets the first level's capacity and every
/// level's associativity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepPlan {
    /// Template configuration.
    pub base: SimConfig,
    /// Square image sizes.
    pub image_sizes: Vec<u64>,
    /// Batch sizes.
    pub batch_sizes: Vec<u64>,
    /// Kernels.
    pub kernels: Vec<KernelKind>,
    /// Row-parallelism degrees.
    pub rows: Vec<u64>,
    /// First-level capacities in bytes.
    pub l1_sizes: Vec<u64>,
    /// Associativities applied to every level.
    pub ways: Vec<u64>,
}

impl Default for SweepPlan {
    /// The batch-size experiment grid: 100 and 250 pixel images, batches of 1 to 64,
    /// 4-32 KiB direct-mapped L1, and 1, 4 or 8 rows in parallel.
    fn default() -> Self {
        Self {
            base: SimConfig::default(),
            image_sizes: vec![100, 250],
            batch_sizes: vec![1, 2, 4, 8, 16, 32, 64],
            kernels: KernelKind::ALL.to_vec(),
            rows: vec![1, 4, 8],
            l1_sizes: (12..16).map(|n| 1u64 << n).collect(),
            ways: vec![1],
        }
    }
}

impl SweepPlan {
    /// Expands the grid. Ordering is size, batch, kernel, rows, L1 size, ways (outermost first).
    pub fn configs(&self) -> Vec<SimConfig> {
        let mut out = Vec::new();
        for &size in &self.image_sizes {
            for &n_images in &self.batch_sizes {
                for &kernel in &self.kernels {
                    for &rows in &self.rows {
                        for &l1_size in &self.l1_sizes {
                            for &ways in &self.ways {
                                let mut config = self.base.clone();
                                config.kernel = kernel;
                                config.image =
                                    ImageGeometry::new(size, size, self.base.image.pixel_size);
                                config.n_images = n_images;
                                config.parallelism = rows;
                                for level in &mut config.levels {
                                    level.ways = ways;
                                }
                                if let Some(l1) = config.levels.first_mut() {
                                    l1.capacity_bytes = l1_size;
                                }
                                out.push(config);
                            }
                        }
                    }
                }
            }
        }
        out
    }
}

/// One CSV row of a sweep.
///
/// Metric and cache columns come from [`SimulationReport::result_row`]; a
/// failed point keeps its row with `"error"` in both metric columns and its
/// cache columns taken from the configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepRecord {
    /// Kernel name.
    pub kernel: &'static str,
    /// Image width in pixels.
    pub image_size: u64,
    /// Images in the batch.
    pub n_images: u64,
    /// Time per pixel in nanoseconds, or `error`.
    #[serde(rename = "time per pixel (ns)")]
    pub time_per_pixel: String,
    /// Energy per pixel in nanojoules, or `error`.
    #[serde(rename = "energy per pixel (nJ)")]
    pub energy_per_pixel: String,
    /// Rows processed together.
    pub rows: u64,
    /// First-level associativity.
    pub ways: u64,
    /// First-level capacity in bytes.
    pub l1_size: u64,
}

impl SweepRecord {
    /// Marker written in place of metrics for a failed point.
    pub const ERROR: &'static str = "error";

    /// Builds the row for `config` and its outcome.
    pub fn new(config: &SimConfig, result: &Result<SimulationReport, SimError>) -> Self {
        let l1 = config.levels.first();
        let (time_per_pixel, energy_per_pixel, rows, ways, l1_size) = match result {
            Ok(report) => {
                let row = report.result_row();
                (
                    row.time_per_pixel.to_string(),
                    row.energy_per_pixel.to_string(),
                    row.rows,
                    row.ways,
                    row.l1_size,
                )
            }
            Err(_) => (
                Self::ERROR.to_string(),
                Self::ERROR.to_string(),
                config.parallelism,
                l1.map_or(0, |l| l.ways),
                l1.map_or(0, |l| l.capacity_bytes),
            ),
        };
        Self {
            kernel: config.kernel.name(),
            image_size: config.image.width,
            n_images: config.n_images,
            time_per_pixel,
            energy_per_pixel,
            rows,
            ways,
            l1_size,
        }
    }

    /// Whether this row records a failed point.
    pub fn is_error(&self) -> bool {
        self.time_per_pixel == Self::ERROR
    }
}

/// Simulates every configuration in parallel, returning results in input order.
///
/// A failing configuration yields its error in place; the other runs are unaffected.
pub fn run_sweep(
    configs: &[SimConfig],
    cost: &CostModel,
) -> Vec<Result<SimulationReport, SimError>> {
    configs
        .par_iter()
        .map(|config| {
            let result = simulate(config, cost);
            if let Err(ref e) = result {
                tracing::warn!(
                    kernel = %config.kernel,
                    rows = config.parallelism,
                    error = %e,
                    "sweep point failed"
                );
            }
            result
        })
        .collect()
}
