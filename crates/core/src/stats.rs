//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters a run produces and the report built from them. It provides:
//! 1. **Per-level counters:** Load/store hits and misses for every cache level and main memory.
//! 2. **Report:** Counters plus per-pixel time and energy for one run, serializable to JSON.
//! 3. **Result rows:** The flat record appended to tabular result stores.

use serde::Serialize;

use crate::common::data::AccessKind;
use crate::cost::Metrics;

/// Counters for one cache level (or main memory).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Level name.
    pub name: String,
    /// Loads that found the block resident.
    pub load_hits: u64,
    /// Loads forwarded to the next level.
    pub load_misses: u64,
    /// Stores that found the block resident.
    pub store_hits: u64,
    /// Stores forwarded to the next level.
    pub store_misses: u64,
}

impl LevelStats {
    /// Creates zeroed counters for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Records one request.
    #[inline]
    pub const fn record(&mut self, kind: AccessKind, hit: bool) {
        match (kind, hit) {
            (AccessKind::Load, true) => self.load_hits += 1,
            (AccessKind::Load, false) => self.load_misses += 1,
            (AccessKind::Store, true) => self.store_hits += 1,
            (AccessKind::Store, false) => self.store_misses += 1,
        }
    }

    /// Zeroes every counter, keeping the name.
    pub const fn clear(&mut self) {
        self.load_hits = 0;
        self.load_misses = 0;
        self.store_hits = 0;
        self.store_misses = 0;
    }

    /// Loads received by this level.
    pub const fn load_count(&self) -> u64 {
        self.load_hits + self.load_misses
    }

    /// Stores received by this level.
    pub const fn store_count(&self) -> u64 {
        self.store_hits + self.store_misses
    }

    /// All requests received.
    pub const fn access_count(&self) -> u64 {
        self.load_count() + self.store_count()
    }

    /// Requests that found their block resident.
    pub const fn hit_count(&self) -> u64 {
        self.load_hits + self.store_hits
    }

    /// Requests forwarded to the next level.
    pub const fn miss_count(&self) -> u64 {
        self.load_misses + self.store_misses
    }

    /// Miss rate in `[0, 1]`; zero for an untouched level.
    pub fn miss_rate(&self) -> f64 {
        let total = self.access_count();
        if total == 0 {
            0.0
        } else {
            self.miss_count() as f64 / total as f64
        }
    }
}

/// Outcome of one completed simulation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Kernel name.
    pub kernel: String,
    /// Image width.
    pub width: u64,
    /// Image height.
    pub height: u64,
    /// Images in the batch.
    pub n_images: u64,
    /// Rows processed together.
    pub parallelism: u64,
    /// Associativity of the first level, as configured (0 = fully associative).
    pub ways: u64,
    /// Capacity of the first level in bytes.
    pub l1_size: u64,
    /// Destination pixels across the batch.
    pub pixels: u64,
    /// Cache levels, nearest first.
    pub levels: Vec<LevelStats>,
    /// Main memory.
    pub dram: LevelStats,
    /// Time and energy.
    pub metrics: Metrics,
}

impl SimulationReport {
    /// Flat record for tabular result stores.
    pub const fn result_row(&self) -> ResultRow {
        ResultRow {
            time_per_pixel: self.metrics.time_per_pixel_ns,
            energy_per_pixel: self.metrics.energy_per_pixel_nj,
            rows: self.parallelism,
            ways: self.ways,
            l1_size: self.l1_size,
        }
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("RESAMPLING CACHE SIMULATION");
        println!("==========================================================");
        println!("kernel                   {}", self.kernel);
        println!("images                   {} x {}x{}", self.n_images, self.width, self.height);
        println!("rows_in_parallel         {}", self.parallelism);
        println!("pixels                   {}", self.pixels);
        println!("----------------------------------------------------------");
        println!("MEMORY HIERARCHY");
        for level in self.levels.iter().chain(std::iter::once(&self.dram)) {
            println!(
                "  {:<6} loads: {:<10} | stores: {:<10} | hits: {:<10} | miss_rate: {:.2}%",
                level.name,
                level.load_count(),
                level.store_count(),
                level.hit_count(),
                level.miss_rate() * 100.0
            );
        }
        println!("----------------------------------------------------------");
        println!("COST");
        for cost in &self.metrics.breakdown {
            println!(
                "  {:<6} time: {:>14.3} ns | energy: {:>14.3} nJ",
                cost.name, cost.time_ns, cost.energy_nj
            );
        }
        println!("  total_time             {:.3} ns", self.metrics.total_time_ns);
        println!("  total_energy           {:.3} nJ", self.metrics.total_energy_nj);
        println!("  time_per_pixel         {:.6} ns", self.metrics.time_per_pixel_ns);
        println!("  energy_per_pixel       {:.6} nJ", self.metrics.energy_per_pixel_nj);
        println!("==========================================================");
    }
}

/// One row of a result table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ResultRow {
    /// Time per pixel in nanoseconds.
    #[serde(rename = "time per pixel (ns)")]
    pub time_per_pixel: f64,
    /// Energy per pixel in nanojoules.
    #[serde(rename = "energy per pixel (nJ)")]
    pub energy_per_pixel: f64,
    /// Rows processed together.
    pub rows: u64,
    /// First-level associativity.
    pub ways: u64,
    /// First-level capacity in bytes.
    pub l1_size: u64,
}
