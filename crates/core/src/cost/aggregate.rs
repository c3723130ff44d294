//! Energy/time aggregation.
//!
//! Pure post-processing of final counters. For every level, DRAM included:
//!
//! ```text
//! time   = (loads + stores) * access_time
//! energy = loads * read_energy + stores * write_energy
//! ```
//!
//! Totals are summed over all levels and divided by the number of destination
//! pixels in the batch.

use serde::Serialize;

use super::CostModel;
use crate::common::error::CostModelError;
use crate::stats::LevelStats;

/// Time and energy attributed to one level.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelCost {
    /// Level name.
    pub name: String,
    /// Time spent in nanoseconds.
    pub time_ns: f64,
    /// Energy spent in nanojoules.
    pub energy_nj: f64,
}

/// Aggregated metrics of a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metrics {
    /// Sum of every level's time.
    pub total_time_ns: f64,
    /// Sum of every level's energy.
    pub total_energy_nj: f64,
    /// `total_time_ns / pixels`.
    pub time_per_pixel_ns: f64,
    /// `total_energy_nj / pixels`.
    pub energy_per_pixel_nj: f64,
    /// Per-level contributions, cache levels first and DRAM last.
    pub breakdown: Vec<LevelCost>,
}

/// Combines counters with the cost model.
///
/// `dram_multiplier` scales all three DRAM constants before anything is
/// computed. `pixels` is `n_images * width * height`; zero pixels yield zero
/// per-pixel figures.
///
/// # Errors
///
/// Returns [`CostModelError::LevelCountMismatch`] if `levels` and the cost model
/// disagree on the number of cache levels.
pub fn aggregate(
    levels: &[LevelStats],
    dram: &LevelStats,
    cost: &CostModel,
    dram_multiplier: f64,
    pixels: u64,
) -> Result<Metrics, CostModelError> {
    cost.check_levels(levels.len())?;
    let cost = cost.scaled_dram(dram_multiplier);

    let breakdown: Vec<LevelCost> = levels
        .iter()
        .zip(&cost.levels)
        .chain(std::iter::once((dram, &cost.dram)))
        .map(|(stats, c)| {
            let loads = stats.load_count() as f64;
            let stores = stats.store_count() as f64;
            LevelCost {
                name: stats.name.clone(),
                time_ns: (loads + stores) * c.access_time_ns,
                energy_nj: loads.mul_add(c.read_energy_nj, stores * c.write_energy_nj),
            }
        })
        .collect();

    let total_time_ns: f64 = breakdown.iter().map(|c| c.time_ns).sum();
    let total_energy_nj: f64 = breakdown.iter().map(|c| c.energy_nj).sum();
    let (time_per_pixel_ns, energy_per_pixel_nj) = if pixels == 0 {
        (0.0, 0.0)
    } else {
        (
            total_time_ns / pixels as f64,
            total_energy_nj / pixels as f64,
        )
    };

    Ok(Metrics {
        total_time_ns,
        total_energy_nj,
        time_per_pixel_ns,
        energy_per_pixel_nj,
        breakdown,
    })
}
