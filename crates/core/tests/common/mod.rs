//! Builders shared across the test tree.

use warpcache_core::cache::CacheHierarchy;
use warpcache_core::config::{CacheGeometry, CacheLevelConfig, ReplacementPolicy, SimConfig};
use warpcache_core::cost::{AccessCost, CostModel};
use warpcache_core::image::{ImageGeometry, KernelKind};

/// A normalized level shape, bypassing configuration.
pub fn geometry(name: &str, sets: usize, ways: usize, block_size: u64) -> CacheGeometry {
    CacheGeometry {
        name: name.to_string(),
        sets,
        ways,
        block_size,
        policy: ReplacementPolicy::Lru,
    }
}

/// A generous L2 that never constrains small-image tests.
pub fn roomy_l2() -> CacheLevelConfig {
    CacheLevelConfig::new("L2", 4096, 64, 8)
}

/// A single-image configuration over `levels`.
pub fn config(kernel: KernelKind, size: u64, levels: Vec<CacheLevelConfig>) -> SimConfig {
    SimConfig {
        kernel,
        image: ImageGeometry::square_rgb(size),
        n_images: 1,
        levels,
        ..SimConfig::default()
    }
}

/// Cost model charging `1 * 10^i` ns and nJ per access at level `i`, DRAM next.
pub fn decade_cost(levels: usize) -> CostModel {
    let entry = |i: usize| {
        let c = 10f64.powi(i as i32);
        AccessCost::new(c, c, c)
    };
    CostModel::new((0..levels).map(entry).collect(), entry(levels))
}

/// Loads `addr` and returns whether the nearest level hit.
pub fn l1_hit(hierarchy: &mut CacheHierarchy, addr: u64) -> bool {
    matches!(
        hierarchy.load(addr, 3),
        Ok(warpcache_core::cache::AccessOutcome::Level(0))
    )
}
